//! Metadata store trait and the SQLite implementation.

use crate::error::MetadataResult;
use crate::repos::{ArticleParagraphRepo, ArticleRepo, CategoryRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: CategoryRepo + ArticleRepo + ArticleParagraphRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at `path` and apply the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let in_memory = path.as_os_str() == ":memory:";

        let opts = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        };
        let opts = opts
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // One connection: SQLite serializes writers anyway, and an in-memory
        // database only lives as long as its connection.
        let mut pool_opts = SqlitePoolOptions::new().max_connections(1);
        if in_memory {
            pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_opts.connect_with(opts).await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(path = %path.display(), "SQLite metadata store ready");

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::error::MetadataError;
    use crate::models::*;
    use sqlx::QueryBuilder;

    const ARTICLE_COLUMNS: &str = "article_id, article_title, article_ingress, article_image_name, \
         article_publish_date, created_by, sticky_article, category_id";

    #[async_trait]
    impl CategoryRepo for SqliteStore {
        async fn create_category(&self, category: &NewCategory) -> MetadataResult<CategoryRow> {
            sqlx::query_as::<_, CategoryRow>(
                r#"
                INSERT INTO category (category_title, category_image_name, category_publish_date)
                VALUES (?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(&category.category_title)
            .bind(&category.category_image_name)
            .bind(category.category_publish_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "create category"))
        }

        async fn get_category(&self, category_id: i64) -> MetadataResult<Option<CategoryRow>> {
            let row =
                sqlx::query_as::<_, CategoryRow>("SELECT * FROM category WHERE category_id = ?")
                    .bind(category_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn list_categories(&self) -> MetadataResult<Vec<CategoryRow>> {
            let rows =
                sqlx::query_as::<_, CategoryRow>("SELECT * FROM category ORDER BY category_id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn list_latest_categories(&self, limit: i64) -> MetadataResult<Vec<CategoryRow>> {
            let rows = sqlx::query_as::<_, CategoryRow>(
                "SELECT * FROM category ORDER BY category_id DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_categories_by_ids(
            &self,
            category_ids: &[i64],
        ) -> MetadataResult<Vec<CategoryRow>> {
            if category_ids.is_empty() {
                return Ok(Vec::new());
            }

            let mut query =
                QueryBuilder::<Sqlite>::new("SELECT * FROM category WHERE category_id IN (");
            let mut ids = query.separated(", ");
            for id in category_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(") ORDER BY category_id");

            let rows = query
                .build_query_as::<CategoryRow>()
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn update_category(&self, category: &CategoryRow) -> MetadataResult<()> {
            let result = sqlx::query(
                r#"
                UPDATE category
                SET category_title = ?, category_image_name = ?, category_publish_date = ?
                WHERE category_id = ?
                "#,
            )
            .bind(&category.category_title)
            .bind(&category.category_image_name)
            .bind(category.category_publish_date)
            .bind(category.category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "update category"))?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::Concurrency(format!(
                    "category {}",
                    category.category_id
                )));
            }
            Ok(())
        }

        async fn delete_category(&self, category_id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM category WHERE category_id = ?")
                .bind(category_id)
                .execute(&self.pool)
                .await
                .map_err(|e| MetadataError::from_write(e, "delete category"))?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!("category {category_id}")));
            }
            Ok(())
        }

        async fn category_exists(&self, category_id: i64) -> MetadataResult<bool> {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM category WHERE category_id = ?)",
            )
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(exists)
        }
    }

    #[async_trait]
    impl ArticleRepo for SqliteStore {
        async fn create_article(&self, article: &NewArticle) -> MetadataResult<ArticleRow> {
            sqlx::query_as::<_, ArticleRow>(
                r#"
                INSERT INTO article (article_title, article_ingress, article_image_name,
                                     article_publish_date, created_by, sticky_article, category_id)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(&article.article_title)
            .bind(&article.article_ingress)
            .bind(&article.article_image_name)
            .bind(article.article_publish_date)
            .bind(&article.created_by)
            .bind(article.sticky_article)
            .bind(article.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "create article"))
        }

        async fn get_article(&self, article_id: i64) -> MetadataResult<Option<ArticleRow>> {
            let row = sqlx::query_as::<_, ArticleRow>("SELECT * FROM article WHERE article_id = ?")
                .bind(article_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_articles(&self) -> MetadataResult<Vec<ArticleRow>> {
            let rows = sqlx::query_as::<_, ArticleRow>("SELECT * FROM article ORDER BY article_id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn list_latest_articles(&self, limit: i64) -> MetadataResult<Vec<ArticleRow>> {
            let rows = sqlx::query_as::<_, ArticleRow>(
                "SELECT * FROM article ORDER BY article_id DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_articles_for_category(
            &self,
            category_id: i64,
        ) -> MetadataResult<Vec<ArticleRow>> {
            let rows = sqlx::query_as::<_, ArticleRow>(
                "SELECT * FROM article WHERE category_id = ? ORDER BY article_id DESC",
            )
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_latest_articles_for_categories(
            &self,
            category_ids: &[i64],
            per_category: i64,
        ) -> MetadataResult<Vec<ArticleRow>> {
            if category_ids.is_empty() {
                return Ok(Vec::new());
            }

            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "SELECT {ARTICLE_COLUMNS} FROM (SELECT {ARTICLE_COLUMNS}, ROW_NUMBER() OVER \
                 (PARTITION BY category_id ORDER BY article_id DESC) AS rn \
                 FROM article WHERE category_id IN ("
            ));
            let mut ids = query.separated(", ");
            for id in category_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")) ranked WHERE rn <= ");
            query.push_bind(per_category);
            query.push(" ORDER BY category_id, article_id DESC");

            let rows = query
                .build_query_as::<ArticleRow>()
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn update_article(&self, article: &ArticleRow) -> MetadataResult<()> {
            let result = sqlx::query(
                r#"
                UPDATE article
                SET article_title = ?, article_ingress = ?, article_image_name = ?,
                    article_publish_date = ?, created_by = ?, sticky_article = ?, category_id = ?
                WHERE article_id = ?
                "#,
            )
            .bind(&article.article_title)
            .bind(&article.article_ingress)
            .bind(&article.article_image_name)
            .bind(article.article_publish_date)
            .bind(&article.created_by)
            .bind(article.sticky_article)
            .bind(article.category_id)
            .bind(article.article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "update article"))?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::Concurrency(format!(
                    "article {}",
                    article.article_id
                )));
            }
            Ok(())
        }

        async fn delete_article(&self, article_id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM article WHERE article_id = ?")
                .bind(article_id)
                .execute(&self.pool)
                .await
                .map_err(|e| MetadataError::from_write(e, "delete article"))?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!("article {article_id}")));
            }
            Ok(())
        }

        async fn article_exists(&self, article_id: i64) -> MetadataResult<bool> {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM article WHERE article_id = ?)")
                    .bind(article_id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(exists)
        }
    }

    #[async_trait]
    impl ArticleParagraphRepo for SqliteStore {
        async fn create_paragraph(
            &self,
            paragraph: &NewArticleParagraph,
        ) -> MetadataResult<ArticleParagraphRow> {
            sqlx::query_as::<_, ArticleParagraphRow>(
                r#"
                INSERT INTO article_paragraph (article_paragraph_title, article_paragraph_image_name,
                                               content, article_id)
                VALUES (?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(&paragraph.article_paragraph_title)
            .bind(&paragraph.article_paragraph_image_name)
            .bind(&paragraph.content)
            .bind(paragraph.article_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "create paragraph"))
        }

        async fn get_paragraph(
            &self,
            paragraph_id: i64,
        ) -> MetadataResult<Option<ArticleParagraphRow>> {
            let row = sqlx::query_as::<_, ArticleParagraphRow>(
                "SELECT * FROM article_paragraph WHERE article_paragraph_id = ?",
            )
            .bind(paragraph_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_paragraphs(&self) -> MetadataResult<Vec<ArticleParagraphRow>> {
            let rows = sqlx::query_as::<_, ArticleParagraphRow>(
                "SELECT * FROM article_paragraph ORDER BY article_paragraph_id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn update_paragraph(&self, paragraph: &ArticleParagraphRow) -> MetadataResult<()> {
            let result = sqlx::query(
                r#"
                UPDATE article_paragraph
                SET article_paragraph_title = ?, article_paragraph_image_name = ?,
                    content = ?, article_id = ?
                WHERE article_paragraph_id = ?
                "#,
            )
            .bind(&paragraph.article_paragraph_title)
            .bind(&paragraph.article_paragraph_image_name)
            .bind(&paragraph.content)
            .bind(paragraph.article_id)
            .bind(paragraph.article_paragraph_id)
            .execute(&self.pool)
            .await
            .map_err(|e| MetadataError::from_write(e, "update paragraph"))?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::Concurrency(format!(
                    "paragraph {}",
                    paragraph.article_paragraph_id
                )));
            }
            Ok(())
        }

        async fn delete_paragraph(&self, paragraph_id: i64) -> MetadataResult<()> {
            let result =
                sqlx::query("DELETE FROM article_paragraph WHERE article_paragraph_id = ?")
                    .bind(paragraph_id)
                    .execute(&self.pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!("paragraph {paragraph_id}")));
            }
            Ok(())
        }

        async fn paragraph_exists(&self, paragraph_id: i64) -> MetadataResult<bool> {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM article_paragraph WHERE article_paragraph_id = ?)",
            )
            .bind(paragraph_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(exists)
        }
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS category (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_title TEXT CHECK (length(category_title) <= 50),
    category_image_name TEXT,
    category_publish_date TEXT
);

CREATE TABLE IF NOT EXISTS article (
    article_id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_title TEXT CHECK (length(article_title) <= 50),
    article_ingress TEXT CHECK (length(article_ingress) <= 50),
    article_image_name TEXT,
    article_publish_date TEXT,
    created_by TEXT CHECK (length(created_by) <= 50),
    sticky_article INTEGER NOT NULL DEFAULT 0,
    category_id INTEGER NOT NULL REFERENCES category(category_id) ON DELETE NO ACTION
);
CREATE INDEX IF NOT EXISTS idx_article_category ON article(category_id, article_id);

CREATE TABLE IF NOT EXISTS article_paragraph (
    article_paragraph_id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_paragraph_title TEXT CHECK (length(article_paragraph_title) <= 50),
    article_paragraph_image_name TEXT,
    content TEXT,
    article_id INTEGER NOT NULL REFERENCES article(article_id) ON DELETE NO ACTION
);
CREATE INDEX IF NOT EXISTS idx_article_paragraph_article ON article_paragraph(article_id);
"#;
