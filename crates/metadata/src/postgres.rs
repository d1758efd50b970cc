//! PostgreSQL-based metadata store implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::*;
use crate::repos::{ArticleParagraphRepo, ArticleRepo, CategoryRepo};
use crate::store::MetadataStore;
use async_trait::async_trait;
use blog_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres, QueryBuilder};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based metadata store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Connect using a full connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Connect using individual parameters, so the password can come from
    /// the environment instead of a URL in the config file.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }
        if let Some(pass) = password {
            opts = opts.password(pass);
        }
        if let Some(mode) = ssl_mode {
            opts = opts.ssl_mode(match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            });
        }

        tracing::info!(
            host,
            port,
            database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{timeout_ms}ms"))]);
            tracing::info!(timeout_ms, "PostgreSQL statement_timeout set");
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        // Prepared statements cannot hold more than one command.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepo for PostgresStore {
    async fn create_category(&self, category: &NewCategory) -> MetadataResult<CategoryRow> {
        sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO category (category_title, category_image_name, category_publish_date)
            VALUES ($1, $2, $3)
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
        let row = sqlx::query_as::<_, CategoryRow>("SELECT * FROM category WHERE category_id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_categories(&self) -> MetadataResult<Vec<CategoryRow>> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT * FROM category ORDER BY category_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_latest_categories(&self, limit: i64) -> MetadataResult<Vec<CategoryRow>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT * FROM category ORDER BY category_id DESC LIMIT $1",
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

        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT * FROM category WHERE category_id = ANY($1) ORDER BY category_id",
        )
        .bind(category_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_category(&self, category: &CategoryRow) -> MetadataResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE category
            SET category_title = $1, category_image_name = $2, category_publish_date = $3
            WHERE category_id = $4
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
        let result = sqlx::query("DELETE FROM category WHERE category_id = $1")
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
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM category WHERE category_id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl ArticleRepo for PostgresStore {
    async fn create_article(&self, article: &NewArticle) -> MetadataResult<ArticleRow> {
        sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO article (article_title, article_ingress, article_image_name,
                                 article_publish_date, created_by, sticky_article, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
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
        let row = sqlx::query_as::<_, ArticleRow>("SELECT * FROM article WHERE article_id = $1")
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
            "SELECT * FROM article ORDER BY article_id DESC LIMIT $1",
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
            "SELECT * FROM article WHERE category_id = $1 ORDER BY article_id DESC",
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

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT article_id, article_title, article_ingress, article_image_name, \
             article_publish_date, created_by, sticky_article, category_id \
             FROM (SELECT article.*, ROW_NUMBER() OVER \
             (PARTITION BY category_id ORDER BY article_id DESC) AS rn \
             FROM article WHERE category_id = ANY(",
        );
        query.push_bind(category_ids.to_vec());
        query.push(")) ranked WHERE rn <= ");
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
            SET article_title = $1, article_ingress = $2, article_image_name = $3,
                article_publish_date = $4, created_by = $5, sticky_article = $6, category_id = $7
            WHERE article_id = $8
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
        let result = sqlx::query("DELETE FROM article WHERE article_id = $1")
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
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM article WHERE article_id = $1)")
                .bind(article_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl ArticleParagraphRepo for PostgresStore {
    async fn create_paragraph(
        &self,
        paragraph: &NewArticleParagraph,
    ) -> MetadataResult<ArticleParagraphRow> {
        sqlx::query_as::<_, ArticleParagraphRow>(
            r#"
            INSERT INTO article_paragraph (article_paragraph_title, article_paragraph_image_name,
                                           content, article_id)
            VALUES ($1, $2, $3, $4)
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
            "SELECT * FROM article_paragraph WHERE article_paragraph_id = $1",
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
            SET article_paragraph_title = $1, article_paragraph_image_name = $2,
                content = $3, article_id = $4
            WHERE article_paragraph_id = $5
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
        let result = sqlx::query("DELETE FROM article_paragraph WHERE article_paragraph_id = $1")
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
            "SELECT EXISTS(SELECT 1 FROM article_paragraph WHERE article_paragraph_id = $1)",
        )
        .bind(paragraph_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
