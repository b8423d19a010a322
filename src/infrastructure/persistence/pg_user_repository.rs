//! PostgreSQL implementation of the student repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, UserRecord};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Row shape of the `student` table.
#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i64,
    name: String,
    email: String,
    password: String,
}

impl From<StudentRow> for UserRecord {
    fn from(row: StudentRow) -> Self {
        UserRecord::new(row.id, row.name, row.email, row.password)
    }
}

/// PostgreSQL repository over the `student` table.
///
/// The `password` column holds PHC hashes only; plaintext passwords never
/// reach this layer.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Vec<UserRecord>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, password
            FROM student
            WHERE email = $1
            LIMIT 2
            "#,
        )
        .bind(email)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn create(&self, new_user: &NewUser) -> Result<UserRecord, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO student (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, email, password
            FROM student
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
