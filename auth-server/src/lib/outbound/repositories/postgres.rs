use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::StoreError;
use crate::domain::account::models::CredentialRecord;
use crate::domain::account::ports::UserStore;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<CredentialRecord, sqlx::Error> {
    Ok(CredentialRecord {
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        salt: row.try_get("salt")?,
        name: row.try_get("name")?,
        active: row.try_get("active")?,
        admin: row.try_get("admin")?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT username, password_hash, salt, name, active, admin
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn save(&self, record: CredentialRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (username, password_hash, salt, name, active, admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.username)
        .bind(&record.password_hash)
        .bind(&record.salt)
        .bind(&record.name)
        .bind(record.active)
        .bind(record.admin)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::Duplicate(record.username.clone());
                }
            }
            StoreError::Backend(e.to_string())
        })?;

        Ok(())
    }
}
