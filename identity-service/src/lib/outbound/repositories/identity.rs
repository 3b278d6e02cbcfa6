use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::identity::errors::StoreError;
use crate::identity::errors::UniqueField;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::ports::IdentityRepository;

const SELECT_IDENTITY: &str = r#"
    SELECT id, username, display_name, email, secret_hash, created_at
    FROM app_user
"#;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "{} WHERE {} LIMIT 1",
            SELECT_IDENTITY, condition
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i32,
    username: String,
    display_name: Option<String>,
    email: String,
    secret_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity::restore(
            IdentityId(row.id),
            row.username,
            row.display_name,
            row.email,
            row.secret_hash,
            row.created_at,
        )?)
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn save(&self, identity: &Identity) -> Result<IdentityId, StoreError> {
        let secret_hash = identity
            .secret
            .hashed_value()
            .ok_or(StoreError::PlaintextSecret)?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO app_user (username, display_name, email, secret_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(identity.username.as_str())
        .bind(identity.display_name.as_deref())
        .bind(identity.email.as_str())
        .bind(secret_hash)
        .bind(identity.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("app_user_username_key") {
                        return StoreError::Duplicate {
                            field: UniqueField::Username,
                            value: identity.username.to_string(),
                        };
                    }
                    if db_err.constraint() == Some("app_user_email_key") {
                        return StoreError::Duplicate {
                            field: UniqueField::Email,
                            value: identity.email.to_string(),
                        };
                    }
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(IdentityId(id))
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("{} WHERE id = $1", SELECT_IDENTITY))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_username_or_email(
        &self,
        login: &str,
    ) -> Result<Option<Identity>, StoreError> {
        self.fetch_one_where("username = $1 OR email = $1", login)
            .await
    }
}
