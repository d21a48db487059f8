use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::Username;
use crate::identity::ports::IdentityRepository;

/// Postgres-backed credential store.
///
/// Uniqueness of email and username is enforced by table constraints at
/// write time, so concurrent registrations with the same key cannot both
/// succeed.
pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(e: sqlx::Error) -> AuthError {
    AuthError::StoreError(e.to_string())
}

fn identity_from_row(row: &PgRow) -> Result<Identity, AuthError> {
    let id: Uuid = row.try_get("id").map_err(store_error)?;
    let username: String = row.try_get("username").map_err(store_error)?;
    let email: String = row.try_get("email").map_err(store_error)?;

    Ok(Identity {
        id: IdentityId(id),
        username: Username::new(username)?,
        email: EmailAddress::new(email)?,
        password_hash: row.try_get("password_hash").map_err(store_error)?,
        created_at: row.try_get("created_at").map_err(store_error)?,
        updated_at: row.try_get("updated_at").map_err(store_error)?,
    })
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn insert(&self, identity: Identity) -> Result<Identity, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    // Either key column tripping the constraint means the
                    // principal is already registered.
                    let key = match db_err.constraint() {
                        Some("identities_username_key") => identity.username.as_str(),
                        _ => identity.email.as_str(),
                    };
                    return AuthError::DuplicateIdentity(key.to_string());
                }
            }
            AuthError::StoreError(e.to_string())
        })?;

        Ok(identity)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref().map(identity_from_row).transpose()
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref().map(identity_from_row).transpose()
    }
}
