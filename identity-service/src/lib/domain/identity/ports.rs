use async_trait::async_trait;

use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Session;

/// Port for the authentication core.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// Hashes the password and persists the record through the store's
    /// atomic constrained insert. Either exactly one record is created or
    /// none is.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email or username is already registered
    /// * `StoreError` - Persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError>;

    /// Authenticate by email and password, issuing a session token.
    ///
    /// # Errors
    /// * `IdentityNotFound` - No record for this email
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreError` - Lookup failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, AuthError>;

    /// Retrieve an identity by id (consumed by the protected boundary).
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity does not exist
    /// * `StoreError` - Lookup failed
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, AuthError>;

    /// Verify a session token and yield its subject.
    ///
    /// Purely computational; consults no state beyond the signing secret.
    ///
    /// # Errors
    /// * `Unauthenticated(Missing)` - No token supplied
    /// * `Unauthenticated(Invalid)` - Signature, expiry, or subject check failed
    fn verify_token(&self, token: Option<&str>) -> Result<IdentityId, AuthError>;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// Must be atomic with respect to the email/username uniqueness
    /// invariant: under concurrent inserts with the same key, at most one
    /// succeeds. Uniqueness is decided at write time, never by a prior read.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - A record with this email or username exists
    /// * `StoreError` - Persistence failed
    async fn insert(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Retrieve an identity by email address.
    ///
    /// # Errors
    /// * `StoreError` - Lookup failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;

    /// Retrieve an identity by id.
    ///
    /// # Errors
    /// * `StoreError` - Lookup failed
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError>;
}
