use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::identity::errors::AuthError;
use crate::identity::errors::UnauthenticatedReason;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Session;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Authentication core.
///
/// Orchestrates registration (hash + store) and login (retrieve + verify +
/// issue token). Owns the hashing and token policies via the injected
/// [`Authenticator`]; never logs, never retries.
pub struct AuthService<R>
where
    R: IdentityRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> AuthService<R>
where
    R: IdentityRepository,
{
    /// Create a new authentication core with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Hashing and token policy, constructed once at
    ///   startup with the process-wide secret
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError> {
        let password_hash = self.authenticator.hash_password(command.password.as_str())?;

        // Uniqueness is decided by the store's constrained insert, not by a
        // read-then-write check.
        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(identity).await
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, AuthError> {
        let identity = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(email.to_string()))?;

        let claims = Claims::session(identity.id);
        let result = self
            .authenticator
            .authenticate(password, &identity.password_hash, &claims)
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
                auth::AuthenticationError::PasswordError(err) => AuthError::Hashing(err),
                auth::AuthenticationError::TokenError(err) => AuthError::Token(err),
            })?;

        Ok(Session {
            identity,
            token: result.access_token,
        })
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, AuthError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(id.to_string()))
    }

    fn verify_token(&self, token: Option<&str>) -> Result<IdentityId, AuthError> {
        let token =
            token.ok_or(AuthError::Unauthenticated(UnauthenticatedReason::Missing))?;

        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|_| AuthError::Unauthenticated(UnauthenticatedReason::Invalid))?;

        IdentityId::from_string(&claims.sub)
            .map_err(|_| AuthError::Unauthenticated(UnauthenticatedReason::Invalid))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::identity::models::Password;
    use crate::identity::models::Username;

    const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestIdentityRepository {}

        #[async_trait]
        impl IdentityRepository for TestIdentityRepository {
            async fn insert(&self, identity: Identity) -> Result<Identity, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;
            async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError>;
        }
    }

    fn test_identity(authenticator: &Authenticator, password: &str) -> Identity {
        let now = Utc::now();
        Identity {
            id: IdentityId::new(),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            Username::new("testuser".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            Password::new("password123".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_insert()
            .withf(|identity| {
                identity.username.as_str() == "testuser"
                    && identity.email.as_str() == "test@example.com"
                    && identity.password_hash.starts_with("$argon2")
                    && identity.password_hash != "password123"
                    && identity.created_at == identity.updated_at
            })
            .times(1)
            .returning(|identity| Ok(identity));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.register(register_command()).await;
        assert!(result.is_ok());

        let identity = result.unwrap();
        assert_eq!(identity.username.as_str(), "testuser");
        assert_eq!(identity.email.as_str(), "test@example.com");
        // Password is hashed with real Argon2
        assert!(identity.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_identity() {
        let mut repository = MockTestIdentityRepository::new();

        repository.expect_insert().times(1).returning(|identity| {
            Err(AuthError::DuplicateIdentity(
                identity.email.as_str().to_string(),
            ))
        });

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.register(register_command()).await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            AuthError::DuplicateIdentity(_)
        ));
    }

    #[tokio::test]
    async fn test_register_salts_per_call() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_insert()
            .times(2)
            .returning(|identity| Ok(identity));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let first = service.register(register_command()).await.unwrap();
        let second = service.register(register_command()).await.unwrap();

        // Same plaintext, different stored hashes
        assert_ne!(first.password_hash, second.password_hash);
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestIdentityRepository::new();
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let identity = test_identity(&authenticator, "password123");
        let identity_id = identity.id;

        let returned = identity.clone();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let session = service.login(&email, "password123").await.unwrap();

        assert_eq!(session.identity.id, identity_id);
        assert!(!session.token.is_empty());

        // Token decodes to the identity's id and is not yet expired
        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.sub, identity_id.to_string());
        assert!(!claims.is_expired(Utc::now().timestamp()));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let result = service.login(&email, "password123").await;

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::IdentityNotFound(_)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestIdentityRepository::new();
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let identity = test_identity(&authenticator, "password123");
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let result = service.login(&email, "wrong_password").await;

        // Wrong password on a known email is InvalidCredentials, never
        // IdentityNotFound
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_identity_not_found() {
        let mut repository = MockTestIdentityRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.get_identity(&IdentityId::new()).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::IdentityNotFound(_)));
    }

    #[tokio::test]
    async fn test_verify_token_roundtrip() {
        let repository = MockTestIdentityRepository::new();
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let identity = test_identity(&authenticator, "password123");
        let claims = Claims::session(identity.id);
        let token = authenticator
            .authenticate("password123", &identity.password_hash, &claims)
            .unwrap()
            .access_token;

        let service = AuthService::new(Arc::new(repository), authenticator);

        let subject = service.verify_token(Some(&token)).unwrap();
        assert_eq!(subject, identity.id);
    }

    #[tokio::test]
    async fn test_verify_token_missing() {
        let repository = MockTestIdentityRepository::new();
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.verify_token(None);
        assert!(matches!(
            result.unwrap_err(),
            AuthError::Unauthenticated(UnauthenticatedReason::Missing)
        ));
    }

    #[tokio::test]
    async fn test_verify_token_wrongly_signed() {
        let repository = MockTestIdentityRepository::new();

        // Token signed with a different secret
        let forger = Authenticator::new(b"another_secret_key_32_bytes_long!!");
        let hash = forger.hash_password("password123").unwrap();
        let token = forger
            .authenticate("password123", &hash, &Claims::session(IdentityId::new()))
            .unwrap()
            .access_token;

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.verify_token(Some(&token));
        assert!(matches!(
            result.unwrap_err(),
            AuthError::Unauthenticated(UnauthenticatedReason::Invalid)
        ));
    }
}
