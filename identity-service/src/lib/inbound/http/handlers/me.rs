use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::Identity;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

/// Return the caller's own identity. Reached only through the token
/// middleware, which resolves the subject id.
pub async fn me(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    state
        .auth_service
        .get_identity(&authenticated.identity_id)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for MeResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}
