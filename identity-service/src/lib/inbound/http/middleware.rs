use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::identity::models::IdentityId;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified subject through request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub identity_id: IdentityId,
}

/// Middleware that verifies session tokens before protected handlers run.
///
/// An absent (or non-bearer) Authorization header answers 401; a token that
/// is present but fails signature or expiry checks answers 403.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&req);

    let identity_id = state
        .auth_service
        .verify_token(token)
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut()
        .insert(AuthenticatedIdentity { identity_id });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with_auth(value: Option<&str>) -> Request {
        let builder = axum::http::Request::builder().uri("/api/users/me");
        let builder = match value {
            Some(v) => builder.header(http::header::AUTHORIZATION, v),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = request_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_is_no_token() {
        let req = request_with_auth(None);
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_non_bearer_scheme_is_no_token() {
        let req = request_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&req), None);
    }
}
