use crate::Identity;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use thesis_kernel::prelude::{ApiError, ApiState, Role, RoleSet};
use tracing::debug;

pub const MISSING_TOKEN: &str = "Thiếu token xác thực";
pub const INVALID_TOKEN: &str = "Token không hợp lệ hoặc đã hết hạn";
pub const INACTIVE_ACCOUNT: &str = "Tài khoản không tồn tại hoặc đã bị vô hiệu hóa";
pub const FORBIDDEN: &str = "Bạn không có quyền thực hiện thao tác này";

/// The authenticated caller, inserted by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
    pub email: String,
    pub full_name: String,
}

impl CurrentUser {
    /// 403 unless the caller's role is in `roles`.
    pub fn require(&self, roles: RoleSet) -> Result<(), ApiError> {
        if roles.allows(self.role) { Ok(()) } else { Err(ApiError::forbidden(FORBIDDEN)) }
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN))
    }
}

/// Middleware for every `/api` route: verifies the bearer token, loads the
/// account and stores a [`CurrentUser`] in the request extensions.
pub async fn require_auth(
    State(state): State<ApiState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN))?;

    let identity = state.try_get_slice::<Identity>()?;
    let claims = identity.tokens.verify(token).map_err(|err| {
        debug!(error = %err, "Rejected bearer token");
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    let account = identity.users.find(&claims.sub).await?;
    let Some(account) = account.filter(|user| user.is_active) else {
        return Err(ApiError::unauthorized(INACTIVE_ACCOUNT));
    };

    request.extensions_mut().insert(CurrentUser {
        id: account.uid,
        role: account.role,
        email: account.email,
        full_name: account.full_name,
    });
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(header: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_scheme_is_required() {
        assert_eq!(bearer_token(&request(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("bearer   abc "))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request(None)), None);
    }

    #[test]
    fn role_check() {
        let user = CurrentUser {
            id: "u".into(),
            role: Role::Lecturer,
            email: "l@uni.vn".into(),
            full_name: "L".into(),
        };
        assert!(user.require(RoleSet::LECTURER | RoleSet::STAFF).is_ok());
        assert_eq!(user.require(RoleSet::STAFF).unwrap_err().status().as_u16(), 403);
    }
}
