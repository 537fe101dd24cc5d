use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::{model::role::Role, models::Claims};
use actix_web::{
    FromRequest, HttpMessage, HttpRequest,
    dev::Payload,
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    http::header::{AUTHORIZATION, HeaderMap},
    web::Data,
};
use futures::future::{Ready, ready};

/// The caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub emp_code: Option<String>,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let role = Role::from_id(claims.role)?;
        Some(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role,
            emp_code: claims.emp_code,
        })
    }

    /// Resolves the `Authorization: Bearer …` header into a user.
    /// The error is a client-facing reason.
    pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Self, String> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or("Missing Authorization header")?
            .to_str()
            .map_err(|_| "Invalid Authorization header encoding")?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or("Authorization header must start with Bearer")?;

        let claims =
            verify_token(token, secret).map_err(|e| format!("Invalid or expired token: {e}"))?;

        AuthUser::from_claims(claims).ok_or_else(|| "Invalid role".to_string())
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ErrorForbidden("Admin only"))
        }
    }

    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if self.role.is_hr_or_admin() {
            Ok(())
        } else {
            Err(ErrorForbidden("HR/Admin only"))
        }
    }

    /// HR and admins see everyone; an employee sees only their own records.
    pub fn require_access_to(&self, emp_code: &str) -> actix_web::Result<()> {
        if self.role.is_hr_or_admin() || self.emp_code.as_deref() == Some(emp_code) {
            Ok(())
        } else {
            Err(ErrorForbidden("Not allowed for this employee"))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already verified by auth_middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let Some(config) = req.app_data::<Data<Config>>() else {
            return ready(Err(ErrorInternalServerError("Config missing")));
        };

        ready(AuthUser::authenticate(req.headers(), &config.jwt_secret).map_err(ErrorUnauthorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenType;
    use actix_web::http::header::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    fn signed(role: u8, emp_code: Option<&str>) -> String {
        let claims = Claims {
            user_id: 3,
            sub: "hr.user".to_string(),
            role,
            exp: (chrono::Utc::now().timestamp() + 600) as usize,
            jti: "t-1".to_string(),
            token_type: TokenType::Access,
            emp_code: emp_code.map(str::to_string),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"s3cret")).unwrap()
    }

    #[test]
    fn resolves_bearer_token() {
        let token = signed(3, Some("EMP-001"));
        let user = AuthUser::authenticate(&headers(&format!("Bearer {token}")), "s3cret").unwrap();

        assert_eq!(user.role, Role::Employee);
        assert!(user.require_access_to("EMP-001").is_ok());
        assert!(user.require_access_to("EMP-002").is_err());
        assert!(user.require_hr_or_admin().is_err());
    }

    #[test]
    fn rejects_other_schemes_and_unknown_roles() {
        let token = signed(9, None);

        let err = AuthUser::authenticate(&headers(&format!("Token {token}")), "s3cret").unwrap_err();
        assert!(err.contains("Bearer"));

        let err = AuthUser::authenticate(&headers(&format!("Bearer {token}")), "s3cret").unwrap_err();
        assert_eq!(err, "Invalid role");

        assert!(AuthUser::authenticate(&HeaderMap::new(), "s3cret").is_err());
    }
}
