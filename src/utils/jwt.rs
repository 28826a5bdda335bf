use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::users::entities::Principal;

pub const ACCESS_TOKEN_TYPE: &str = "access";

// 令牌由身份服务签发，这里只负责校验
static DECODING_KEY: Lazy<DecodingKey> =
    Lazy::new(|| DecodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes()));

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    #[serde(default)]
    pub roles: Vec<String>, // 角色名，如 ROLE_ADMIN / STUDENT
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 转换为操作者，`sub` 必须是数字用户 ID
    pub fn into_principal(self) -> Result<Principal, jsonwebtoken::errors::Error> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;
        Ok(Principal::from_raw_roles(id, &self.roles))
    }
}

pub struct JwtUtils;

impl JwtUtils {
    fn validation(leeway: u64) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        validation
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Self::validation(AppConfig::get().jwt.leeway);
        decode::<Claims>(token, &DECODING_KEY, &validation).map(|data| data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(token)?;
        Self::ensure_access(claims)
    }

    /// 使用指定密钥校验，不读取全局配置
    pub fn verify_access_token_with_secret(
        token: &str,
        secret: &[u8],
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(secret);
        let claims = decode::<Claims>(token, &key, &Self::validation(leeway))?.claims;
        Self::ensure_access(claims)
    }

    fn ensure_access(claims: Claims) -> Result<Claims, jsonwebtoken::errors::Error> {
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::RoleName;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &[u8] = b"test-secret";

    fn token(sub: &str, roles: &[&str], token_type: &str, expires_in: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            token_type: token_type.to_string(),
            exp: (now + expires_in) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_access_token_yields_principal() {
        let t = token("42", &["ROLE_HQ_TEACHER", "student", "ROLE_UNKNOWN"], "access", 600);
        let claims = JwtUtils::verify_access_token_with_secret(&t, SECRET, 0).unwrap();
        let principal = claims.into_principal().unwrap();
        assert_eq!(principal.id, 42);
        assert!(principal.has_role(RoleName::HqTeacher));
        assert!(principal.has_role(RoleName::Student));
        assert_eq!(principal.roles.len(), 2);
    }

    #[test]
    fn test_refresh_token_rejected() {
        let t = token("42", &["ADMIN"], "refresh", 600);
        assert!(JwtUtils::verify_access_token_with_secret(&t, SECRET, 0).is_err());
    }

    #[test]
    fn test_expired_and_wrong_secret_rejected() {
        let expired = token("42", &["ADMIN"], "access", -600);
        assert!(JwtUtils::verify_access_token_with_secret(&expired, SECRET, 30).is_err());

        let t = token("42", &["ADMIN"], "access", 600);
        assert!(JwtUtils::verify_access_token_with_secret(&t, b"other", 0).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let t = token("alice", &["ADMIN"], "access", 600);
        let claims = JwtUtils::verify_access_token_with_secret(&t, SECRET, 0).unwrap();
        assert!(claims.into_principal().is_err());
    }
}
