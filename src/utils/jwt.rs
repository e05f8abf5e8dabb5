use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// 统一的令牌校验失败信息，不区分过期、签名错误或算法不符
pub const INVALID_TOKEN: &str = "invalid token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub iat: i64, // 签发时间
    pub exp: i64, // 过期时间
    pub nbf: i64, // 生效时间
}

// 登录/注册返回的令牌对
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// access token 有效秒数
    pub expires_in: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// 使用配置中的密钥签发令牌
    pub fn generate_token(
        user_id: i64,
        email: &str,
        role: &str,
        expiry: chrono::Duration,
    ) -> Result<String> {
        Self::generate_token_with_secret(user_id, email, role, expiry, Self::get_secret())
    }

    pub fn generate_token_with_secret(
        user_id: i64,
        email: &str,
        role: &str,
        expiry: chrono::Duration,
        secret: &str,
    ) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + expiry.num_seconds(),
            nbf: now,
        };
        Self::encode_claims(&claims, secret)
    }

    /// 按给定 Claims 直接签名（HS256）
    pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| SchoolSystemError::serialization(format!("Failed to sign token: {e}")))
    }

    /// 生成 access/refresh 令牌对，两者 Claims 结构相同，只是过期时间不同
    pub fn generate_token_pair(user_id: i64, email: &str, role: &str) -> Result<TokenPair> {
        let jwt = &AppConfig::get().jwt;
        Self::generate_token_pair_with(
            user_id,
            email,
            role,
            jwt.expiration_hours,
            jwt.refresh_expiration_days,
            &jwt.secret,
        )
    }

    pub fn generate_token_pair_with(
        user_id: i64,
        email: &str,
        role: &str,
        expiration_hours: i64,
        refresh_expiration_days: i64,
        secret: &str,
    ) -> Result<TokenPair> {
        let access = chrono::Duration::hours(expiration_hours);
        let refresh = chrono::Duration::days(refresh_expiration_days);
        Ok(TokenPair {
            access_token: Self::generate_token_with_secret(user_id, email, role, access, secret)?,
            refresh_token: Self::generate_token_with_secret(
                user_id, email, role, refresh, secret,
            )?,
            expires_in: access.num_seconds(),
        })
    }

    // 验证 JWT token
    pub fn verify_token(token: &str) -> Result<Claims> {
        Self::verify_token_with_secret(token, Self::get_secret())
    }

    /// 仅接受 HS256，时间窗口 [nbf, exp] 不留余量
    pub fn verify_token_with_secret(token: &str, secret: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "nbf", "iat"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            SchoolSystemError::authentication(INVALID_TOKEN)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn claims_with_window(exp_offset: i64, nbf_offset: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            user_id: 7,
            email: "t@school.test".to_string(),
            role: "teacher".to_string(),
            iat: now,
            exp: now + exp_offset,
            nbf: now + nbf_offset,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let token = JwtUtils::generate_token_with_secret(
            7,
            "t@school.test",
            "teacher",
            chrono::Duration::hours(1),
            SECRET,
        )
        .unwrap();
        let claims = JwtUtils::verify_token_with_secret(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "t@school.test");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_expiry_boundary() {
        let valid = JwtUtils::encode_claims(&claims_with_window(30, 0), SECRET).unwrap();
        assert!(JwtUtils::verify_token_with_secret(&valid, SECRET).is_ok());

        let expired = JwtUtils::encode_claims(&claims_with_window(-2, -10), SECRET).unwrap();
        let err = JwtUtils::verify_token_with_secret(&expired, SECRET).unwrap_err();
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[test]
    fn test_not_yet_valid_rejected() {
        let token = JwtUtils::encode_claims(&claims_with_window(3600, 600), SECRET).unwrap();
        assert!(JwtUtils::verify_token_with_secret(&token, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::encode_claims(&claims_with_window(60, 0), SECRET).unwrap();
        let err = JwtUtils::verify_token_with_secret(&token, "another-secret").unwrap_err();
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[test]
    fn test_non_hs256_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims_with_window(60, 0),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = JwtUtils::verify_token_with_secret(&token, SECRET).unwrap_err();
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(JwtUtils::verify_token_with_secret("not.a.token", SECRET).is_err());
    }

    #[test]
    fn test_token_pair_expiry() {
        let pair =
            JwtUtils::generate_token_pair_with(3, "a@b.test", "teacher", 24, 7, SECRET).unwrap();
        assert_eq!(pair.expires_in, 24 * 3600);

        let access = JwtUtils::verify_token_with_secret(&pair.access_token, SECRET).unwrap();
        assert_eq!(access.exp, access.iat + 24 * 3600);
        assert_eq!(access.role, "teacher");

        let refresh = JwtUtils::verify_token_with_secret(&pair.refresh_token, SECRET).unwrap();
        assert_eq!(refresh.exp, refresh.iat + 7 * 24 * 3600);
        assert_eq!(refresh.user_id, access.user_id);
    }
}
