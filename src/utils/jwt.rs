use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::sea_orm_active_enums::RoleEnum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    pub sub: String,
    pub user_id: i32,
    pub name: String,
    pub role: RoleEnum,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn create_jwt(&self, user_id: i32, name: &str, role: RoleEnum) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            user_id,
            name: name.to_string(),
            role,
            iat: now,
            exp: now + self.expires_in,
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    pub fn decode_jwt(&self, token: &str) -> anyhow::Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .context("Failed to verify token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_decode() {
        let manager = JwtManager::new("test-secret", 3600);
        let token = manager.create_jwt(42, "Ana Gómez", RoleEnum::Teacher).unwrap();

        let claims = manager.decode_jwt(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, RoleEnum::Teacher);
        assert!(claims.is_staff());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtManager::new("secret-a", 3600)
            .create_jwt(1, "Admin", RoleEnum::Admin)
            .unwrap();
        assert!(JwtManager::new("secret-b", 3600).decode_jwt(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = JwtManager::new("test-secret", -3600);
        let token = manager.create_jwt(1, "Admin", RoleEnum::Admin).unwrap();
        assert!(manager.decode_jwt(&token).is_err());
    }
}
