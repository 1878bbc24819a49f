/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use cadence_core::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // Token id, unique per issue
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims of a signed offline-download grant
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadClaims {
    pub sub: String,
    pub song_id: String,
    pub exp: i64,
    pub iat: i64,
}

/// Lifetime of a download grant
pub const DOWNLOAD_TOKEN_DAYS: i64 = 30;

/// Access and refresh token issued together
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthService {
    pub fn new(secret: String, access_expiration_minutes: u64, refresh_expiration_days: u64) -> Self {
        Self {
            secret,
            access_token_expiration: Duration::minutes(access_expiration_minutes as i64),
            refresh_token_expiration: Duration::days(refresh_expiration_days as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Use a different bcrypt work factor (tests use the minimum)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create an access token
    pub fn create_access_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(user_id, TokenType::Access, self.access_token_expiration)
    }

    /// Create a refresh token
    pub fn create_refresh_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(user_id, TokenType::Refresh, self.refresh_token_expiration)
    }

    pub fn issue_tokens(&self, user_id: &UserId) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_access_token(user_id)?,
            refresh_token: self.create_refresh_token(user_id)?,
        })
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify that a token is an access token
    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(UserId::new(claims.sub))
    }

    /// Verify that a token is a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(UserId::new(claims.sub))
    }

    /// Sign a download grant for one song; returns the token and its expiry
    pub fn create_download_token(
        &self,
        user_id: &UserId,
        song_id: &str,
    ) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::days(DOWNLOAD_TOKEN_DAYS);

        let claims = DownloadClaims {
            sub: user_id.as_str().to_string(),
            song_id: song_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)?;
        Ok((token, expires_at))
    }

    /// Decode a download grant into the user and song it was issued for
    pub fn verify_download_token(&self, token: &str) -> Result<(UserId, String)> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<DownloadClaims>(token, &decoding_key, &Validation::default())?;
        Ok((UserId::new(data.claims.sub), data.claims.song_id))
    }

    fn create_token(
        &self,
        user_id: &UserId,
        token_type: TokenType,
        expiration: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + expiration;

        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("secret".to_string(), 15, 7).with_bcrypt_cost(4)
    }

    #[test]
    fn test_password_hashing() {
        let auth = service();
        let password = "my_secure_password";

        let hash = auth.hash_password(password).unwrap();
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_token_creation_and_verification() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let access_token = auth.create_access_token(&user_id).unwrap();
        let verified_id = auth.verify_access_token(&access_token).unwrap();
        assert_eq!(verified_id, user_id);

        let refresh_token = auth.create_refresh_token(&user_id).unwrap();
        let verified_id = auth.verify_refresh_token(&refresh_token).unwrap();
        assert_eq!(verified_id, user_id);
    }

    #[test]
    fn test_token_type_validation() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let access_token = auth.create_access_token(&user_id).unwrap();
        assert!(auth.verify_refresh_token(&access_token).is_err());

        let refresh_token = auth.create_refresh_token(&user_id).unwrap();
        assert!(auth.verify_access_token(&refresh_token).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let first = auth.issue_tokens(&user_id).unwrap();
        let second = auth.issue_tokens(&user_id).unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_download_token_names_song() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let (token, expires_at) = auth.create_download_token(&user_id, "song-7").unwrap();
        assert_eq!(
            auth.verify_download_token(&token).unwrap(),
            (user_id, "song-7".to_string())
        );
        assert_eq!((expires_at - Utc::now()).num_days(), DOWNLOAD_TOKEN_DAYS - 1);

        // A download grant is not a session
        assert!(auth.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = AuthService::new("other".to_string(), 15, 7);
        let token = other.create_access_token(&UserId::new("user-123")).unwrap();
        assert!(service().verify_access_token(&token).is_err());
    }
}
