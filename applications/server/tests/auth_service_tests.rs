/// Authentication service tests
/// Password hashing against stored accounts, token lifetimes and rejection
use cadence_core::UserId;
use cadence_server::services::auth::{AuthService, Claims, TokenType};
use cadence_server::ServerError;
use cadence_storage::{
    users::{self, NewUser},
    Database,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

const SECRET: &str = "test-secret-key";

fn create_test_auth_service() -> AuthService {
    AuthService::new(SECRET.to_string(), 15, 7).with_bcrypt_cost(4)
}

fn signed(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Test password hashing produces salted bcrypt hashes
#[test]
fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password("MySecurePassword123!").unwrap();
    assert!(hash.starts_with("$2b$04$"));

    let hash2 = auth_service.hash_password("MySecurePassword123!").unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

/// Test a malformed stored hash surfaces as an error, not a mismatch
#[test]
fn test_verify_against_garbage_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("anything", "not-a-bcrypt-hash");
    assert!(matches!(result, Err(ServerError::Bcrypt(_))));
}

/// Test a stored account can be verified with its original password
#[tokio::test]
async fn test_stored_credentials_verify() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let auth_service = create_test_auth_service();

    let password_hash = auth_service.hash_password("hunter22").unwrap();
    let user = users::create(
        db.pool(),
        NewUser {
            email: "Listener@Example.com".to_string(),
            password_hash,
            display_name: "Listener".to_string(),
            avatar: None,
        },
    )
    .await
    .unwrap();

    // Lookup is case-insensitive on email
    let (found, stored_hash) = users::get_with_password_hash(db.pool(), "listener@example.com")
        .await
        .unwrap()
        .expect("user should exist");

    assert_eq!(found.id, user.id);
    assert!(auth_service.verify_password("hunter22", &stored_hash).unwrap());
    assert!(!auth_service.verify_password("hunter23", &stored_hash).unwrap());
}

/// Test the token subject round-trips to the same user id
#[test]
fn test_access_token_subject() {
    let auth_service = create_test_auth_service();
    let user_id = UserId::generate();

    let token = auth_service.create_access_token(&user_id).unwrap();
    let claims = auth_service.verify_token(&token).unwrap();

    assert_eq!(claims.sub, user_id.as_str());
    assert_eq!(claims.token_type, TokenType::Access);
    assert!(claims.exp > claims.iat);
}

/// Test refresh tokens outlive access tokens
#[test]
fn test_refresh_token_lifetime() {
    let auth_service = create_test_auth_service();
    let user_id = UserId::generate();

    let pair = auth_service.issue_tokens(&user_id).unwrap();
    let access = auth_service.verify_token(&pair.access_token).unwrap();
    let refresh = auth_service.verify_token(&pair.refresh_token).unwrap();

    assert_eq!(access.exp - access.iat, 15 * 60);
    assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    assert_ne!(access.jti, refresh.jti);
}

/// Test expired tokens are rejected
#[test]
fn test_expired_token_rejected() {
    let auth_service = create_test_auth_service();
    let issued = Utc::now() - Duration::hours(2);

    let claims = Claims {
        sub: "user-1".to_string(),
        iat: issued.timestamp(),
        exp: (issued + Duration::hours(1)).timestamp(),
        jti: "expired".to_string(),
        token_type: TokenType::Access,
    };

    let result = auth_service.verify_access_token(&signed(&claims, SECRET));
    assert!(matches!(result, Err(ServerError::Jwt(_))));
}

/// Test tokens signed with another secret are rejected
#[test]
fn test_tampered_token_rejected() {
    let auth_service = create_test_auth_service();
    let now = Utc::now();

    let claims = Claims {
        sub: "user-1".to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(5)).timestamp(),
        jti: "forged".to_string(),
        token_type: TokenType::Access,
    };

    assert!(auth_service
        .verify_access_token(&signed(&claims, "someone-else"))
        .is_err());
    assert!(auth_service
        .verify_access_token(&signed(&claims, SECRET))
        .is_ok());
}

/// Test garbage input is rejected
#[test]
fn test_malformed_token_rejected() {
    let auth_service = create_test_auth_service();

    assert!(auth_service.verify_token("").is_err());
    assert!(auth_service.verify_token("a.b.c").is_err());
}
