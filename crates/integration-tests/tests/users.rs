//! Integration tests for user credentials and the user service.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `COMMERCE_TEST_DATABASE_URL`.

use commerce_core::Email;
use commerce_integration_tests::{TEST_PASSWORD, TestContext};
use commerce_store::db::{RepositoryError, UserRepository};
use commerce_store::dto::UserDto;
use commerce_store::models::User;
use commerce_store::services::{ServiceError, UserService};

fn unique_email() -> Email {
    Email::parse(&format!("{}@example.com", TestContext::unique("user")))
        .expect("Generated email should be valid")
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_password_hashed_on_insert() {
    let ctx = TestContext::new().await;
    let repo = UserRepository::new(&ctx.pool);

    let user = repo
        .save(User::new("A", "B", unique_email(), "secret"))
        .await
        .expect("Failed to save user");

    assert_ne!(user.password, "secret");
    assert!(user.password.starts_with("$argon2"));
    assert!(user.check_password("secret"));
    assert!(!user.check_password("wrong"));

    let stored = repo
        .get_by_id(user.id.expect("User should have an id"))
        .await
        .expect("Failed to fetch user");
    assert!(stored.check_password("secret"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_empty_password_rejected_on_insert() {
    let ctx = TestContext::new().await;
    let repo = UserRepository::new(&ctx.pool);

    let result = repo.save(User::new("A", "B", unique_email(), "")).await;
    assert!(matches!(result, Err(RepositoryError::Validation(_))));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_update_password_handling() {
    let ctx = TestContext::new().await;
    let repo = UserRepository::new(&ctx.pool);
    let user = ctx.create_user().await;
    let original_hash = user.password.clone();

    // Unchanged hash is kept as is
    let mut same = user.clone();
    same.first_name = "Renamed".to_string();
    let same = repo.save(same).await.expect("Update failed");
    assert_eq!(same.password, original_hash);
    assert_eq!(same.first_name, "Renamed");

    // Empty password keeps the stored hash
    let mut blank = same.clone();
    blank.password = String::new();
    let blank = repo.save(blank).await.expect("Update failed");
    assert_eq!(blank.password, original_hash);
    assert!(blank.check_password(TEST_PASSWORD));

    // A new plaintext is re-hashed
    let mut changed = blank.clone();
    changed.password = "another password".to_string();
    let changed = repo.save(changed).await.expect("Update failed");
    assert_ne!(changed.password, original_hash);
    assert!(changed.check_password("another password"));
    assert!(!changed.check_password(TEST_PASSWORD));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_get_by_email() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user().await;

    let found = UserRepository::new(&ctx.pool)
        .get_by_email(&user.email)
        .await
        .expect("Lookup failed")
        .expect("User should be found");
    assert_eq!(found.id, user.id);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_register_and_authenticate() {
    let ctx = TestContext::new().await;
    let service = UserService::new(&ctx.pool);
    let email = unique_email();

    let dto = UserDto {
        id: None,
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: email.clone(),
        password: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    };

    let weak = service.register(dto.clone().with_password("short")).await;
    assert!(matches!(weak, Err(ServiceError::WeakPassword(_))));

    let registered = service
        .register(dto.clone().with_password("long enough password"))
        .await
        .expect("Registration failed");
    assert!(registered.id.is_some());
    assert!(registered.password.is_none());

    let duplicate = service
        .register(dto.with_password("long enough password"))
        .await;
    assert!(matches!(duplicate, Err(ServiceError::UserAlreadyExists)));

    let authenticated = service
        .authenticate(email.as_str(), "long enough password")
        .await
        .expect("Authentication failed");
    assert_eq!(authenticated.id, registered.id);

    let wrong = service.authenticate(email.as_str(), "wrong password").await;
    assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));

    let unknown = service
        .authenticate("nobody@example.com", "long enough password")
        .await;
    assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));
}
