use portal_backend::{
    db::connection::{create_pool, DbPool},
    error::StorageError,
    repositories::{CredentialRepository, SqlCredentialRepository},
};
use uuid::Uuid;

async fn memory_pool() -> DbPool {
    create_pool("sqlite::memory:").await.expect("in-memory pool")
}

async fn user_count(pool: &DbPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .expect("count users")
}

#[tokio::test]
async fn ensure_seeded_inserts_bootstrap_users_once() {
    let repo = SqlCredentialRepository::new(memory_pool().await);
    repo.ensure_seeded().await.expect("seed");
    repo.ensure_seeded().await.expect("seed again");
    assert_eq!(user_count(repo.pool()).await, 3);
}

#[tokio::test]
async fn finds_user_by_exact_credentials() {
    let repo = SqlCredentialRepository::new(memory_pool().await);
    repo.ensure_seeded().await.expect("seed");

    let admin = repo
        .find_by_credentials("admin", "admin123")
        .await
        .expect("lookup")
        .expect("admin exists");
    assert_eq!(admin.id.value(), 1);
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.email, "admin@example.com");
    assert_eq!(admin.full_name, "管理者");

    let user2 = repo
        .find_by_credentials("user2", "pass456")
        .await
        .expect("lookup")
        .expect("user2 exists");
    assert_eq!(user2.full_name, "佐藤花子");
}

#[tokio::test]
async fn lookups_are_exact_and_case_sensitive() {
    let repo = SqlCredentialRepository::new(memory_pool().await);
    repo.ensure_seeded().await.expect("seed");

    for (username, password) in [
        ("admin", "wrong"),
        ("Admin", "admin123"),
        ("admin", "ADMIN123"),
        (" admin", "admin123"),
        ("user1", "pass456"),
        ("nobody", "admin123"),
    ] {
        let found = repo
            .find_by_credentials(username, password)
            .await
            .expect("lookup");
        assert!(found.is_none(), "{:?}/{:?} should not match", username, password);
    }
}

#[tokio::test]
async fn injection_attempts_are_bound_as_data() {
    let repo = SqlCredentialRepository::new(memory_pool().await);
    repo.ensure_seeded().await.expect("seed");

    for (username, password) in [
        ("admin' --", "anything"),
        ("admin", "' OR '1'='1"),
        ("' OR 1=1; DROP TABLE users; --", "x"),
    ] {
        let found = repo
            .find_by_credentials(username, password)
            .await
            .expect("lookup");
        assert!(found.is_none());
    }
    assert_eq!(user_count(repo.pool()).await, 3);
}

#[tokio::test]
async fn existing_rows_suppress_bootstrap() {
    let pool = memory_pool().await;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    sqlx::query("INSERT INTO users (username, password, email, full_name) VALUES (?, ?, ?, ?)")
        .bind("operator")
        .bind("s3cret")
        .bind("operator@example.com")
        .bind("Operator")
        .execute(&pool)
        .await
        .expect("insert operator");

    let repo = SqlCredentialRepository::new(pool);
    repo.ensure_seeded().await.expect("seed");
    assert_eq!(user_count(repo.pool()).await, 1);
    assert!(repo
        .find_by_credentials("admin", "admin123")
        .await
        .expect("lookup")
        .is_none());
    assert!(repo
        .find_by_credentials("operator", "s3cret")
        .await
        .expect("lookup")
        .is_some());
}

#[tokio::test]
async fn missing_schema_is_a_storage_error() {
    let repo = SqlCredentialRepository::new(memory_pool().await);
    let err = repo
        .find_by_credentials("admin", "admin123")
        .await
        .expect_err("users table does not exist");
    assert!(matches!(err, StorageError::Database(_)));
}

#[tokio::test]
async fn seeding_survives_reopening_the_database_file() {
    let path = std::env::temp_dir().join(format!("portal-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());

    {
        let repo = SqlCredentialRepository::new(create_pool(&url).await.expect("pool"));
        repo.ensure_seeded().await.expect("seed");
        repo.pool().close().await;
    }

    let repo = SqlCredentialRepository::new(create_pool(&url).await.expect("reopen"));
    repo.ensure_seeded().await.expect("seed after reopen");
    assert_eq!(user_count(repo.pool()).await, 3);
    assert!(repo
        .find_by_credentials("user1", "pass123")
        .await
        .expect("lookup")
        .is_some());
    repo.pool().close().await;

    let _ = std::fs::remove_file(&path);
}
