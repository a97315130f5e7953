//! PostgreSQL 仓储集成测试
//!
//! 需要可用的 PostgreSQL。设置 PG_INTEGRATION_TEST=1 与 DATABASE_URL 后运行。

use std::sync::Arc;

use application::UserRepository;
use chrono::Utc;
use domain::{PasswordHash, PersonName, RepositoryError, User, UserEmail};
use infrastructure::{create_pg_pool, PgUserRepository, PgUserSession};
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    if std::env::var("PG_INTEGRATION_TEST").is_err() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL is required for this test");
    let pool = create_pg_pool(&url, 5).await.expect("failed to connect");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    Some(pool)
}

fn fresh_user() -> User {
    let unique = Uuid::new_v4().simple();
    User::create(
        PersonName::parse("Ann").unwrap(),
        UserEmail::parse(format!("ann-{unique}@x.com")).unwrap(),
        PasswordHash::new("$2b$04$integrationtesthash").unwrap(),
        Utc::now(),
    )
}

#[tokio::test]
async fn save_and_find_back() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PgUserRepository::new(pool);

    let user = fresh_user();
    let stored = repository.save(user.clone()).await.unwrap();
    assert_eq!(stored.id, user.id);

    let by_id = repository.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, user.email);

    let by_email = repository
        .find_by_email(user.email.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn duplicate_email_hits_unique_constraint() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PgUserRepository::new(pool);

    let user = fresh_user();
    repository.save(user.clone()).await.unwrap();

    let duplicate = User::create(
        user.name.clone(),
        user.email.clone(),
        user.password.clone(),
        Utc::now(),
    );
    let err = repository.save(duplicate).await.unwrap_err();
    assert_eq!(err, RepositoryError::Conflict);
}

#[tokio::test]
async fn rolled_back_session_leaves_no_trace() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user = fresh_user();
    let session = Arc::new(PgUserSession::begin(&pool).await.unwrap());
    session.save(user.clone()).await.unwrap();
    session.rollback().await.unwrap();

    let repository = PgUserRepository::new(pool);
    assert!(repository
        .find_by_email(user.email)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn committed_session_is_visible_outside_the_transaction() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user = fresh_user();
    let session = Arc::new(PgUserSession::begin(&pool).await.unwrap());
    // 会话内可见自己的未提交写入
    session.save(user.clone()).await.unwrap();
    assert!(session
        .find_by_email(user.email.clone())
        .await
        .unwrap()
        .is_some());
    session.commit().await.unwrap();

    let repository = PgUserRepository::new(pool);
    assert!(repository
        .find_by_email(user.email)
        .await
        .unwrap()
        .is_some());
}
