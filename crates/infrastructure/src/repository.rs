//! PostgreSQL 用户存储实现。
//!
//! `PgUserRepository` 直接工作在连接池上，服务同步读路径；
//! `PgUserSession` 包装单个事务，服务消费端的写路径，
//! 每条消息独享一个会话，提交或回滚由持有方显式决定。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{PasswordHash, PersonName, RepositoryError, User, UserEmail, UserId};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use uuid::Uuid;

use application::UserRepository;

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict;
        }
    }
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let name =
            PersonName::parse(value.name).map_err(|err| invalid_data(err.to_string()))?;
        let email =
            UserEmail::parse(value.email).map_err(|err| invalid_data(err.to_string()))?;
        let password = PasswordHash::new(value.password_hash)
            .map_err(|err| invalid_data(err.to_string()))?;

        Ok(User::with_id(
            UserId::from(value.id),
            name,
            email,
            password,
            value.created_at,
        ))
    }
}

const INSERT_USER: &str = r#"
INSERT INTO users (id, name, email, password_hash, created_at)
VALUES ($1, $2, $3, $4, $5)
RETURNING id, name, email, password_hash, created_at
"#;

const SELECT_BY_EMAIL: &str =
    r#"SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1"#;

const SELECT_BY_ID: &str =
    r#"SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1"#;

/// 连接池上的用户仓储，用于读路径与非事务访问。
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(INSERT_USER)
            .bind(Uuid::from(user.id))
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_str())
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_email(&self, email: UserEmail) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(SELECT_BY_EMAIL)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(SELECT_BY_ID)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }
}

/// 单个事务范围内的用户存储会话。
///
/// 消费端为每条在途消息开启一个会话；`commit`/`rollback` 之后会话即失效，
/// 未显式终结就被丢弃时，底层事务按 sqlx 默认行为回滚。
pub struct PgUserSession {
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
}

impl PgUserSession {
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        let tx = pool.begin().await.map_err(map_sqlx_err)?;
        Ok(Self {
            tx: Mutex::new(Some(tx)),
        })
    }

    pub async fn commit(&self) -> Result<(), RepositoryError> {
        let tx = self.take_tx().await?;
        tx.commit().await.map_err(map_sqlx_err)
    }

    pub async fn rollback(&self) -> Result<(), RepositoryError> {
        let tx = self.take_tx().await?;
        tx.rollback().await.map_err(map_sqlx_err)
    }

    async fn take_tx(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or_else(|| RepositoryError::storage("transaction already completed"))
    }
}

#[async_trait]
impl UserRepository for PgUserSession {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| RepositoryError::storage("transaction already completed"))?;

        let record = sqlx::query_as::<_, UserRecord>(INSERT_USER)
            .bind(Uuid::from(user.id))
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_str())
            .bind(user.created_at)
            .fetch_one(&mut **tx)
            .await
            .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_email(&self, email: UserEmail) -> Result<Option<User>, RepositoryError> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| RepositoryError::storage("transaction already completed"))?;

        let record = sqlx::query_as::<_, UserRecord>(SELECT_BY_EMAIL)
            .bind(email.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| RepositoryError::storage("transaction already completed"))?;

        let record = sqlx::query_as::<_, UserRecord>(SELECT_BY_ID)
            .bind(Uuid::from(id))
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }
}
