use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use safar_core::account::{GuideAccount, TouristAccount};
use safar_core::repository::{GuideAccountRepository, RepoError, TouristAccountRepository};

pub struct PgGuideAccountRepository {
    pool: PgPool,
}

impl PgGuideAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct GuideAccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    has_profile: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GuideAccountRow> for GuideAccount {
    fn from(row: GuideAccountRow) -> Self {
        GuideAccount {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            has_profile: row.has_profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const GUIDE_ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, full_name, has_profile, created_at, updated_at";

#[async_trait]
impl GuideAccountRepository for PgGuideAccountRepository {
    async fn create(&self, account: &GuideAccount) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO guide_accounts (id, email, password_hash, full_name, has_profile, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.has_profile)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideAccount>, RepoError> {
        let row: Option<GuideAccountRow> = sqlx::query_as(&format!(
            "SELECT {GUIDE_ACCOUNT_COLUMNS} FROM guide_accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GuideAccount::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<GuideAccount>, RepoError> {
        let row: Option<GuideAccountRow> = sqlx::query_as(&format!(
            "SELECT {GUIDE_ACCOUNT_COLUMNS} FROM guide_accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GuideAccount::from))
    }

    async fn set_has_profile(&self, id: Uuid, has_profile: bool) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE guide_accounts SET has_profile = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(has_profile)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub struct PgTouristAccountRepository {
    pool: PgPool,
}

impl PgTouristAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TouristAccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    nationality: String,
    has_profile: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TouristAccountRow> for TouristAccount {
    fn from(row: TouristAccountRow) -> Self {
        TouristAccount {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            nationality: row.nationality,
            has_profile: row.has_profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TOURIST_ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, full_name, nationality, has_profile, created_at, updated_at";

#[async_trait]
impl TouristAccountRepository for PgTouristAccountRepository {
    async fn create(&self, account: &TouristAccount) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO tourist_accounts (id, email, password_hash, full_name, nationality, has_profile, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(&account.nationality)
        .bind(account.has_profile)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TouristAccount>, RepoError> {
        let row: Option<TouristAccountRow> = sqlx::query_as(&format!(
            "SELECT {TOURIST_ACCOUNT_COLUMNS} FROM tourist_accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TouristAccount::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<TouristAccount>, RepoError> {
        let row: Option<TouristAccountRow> = sqlx::query_as(&format!(
            "SELECT {TOURIST_ACCOUNT_COLUMNS} FROM tourist_accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TouristAccount::from))
    }
}
