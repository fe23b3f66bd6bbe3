use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use safar_core::guide::{GuideProfile, ProfileUpdate, SearchFilter};
use safar_core::repository::{GuideRepository, RepoError};

pub struct PgGuideRepository {
    pool: PgPool,
}

impl PgGuideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GuideRow {
    id: Uuid,
    full_name: String,
    email: String,
    phone: Option<String>,
    city: String,
    languages: Vec<String>,
    experience: String,
    hourly_rate: i64,
    bio: Option<String>,
    profile_image: String,
    rating: f64,
    total_tours: i32,
    request_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GuideRow> for GuideProfile {
    fn from(row: GuideRow) -> Self {
        GuideProfile {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            city: row.city,
            languages: row.languages,
            experience: row.experience,
            hourly_rate: row.hourly_rate,
            bio: row.bio,
            profile_image: row.profile_image,
            rating: row.rating,
            total_tours: row.total_tours,
            request_count: row.request_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const GUIDE_COLUMNS: &str = "id, full_name, email, phone, city, languages, experience, \
     hourly_rate, bio, profile_image, rating, total_tours, request_count, created_at, updated_at";

#[async_trait]
impl GuideRepository for PgGuideRepository {
    async fn create(&self, guide: &GuideProfile) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO guides (id, full_name, email, phone, city, languages, experience,
                hourly_rate, bio, profile_image, rating, total_tours, request_count,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(guide.id)
        .bind(&guide.full_name)
        .bind(&guide.email)
        .bind(&guide.phone)
        .bind(&guide.city)
        .bind(&guide.languages)
        .bind(&guide.experience)
        .bind(guide.hourly_rate)
        .bind(&guide.bio)
        .bind(&guide.profile_image)
        .bind(guide.rating)
        .bind(guide.total_tours)
        .bind(guide.request_count)
        .bind(guide.created_at)
        .bind(guide.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GuideProfile>, RepoError> {
        let row: Option<GuideRow> =
            sqlx::query_as(&format!("SELECT {GUIDE_COLUMNS} FROM guides WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(GuideProfile::from))
    }

    async fn update(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<GuideProfile>, RepoError> {
        let row: Option<GuideRow> = sqlx::query_as(&format!(
            r#"
            UPDATE guides SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                city = COALESCE($5, city),
                languages = COALESCE($6, languages),
                experience = COALESCE($7, experience),
                hourly_rate = COALESCE($8, hourly_rate),
                bio = COALESCE($9, bio),
                profile_image = COALESCE($10, profile_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {GUIDE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.city)
        .bind(&update.languages)
        .bind(&update.experience)
        .bind(update.hourly_rate)
        .bind(&update.bio)
        .bind(&update.profile_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GuideProfile::from))
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<GuideProfile>, RepoError> {
        // Absent filters collapse to IS NULL and match every row.
        let rows: Vec<GuideRow> = sqlx::query_as(&format!(
            r#"
            SELECT {GUIDE_COLUMNS} FROM guides
            WHERE ($1::text IS NULL OR city = $1)
              AND ($2::text[] IS NULL OR languages && $2)
              AND ($3::double precision IS NULL OR rating >= $3)
              AND ($4::bigint IS NULL OR hourly_rate <= $4)
            "#
        ))
        .bind(&filter.city)
        .bind(&filter.languages)
        .bind(filter.min_rating)
        .bind(filter.max_price)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GuideProfile::from).collect())
    }

    async fn record_rating(
        &self,
        id: Uuid,
        rating: f64,
    ) -> Result<Option<GuideProfile>, RepoError> {
        // The weighted average and the tour counter move in one statement.
        let row: Option<GuideRow> = sqlx::query_as(&format!(
            r#"
            UPDATE guides SET
                rating = (rating * total_tours + $2) / (total_tours + 1),
                total_tours = total_tours + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {GUIDE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(rating)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GuideProfile::from))
    }

    async fn increment_request_count(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE guides SET request_count = request_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
