//! SQLite implementation of the VillageRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_datetime, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AiAnalysisResult, Comment, Coordinates, RiskLevel, Village};
use crate::domain::ports::VillageRepository;

const SELECT_COLUMNS: &str = "SELECT id, name, district, lat, lng, population, active_cases, status, \
    last_reported, last_reporter_name, dominant_symptoms, comments, last_analysis FROM villages";

#[derive(Clone)]
pub struct SqliteVillageRepository {
    pool: SqlitePool,
}

impl SqliteVillageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VillageRepository for SqliteVillageRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Village>> {
        let row: Option<VillageRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn upsert(&self, village: &Village) -> DomainResult<()> {
        let symptoms_json = serde_json::to_string(&village.dominant_symptoms)?;
        let comments_json = serde_json::to_string(&village.comments)?;
        let analysis_json = village
            .last_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"INSERT INTO villages (id, name, district, lat, lng, population, active_cases, status,
                   last_reported, last_reporter_name, dominant_symptoms, comments, last_analysis)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   district = excluded.district,
                   lat = excluded.lat,
                   lng = excluded.lng,
                   population = excluded.population,
                   active_cases = excluded.active_cases,
                   status = excluded.status,
                   last_reported = excluded.last_reported,
                   last_reporter_name = excluded.last_reporter_name,
                   dominant_symptoms = excluded.dominant_symptoms,
                   comments = excluded.comments,
                   last_analysis = excluded.last_analysis"#,
        )
        .bind(&village.id)
        .bind(&village.name)
        .bind(&village.district)
        .bind(village.coordinates.lat)
        .bind(village.coordinates.lng)
        .bind(i64::from(village.population))
        .bind(i64::from(village.active_cases))
        .bind(village.status.as_str())
        .bind(village.last_reported.to_rfc3339())
        .bind(&village.last_reporter_name)
        .bind(&symptoms_json)
        .bind(&comments_json)
        .bind(&analysis_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn all(&self) -> DomainResult<Vec<Village>> {
        let rows: Vec<VillageRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY seq"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn add_comment(&self, village_id: &str, comment: &Comment) -> DomainResult<bool> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Option<String>,)> =
            sqlx::query_as("SELECT comments FROM villages WHERE id = ?")
                .bind(village_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((comments_json,)) = existing else {
            return Ok(false);
        };

        let mut comments: Vec<Comment> = parse_json_or_default(comments_json)?;
        comments.insert(0, comment.clone());

        sqlx::query("UPDATE villages SET comments = ? WHERE id = ?")
            .bind(serde_json::to_string(&comments)?)
            .bind(village_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn count(&self) -> DomainResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM villages")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[derive(sqlx::FromRow)]
struct VillageRow {
    id: String,
    name: String,
    district: String,
    lat: f64,
    lng: f64,
    population: i64,
    active_cases: i64,
    status: String,
    last_reported: String,
    last_reporter_name: Option<String>,
    dominant_symptoms: Option<String>,
    comments: Option<String>,
    last_analysis: Option<String>,
}

fn parse_count(field: &str, value: i64) -> DomainResult<u32> {
    u32::try_from(value)
        .map_err(|_| DomainError::SerializationError(format!("Invalid {field}: {value}")))
}

impl TryFrom<VillageRow> for Village {
    type Error = DomainError;

    fn try_from(row: VillageRow) -> Result<Self, Self::Error> {
        let status = RiskLevel::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid status: {}", row.status))
        })?;

        let last_analysis: Option<AiAnalysisResult> = row
            .last_analysis
            .map(|s| serde_json::from_str(&s))
            .transpose()?;

        Ok(Village {
            id: row.id,
            name: row.name,
            district: row.district,
            coordinates: Coordinates::new(row.lat, row.lng),
            population: parse_count("population", row.population)?,
            active_cases: parse_count("active_cases", row.active_cases)?,
            status,
            last_reported: parse_datetime(&row.last_reported)?,
            last_reporter_name: row.last_reporter_name,
            dominant_symptoms: parse_json_or_default(row.dominant_symptoms)?,
            comments: parse_json_or_default(row.comments)?,
            last_analysis,
        })
    }
}
