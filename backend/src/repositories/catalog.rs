//! Read-only exercise catalog queries

use anyhow::Result;
use fitcontrol_shared::{Exercise, Muscle, MuscleGroup};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MuscleGroupRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MuscleRecord {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub muscle_id: i64,
    pub name: String,
    pub description: String,
}

impl From<MuscleGroupRecord> for MuscleGroup {
    fn from(r: MuscleGroupRecord) -> Self {
        MuscleGroup { id: r.id, name: r.name }
    }
}

impl From<MuscleRecord> for Muscle {
    fn from(r: MuscleRecord) -> Self {
        Muscle {
            id: r.id,
            group_id: r.group_id,
            name: r.name,
        }
    }
}

impl From<ExerciseRecord> for Exercise {
    fn from(r: ExerciseRecord) -> Self {
        Exercise {
            id: r.id,
            muscle_id: r.muscle_id,
            name: r.name,
            description: r.description,
        }
    }
}

pub struct CatalogRepository;

impl CatalogRepository {
    pub async fn muscle_groups(pool: &PgPool) -> Result<Vec<MuscleGroupRecord>> {
        let records = sqlx::query_as::<_, MuscleGroupRecord>(
            "SELECT id, name FROM muscle_groups ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn muscle_group_exists(pool: &PgPool, group_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM muscle_groups WHERE id = $1)",
        )
        .bind(group_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// All muscles, or only those of one group
    pub async fn muscles(pool: &PgPool, group_id: Option<i64>) -> Result<Vec<MuscleRecord>> {
        let records = sqlx::query_as::<_, MuscleRecord>(
            r#"
            SELECT id, group_id, name
            FROM muscles
            WHERE $1::BIGINT IS NULL OR group_id = $1
            ORDER BY name
            "#,
        )
        .bind(group_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn muscle_exists(pool: &PgPool, muscle_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM muscles WHERE id = $1)",
        )
        .bind(muscle_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    pub async fn exercises_for_muscle(pool: &PgPool, muscle_id: i64) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, muscle_id, name, description
            FROM exercises
            WHERE muscle_id = $1
            ORDER BY name
            "#,
        )
        .bind(muscle_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn exercise(pool: &PgPool, id: i64) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            "SELECT id, muscle_id, name, description FROM exercises WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Ids from `ids` that do not exist in the catalog
    pub async fn missing_exercises(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>> {
        let missing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT wanted.id
            FROM UNNEST($1::BIGINT[]) AS wanted(id)
            WHERE NOT EXISTS (SELECT 1 FROM exercises e WHERE e.id = wanted.id)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(missing)
    }
}
