use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::Activity;
use crate::store::{ActivityRow, ActivityStore};

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const ACTIVITY_COLUMNS: &str = "id, title, class_name, category, description, location, \
     starts_at, ends_at, status, staff_lead, participants, focus_area";

/// What to do when an activity id is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnConflict {
    Update,
    Skip,
}

impl OnConflict {
    fn clause(self) -> &'static str {
        match self {
            Self::Update => {
                "DO UPDATE SET title = EXCLUDED.title, \
                 class_name = EXCLUDED.class_name, \
                 category = EXCLUDED.category, \
                 description = EXCLUDED.description, \
                 location = EXCLUDED.location, \
                 starts_at = EXCLUDED.starts_at, \
                 ends_at = EXCLUDED.ends_at, \
                 status = EXCLUDED.status, \
                 staff_lead = EXCLUDED.staff_lead, \
                 participants = EXCLUDED.participants, \
                 focus_area = EXCLUDED.focus_area"
            }
            Self::Skip => "DO NOTHING",
        }
    }
}

fn insert_sql(on_conflict: OnConflict) -> String {
    format!(
        "INSERT INTO activity_dashboard.activities ({ACTIVITY_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (id) {}",
        on_conflict.clause()
    )
}

async fn insert_activity(
    pool: &PgPool,
    activity: &Activity,
    on_conflict: OnConflict,
) -> anyhow::Result<u64> {
    let participants = i32::try_from(activity.participants)
        .with_context(|| format!("participant count out of range for {}", activity.id))?;

    let sql = insert_sql(on_conflict);
    let result = sqlx::query(&sql)
        .bind(&activity.id)
        .bind(&activity.title)
        .bind(&activity.class_name)
        .bind(activity.category.label())
        .bind(&activity.description)
        .bind(&activity.location)
        .bind(activity.start)
        .bind(activity.end)
        .bind(activity.status.label())
        .bind(&activity.staff_lead)
        .bind(participants)
        .bind(&activity.focus_area)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let store = ActivityStore::embedded().context("embedded activity data is invalid")?;

    for activity in store.activities() {
        insert_activity(pool, activity, OnConflict::Update).await?;
    }

    tracing::info!(activities = store.len(), "seeded activity schedule");
    Ok(store.len())
}

pub async fn fetch_activities(pool: &PgPool) -> anyhow::Result<ActivityStore> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activity_dashboard.activities ORDER BY starts_at, id"
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let mut activities = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let category: String = row.get("category");
        let status: String = row.get("status");
        let participants: i32 = row.get("participants");

        activities.push(Activity {
            title: row.get("title"),
            class_name: row.get("class_name"),
            category: category
                .parse()
                .with_context(|| format!("activity {id} has an invalid category"))?,
            description: row.get("description"),
            location: row.get("location"),
            start: row.get("starts_at"),
            end: row.get("ends_at"),
            status: status
                .parse()
                .with_context(|| format!("activity {id} has an invalid status"))?,
            staff_lead: row.get("staff_lead"),
            participants: u32::try_from(participants)
                .with_context(|| format!("activity {id} has a negative participant count"))?,
            focus_area: row.get("focus_area"),
            id,
        });
    }

    let store = ActivityStore::new(activities)?;
    tracing::info!(activities = store.len(), "fetched activity store from Postgres");
    Ok(store)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<ActivityRow>() {
        let row = result?;
        let id = row
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
        let activity = row.into_activity(id);

        if activity.end < activity.start {
            tracing::warn!(id = %activity.id, "skipping activity that ends before it starts");
            continue;
        }

        if insert_activity(pool, &activity, OnConflict::Skip).await? > 0 {
            inserted += 1;
        }
    }

    tracing::info!(inserted, path = %csv_path.display(), "imported activities");
    Ok(inserted)
}
