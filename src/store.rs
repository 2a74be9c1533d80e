use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{Activity, ActivityCategory, ActivityStatus};

const DEFAULT_ACTIVITIES: &str = include_str!("../data/activities.json");

/// Validated, read-only list of activities in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityStore {
    activities: Vec<Activity>,
}

impl ActivityStore {
    /// Rejects empty or duplicate ids and activities that end before they start.
    pub fn new(activities: Vec<Activity>) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        for (index, activity) in activities.iter().enumerate() {
            if activity.id.trim().is_empty() {
                return Err(StoreError::EmptyId { index });
            }
            if !seen.insert(activity.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    id: activity.id.clone(),
                });
            }
            if activity.end < activity.start {
                return Err(StoreError::EndBeforeStart {
                    id: activity.id.clone(),
                    start: activity.start,
                    end: activity.end,
                });
            }
        }

        Ok(Self { activities })
    }

    /// The Westview Charter School schedule bundled with the binary.
    pub fn embedded() -> Result<Self, StoreError> {
        Self::from_json_reader(DEFAULT_ACTIVITIES.as_bytes())
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let activities: Vec<Activity> = serde_json::from_reader(reader)?;
        Self::new(activities)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut activities = Vec::new();

        for (index, result) in reader.deserialize::<ActivityRow>().enumerate() {
            let row = result?;
            let id = row.id.clone().ok_or(StoreError::EmptyId { index })?;
            activities.push(row.into_activity(id));
        }

        Self::new(activities)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let file = std::fs::File::open(path)?;

        let store = match extension.as_str() {
            "json" => Self::from_json_reader(std::io::BufReader::new(file))?,
            "csv" => Self::from_csv_reader(file)?,
            other => return Err(StoreError::UnsupportedFormat(other.to_string())),
        };

        tracing::info!(
            path = %path.display(),
            activities = store.len(),
            "loaded activity store"
        );
        Ok(store)
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Flat CSV layout shared by file loading and database import.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub id: Option<String>,
    pub title: String,
    pub class_name: String,
    #[serde(rename = "type")]
    pub category: ActivityCategory,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ActivityStatus,
    pub staff_lead: String,
    pub participants: u32,
    pub focus_area: String,
}

impl ActivityRow {
    pub fn into_activity(self, id: String) -> Activity {
        Activity {
            id,
            title: self.title,
            class_name: self.class_name,
            category: self.category,
            description: self.description,
            location: self.location,
            start: self.start,
            end: self.end,
            status: self.status,
            staff_lead: self.staff_lead,
            participants: self.participants,
            focus_area: self.focus_area,
        }
    }
}
