use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityCategory {
    Academics,
    Sports,
    Arts,
    Clubs,
    Community,
    Administration,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 6] = [
        ActivityCategory::Academics,
        ActivityCategory::Sports,
        ActivityCategory::Arts,
        ActivityCategory::Clubs,
        ActivityCategory::Community,
        ActivityCategory::Administration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityCategory::Academics => "Academics",
            ActivityCategory::Sports => "Sports",
            ActivityCategory::Arts => "Arts",
            ActivityCategory::Clubs => "Clubs",
            ActivityCategory::Community => "Community",
            ActivityCategory::Administration => "Administration",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityCategory {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == value)
            .ok_or_else(|| ParseError::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::Scheduled,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "Scheduled",
            ActivityStatus::InProgress => "In Progress",
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Cancelled => "Cancelled",
        }
    }

    /// Scheduled and in-progress activities still belong on the upcoming shortlist.
    pub fn is_open(self) -> bool {
        matches!(self, ActivityStatus::Scheduled | ActivityStatus::InProgress)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityStatus {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| ParseError::UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
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

/// A filter dimension's current choice: the "All" sentinel or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl Selection<String> {
    /// Class names are free text, so every label other than "All" is a valid choice.
    pub fn class_name(value: &str) -> Self {
        if value == "All" {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "All" {
            Ok(Selection::All)
        } else {
            value.parse().map(Selection::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    Next7Days,
    Next30Days,
    #[default]
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [
        TimeWindow::All,
        TimeWindow::Next7Days,
        TimeWindow::Next30Days,
    ];

    pub fn days(self) -> Option<i64> {
        match self {
            TimeWindow::Next7Days => Some(7),
            TimeWindow::Next30Days => Some(30),
            TimeWindow::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::Next7Days => "7d",
            TimeWindow::Next30Days => "30d",
            TimeWindow::All => "All",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|window| window.label() == value)
            .ok_or_else(|| ParseError::UnknownWindow(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub class_name: Selection<String>,
    pub category: Selection<ActivityCategory>,
    pub status: Selection<ActivityStatus>,
    pub search: String,
    pub window: TimeWindow,
}

/// One user interaction: replaces exactly one field of a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    ClassName(Selection<String>),
    Category(Selection<ActivityCategory>),
    Status(Selection<ActivityStatus>),
    Search(String),
    Window(TimeWindow),
}

impl FilterUpdate {
    /// Only `search` may be empty; the other keys always need a value.
    pub fn parse(key: &str, value: &str) -> Result<Self, ParseError> {
        if value.trim().is_empty() && key != "search" {
            return Err(ParseError::MissingValue(key.to_string()));
        }

        match key {
            "className" | "class" => Ok(FilterUpdate::ClassName(Selection::class_name(value))),
            "type" | "category" => Ok(FilterUpdate::Category(value.parse()?)),
            "status" => Ok(FilterUpdate::Status(value.parse()?)),
            "search" => Ok(FilterUpdate::Search(value.to_string())),
            "window" => Ok(FilterUpdate::Window(value.parse()?)),
            other => Err(ParseError::UnknownFilterKey(other.to_string())),
        }
    }
}

impl FilterState {
    pub fn with(&self, update: FilterUpdate) -> FilterState {
        let mut next = self.clone();
        match update {
            FilterUpdate::ClassName(value) => next.class_name = value,
            FilterUpdate::Category(value) => next.category = value,
            FilterUpdate::Status(value) => next.status = value,
            FilterUpdate::Search(value) => next.search = value,
            FilterUpdate::Window(value) => next.window = value,
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub total_participants: u64,
    pub scheduled: usize,
    pub in_progress: usize,
    pub upcoming: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusAreaTotal {
    pub focus_area: String,
    pub participants: u64,
}
