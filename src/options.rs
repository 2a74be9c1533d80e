use std::cmp::Ordering;
use std::fmt::Display;

use feruca::Collator;

use crate::models::{Activity, ActivityCategory, ActivityStatus, Selection};

/// Selectable values for each filter dimension, always derived from the full store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub class_names: Vec<Selection<String>>,
    pub categories: Vec<Selection<ActivityCategory>>,
    pub statuses: Vec<Selection<ActivityStatus>>,
}

impl FilterOptions {
    pub fn from_activities(activities: &[Activity]) -> Self {
        Self {
            class_names: unique_options(activities, |activity| activity.class_name.clone()),
            categories: unique_options(activities, |activity| activity.category),
            statuses: unique_options(activities, |activity| activity.status),
        }
    }
}

/// Distinct projected values in Unicode collation order, with the `All` sentinel first.
pub fn unique_options<T, F>(activities: &[Activity], selector: F) -> Vec<Selection<T>>
where
    T: PartialEq + Display,
    F: Fn(&Activity) -> T,
{
    let mut values: Vec<(String, T)> = Vec::new();
    for activity in activities {
        let value = selector(activity);
        if !values.iter().any(|(_, seen)| *seen == value) {
            values.push((value.to_string(), value));
        }
    }

    let mut collator = Collator::default();
    values.sort_by(|(a, _), (b, _)| compare_labels(&mut collator, a, b));

    std::iter::once(Selection::All)
        .chain(values.into_iter().map(|(_, value)| Selection::Only(value)))
        .collect()
}

/// Collation order, falling back to code points when the collator sees a tie.
pub fn compare_labels(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}
