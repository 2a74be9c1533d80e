use chrono::{DateTime, Duration, Utc};

use crate::models::{Activity, FilterState, TimeWindow};

/// Closed interval `[now, now + N days]` for a bounded window, `None` for `All`.
pub fn window_interval(
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    window.days().map(|days| (now, now + Duration::days(days)))
}

pub fn filter_activities<'a>(
    activities: &'a [Activity],
    filters: &FilterState,
) -> Vec<&'a Activity> {
    filter_activities_at(activities, filters, Utc::now())
}

/// Keeps input order. `now` is fixed for the whole pass so every activity is
/// judged against the same window.
pub fn filter_activities_at<'a>(
    activities: &'a [Activity],
    filters: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'a Activity> {
    let interval = window_interval(filters.window, now);
    let needle = normalized_search(&filters.search);

    activities
        .iter()
        .filter(|activity| {
            filters.class_name.matches(&activity.class_name)
                && filters.category.matches(&activity.category)
                && filters.status.matches(&activity.status)
                && needle
                    .as_deref()
                    .map_or(true, |needle| matches_search(activity, needle))
        })
        .filter(|activity| match interval {
            Some((from, to)) => activity.start >= from && activity.start <= to,
            None => true,
        })
        .collect()
}

/// Trimmed, lowercased search term; `None` when there is nothing to match.
pub fn normalized_search(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// `needle` must already be normalized.
pub fn matches_search(activity: &Activity, needle: &str) -> bool {
    let haystack = [
        activity.title.as_str(),
        activity.description.as_str(),
        activity.staff_lead.as_str(),
        activity.focus_area.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    haystack.contains(needle)
}
