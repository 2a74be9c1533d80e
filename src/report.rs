use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{Activity, ActivityStatus, FocusAreaTotal, Selection, Summary, TimeWindow};
use crate::options::FilterOptions;
use crate::state::DashboardController;

pub const FOCUS_AREA_LIMIT: usize = 5;
const MIN_BAR_PERCENT: f64 = 12.0;
const BAR_CELLS: usize = 20;

pub fn compute_summary<'a, I>(activities: I) -> Summary
where
    I: IntoIterator<Item = &'a Activity>,
{
    compute_summary_at(activities, Utc::now())
}

pub fn compute_summary_at<'a, I>(activities: I, now: DateTime<Utc>) -> Summary
where
    I: IntoIterator<Item = &'a Activity>,
{
    activities
        .into_iter()
        .fold(Summary::default(), |mut summary, activity| {
            summary.total += 1;
            summary.total_participants += u64::from(activity.participants);
            match activity.status {
                ActivityStatus::Scheduled => summary.scheduled += 1,
                ActivityStatus::InProgress => summary.in_progress += 1,
                ActivityStatus::Completed | ActivityStatus::Cancelled => {}
            }
            if activity.start > now {
                summary.upcoming += 1;
            }
            summary
        })
}

/// Participant totals per focus area, highest first, capped at five.
/// Equal totals keep the order in which their focus area first appeared.
pub fn focus_area_totals<'a, I>(activities: I) -> Vec<FocusAreaTotal>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<FocusAreaTotal> = Vec::new();

    for activity in activities {
        let index = *positions
            .entry(activity.focus_area.as_str())
            .or_insert_with(|| {
                totals.push(FocusAreaTotal {
                    focus_area: activity.focus_area.clone(),
                    participants: 0,
                });
                totals.len() - 1
            });
        totals[index].participants += u64::from(activity.participants);
    }

    totals.sort_by(|a, b| b.participants.cmp(&a.participants));
    totals.truncate(FOCUS_AREA_LIMIT);
    totals
}

/// Relative bar width for a ranking row, never narrower than 12%.
pub fn bar_percent(value: u64, top: u64) -> f64 {
    let top = top.max(1) as f64;
    (value as f64 / top * 100.0).clamp(MIN_BAR_PERCENT, 100.0)
}

fn bar(value: u64, top: u64) -> String {
    let filled = (bar_percent(value, top) / 100.0 * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

fn cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn schedule(activity: &Activity) -> String {
    format!(
        "{} {} - {}",
        activity.start.format("%b %-d, %Y"),
        activity.start.format("%-I:%M %p"),
        activity.end.format("%-I:%M %p")
    )
}

pub fn render_summary(output: &mut String, summary: &Summary) {
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Total Activities: {} ({} upcoming)",
        summary.total, summary.upcoming
    );
    let _ = writeln!(output, "- Scheduled: {}", summary.scheduled);
    let _ = writeln!(output, "- Participants: {}", summary.total_participants);
    let _ = writeln!(output, "- Active Sessions: {}", summary.in_progress);
}

pub fn render_table(output: &mut String, activities: &[&Activity]) {
    let _ = writeln!(output, "## Activities");

    if activities.is_empty() {
        let _ = writeln!(output, "No activities match the selected filters.");
        return;
    }

    let _ = writeln!(
        output,
        "| Activity | Class | Type | Schedule | Participants | Staff Lead | Status |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|");
    for activity in activities {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} |",
            cell(&activity.title),
            cell(&activity.class_name),
            activity.category,
            schedule(activity),
            activity.participants,
            cell(&activity.staff_lead),
            activity.status
        );
    }
}

pub fn render_upcoming(output: &mut String, upcoming: &[&Activity]) {
    let _ = writeln!(output, "## Upcoming Schedule");

    if upcoming.is_empty() {
        let _ = writeln!(output, "Nothing scheduled.");
        return;
    }

    for activity in upcoming {
        let _ = writeln!(
            output,
            "- {}: {} [{}] at {}",
            activity.start.format("%a %b %-d, %-I:%M %p"),
            activity.title,
            activity.status,
            activity.location
        );
    }
}

pub fn render_focus_areas(output: &mut String, totals: &[FocusAreaTotal]) {
    let _ = writeln!(output, "## Focus Areas");

    let Some(top) = totals.first().map(|total| total.participants) else {
        let _ = writeln!(output, "No participation recorded for the current filters.");
        return;
    };

    for (rank, total) in totals.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {}: {} students {}",
            rank + 1,
            total.focus_area,
            total.participants,
            bar(total.participants, top)
        );
    }
}

fn option_line<T: std::fmt::Display>(output: &mut String, label: &str, options: &[Selection<T>]) {
    let values: Vec<String> = options.iter().map(ToString::to_string).collect();
    let _ = writeln!(output, "- {}: {}", label, values.join(", "));
}

pub fn render_options(output: &mut String, options: &FilterOptions) {
    let _ = writeln!(output, "## Filter Options");
    option_line(output, "Class", &options.class_names);
    option_line(output, "Type", &options.categories);
    option_line(output, "Status", &options.statuses);
    let windows: Vec<&str> = TimeWindow::ALL.iter().map(|window| window.label()).collect();
    let _ = writeln!(output, "- Window: {}", windows.join(", "));
}

pub fn build_dashboard(controller: &DashboardController<'_>) -> String {
    let view = controller.view();
    let filters = controller.filters();
    let mut output = String::new();

    let _ = writeln!(output, "# Activity Operations Dashboard");
    let _ = writeln!(
        output,
        "Class: {} | Type: {} | Status: {} | Window: {} | Search: \"{}\"",
        filters.class_name,
        filters.category,
        filters.status,
        filters.window,
        filters.search.trim()
    );
    let _ = writeln!(output);
    render_summary(&mut output, &view.summary);
    let _ = writeln!(output);
    render_table(&mut output, &view.activities);
    let _ = writeln!(output);
    render_upcoming(&mut output, controller.next_up());
    let _ = writeln!(output);
    render_focus_areas(&mut output, &view.focus_areas);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{arb_activities, fixed_now, sample_activity};
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn summary_counts_statuses_and_upcoming() {
        let now = fixed_now();
        let store = vec![
            Activity {
                status: ActivityStatus::Scheduled,
                ..sample_activity("A-1", "STEM", 28)
            },
            Activity {
                status: ActivityStatus::InProgress,
                ..sample_activity("A-2", "Athletics", 16)
            },
            Activity {
                status: ActivityStatus::Completed,
                start: now - Duration::days(2),
                end: now - Duration::days(2) + Duration::hours(1),
                ..sample_activity("A-3", "Leadership", 14)
            },
            Activity {
                status: ActivityStatus::Scheduled,
                start: now,
                end: now + Duration::hours(1),
                ..sample_activity("A-4", "STEM", 2)
            },
        ];

        let summary = compute_summary_at(&store, now);
        assert_eq!(
            summary,
            Summary {
                total: 4,
                total_participants: 60,
                scheduled: 2,
                in_progress: 1,
                upcoming: 2,
            }
        );
    }

    #[test]
    fn focus_areas_rank_by_summed_participants() {
        let store = vec![
            sample_activity("A-102", "Athletics", 16),
            sample_activity("A-103", "Creative Arts", 35),
            sample_activity("A-108", "Athletics", 22),
        ];

        let totals = focus_area_totals(&store);
        assert_eq!(
            totals,
            vec![
                FocusAreaTotal {
                    focus_area: "Athletics".to_string(),
                    participants: 38,
                },
                FocusAreaTotal {
                    focus_area: "Creative Arts".to_string(),
                    participants: 35,
                },
            ]
        );
    }

    #[test]
    fn focus_areas_truncate_to_five_and_keep_first_seen_on_ties() {
        let store: Vec<Activity> = ["F", "B", "E", "A", "D", "C"]
            .iter()
            .enumerate()
            .map(|(index, area)| sample_activity(&format!("A-{index}"), area, 10))
            .collect();

        let names: Vec<String> = focus_area_totals(&store)
            .into_iter()
            .map(|total| total.focus_area)
            .collect();
        assert_eq!(names, vec!["F", "B", "E", "A", "D"]);
    }

    #[test]
    fn empty_list_aggregates_to_zero() {
        let empty: Vec<Activity> = Vec::new();
        assert_eq!(compute_summary_at(&empty, fixed_now()), Summary::default());
        assert!(focus_area_totals(&empty).is_empty());
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_percent(120, 120), 100.0);
        assert_eq!(bar_percent(1, 120), 12.0);
        assert_eq!(bar_percent(60, 120), 50.0);
        assert_eq!(bar_percent(0, 0), 12.0);
    }

    #[test]
    fn empty_table_renders_no_results_row() {
        let mut output = String::new();
        render_table(&mut output, &[]);
        assert!(output.contains("No activities match the selected filters."));

        let mut output = String::new();
        render_focus_areas(&mut output, &[]);
        assert!(output.contains("No participation recorded"));
    }

    #[test]
    fn focus_area_rows_show_rank() {
        let mut output = String::new();
        render_focus_areas(
            &mut output,
            &[
                FocusAreaTotal {
                    focus_area: "Student Support".to_string(),
                    participants: 120,
                },
                FocusAreaTotal {
                    focus_area: "Creative Arts".to_string(),
                    participants: 61,
                },
            ],
        );
        assert!(output.contains("1. Student Support: 120 students"));
        assert!(output.contains("2. Creative Arts: 61 students"));
    }

    #[test]
    fn options_render_with_all_first() {
        let store = vec![
            Activity {
                class_name: "Grade 9".to_string(),
                ..sample_activity("A-1", "STEM", 1)
            },
            Activity {
                class_name: "Faculty".to_string(),
                ..sample_activity("A-2", "STEM", 1)
            },
        ];
        let mut output = String::new();
        render_options(&mut output, &FilterOptions::from_activities(&store));
        assert!(output.contains("- Class: All, Faculty, Grade 9"));
        assert!(output.contains("- Type: All, Academics"));
        assert!(output.contains("- Window: All, 7d, 30d"));
    }

    proptest! {
        #[test]
        fn summary_totals_match_the_list(store in arb_activities()) {
            let summary = compute_summary_at(&store, fixed_now());
            let participants: u64 = store.iter().map(|a| u64::from(a.participants)).sum();
            prop_assert_eq!(summary.total, store.len());
            prop_assert_eq!(summary.total_participants, participants);
            prop_assert!(summary.scheduled + summary.in_progress <= summary.total);
            prop_assert!(summary.upcoming <= summary.total);
        }

        #[test]
        fn focus_area_ranking_is_bounded_sorted_and_exact(store in arb_activities()) {
            let totals = focus_area_totals(&store);
            prop_assert!(totals.len() <= FOCUS_AREA_LIMIT);
            for pair in totals.windows(2) {
                prop_assert!(pair[0].participants >= pair[1].participants);
            }
            for total in &totals {
                let expected: u64 = store
                    .iter()
                    .filter(|a| a.focus_area == total.focus_area)
                    .map(|a| u64::from(a.participants))
                    .sum();
                prop_assert_eq!(total.participants, expected);
            }
        }
    }
}
