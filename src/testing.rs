use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use crate::models::{Activity, ActivityCategory, ActivityStatus};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap()
}

pub fn sample_activity(id: &str, focus_area: &str, participants: u32) -> Activity {
    let start = fixed_now() + Duration::days(1);
    Activity {
        id: id.to_string(),
        title: format!("Activity {id}"),
        class_name: "Grade 10".to_string(),
        category: ActivityCategory::Academics,
        description: "Weekly session".to_string(),
        location: "Room 101".to_string(),
        start,
        end: start + Duration::hours(1),
        status: ActivityStatus::Scheduled,
        staff_lead: "Ms. Patel".to_string(),
        participants,
        focus_area: focus_area.to_string(),
    }
}

pub fn arb_category() -> impl Strategy<Value = ActivityCategory> {
    prop::sample::select(ActivityCategory::ALL.to_vec())
}

pub fn arb_status() -> impl Strategy<Value = ActivityStatus> {
    prop::sample::select(ActivityStatus::ALL.to_vec())
}

/// Small vocabularies so generated activities collide on class and focus area.
pub fn arb_activity() -> impl Strategy<Value = Activity> {
    (
        prop::sample::select(vec!["Grade 9", "Grade 10", "Grade 11", "Faculty"]),
        arb_category(),
        arb_status(),
        prop::sample::select(vec![
            "Athletics",
            "Creative Arts",
            "Leadership",
            "STEM",
            "Service",
            "Support",
        ]),
        0u32..200,
        -40i64..40,
        prop::sample::select(vec![
            "Robotics lab",
            "Choir rehearsal",
            "Food bank outreach",
            "Debate rounds",
        ]),
    )
        .prop_map(
            |(class_name, category, status, focus_area, participants, day_offset, title)| {
                let start = fixed_now() + Duration::days(day_offset);
                Activity {
                    id: String::new(),
                    title: title.to_string(),
                    class_name: class_name.to_string(),
                    category,
                    description: format!("{title} for {class_name}"),
                    location: "Campus".to_string(),
                    start,
                    end: start + Duration::hours(2),
                    status,
                    staff_lead: "Coach Rivera".to_string(),
                    participants,
                    focus_area: focus_area.to_string(),
                }
            },
        )
}

pub fn arb_activities() -> impl Strategy<Value = Vec<Activity>> {
    prop::collection::vec(arb_activity(), 0..24).prop_map(|mut list| {
        for (index, activity) in list.iter_mut().enumerate() {
            activity.id = format!("P-{index:03}");
        }
        list
    })
}
