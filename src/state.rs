use chrono::{DateTime, Utc};

use crate::filter::filter_activities_at;
use crate::models::{Activity, FilterState, FilterUpdate, FocusAreaTotal, Summary};
use crate::options::FilterOptions;
use crate::report::{compute_summary_at, focus_area_totals};
use crate::store::ActivityStore;

pub const NEXT_UP_LIMIT: usize = 5;

/// Everything derived from the current filters. Rebuilt from scratch on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub activities: Vec<&'a Activity>,
    pub summary: Summary,
    pub focus_areas: Vec<FocusAreaTotal>,
}

impl<'a> DashboardView<'a> {
    pub fn compute(store: &'a ActivityStore, filters: &FilterState, now: DateTime<Utc>) -> Self {
        let activities = filter_activities_at(store.activities(), filters, now);
        let summary = compute_summary_at(activities.iter().copied(), now);
        let focus_areas = focus_area_totals(activities.iter().copied());

        Self {
            activities,
            summary,
            focus_areas,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Open activities (scheduled or in progress) from the whole store, soonest first.
pub fn next_upcoming(store: &ActivityStore) -> Vec<&Activity> {
    let mut open: Vec<&Activity> = store
        .activities()
        .iter()
        .filter(|activity| activity.status.is_open())
        .collect();
    open.sort_by_key(|activity| activity.start);
    open.truncate(NEXT_UP_LIMIT);
    open
}

/// Owns the current [`FilterState`] and the views derived from it.
///
/// Option lists and the upcoming shortlist depend only on the store and are
/// built once. Every filter change replaces the state and recomputes the view
/// before returning.
#[derive(Debug)]
pub struct DashboardController<'a> {
    store: &'a ActivityStore,
    filters: FilterState,
    options: FilterOptions,
    next_up: Vec<&'a Activity>,
    view: DashboardView<'a>,
}

impl<'a> DashboardController<'a> {
    pub fn new(store: &'a ActivityStore) -> Self {
        Self::with_filters_at(store, FilterState::default(), Utc::now())
    }

    pub fn with_filters_at(
        store: &'a ActivityStore,
        filters: FilterState,
        now: DateTime<Utc>,
    ) -> Self {
        let view = DashboardView::compute(store, &filters, now);
        Self {
            store,
            options: FilterOptions::from_activities(store.activities()),
            next_up: next_upcoming(store),
            filters,
            view,
        }
    }

    pub fn set_filter(&mut self, update: FilterUpdate) -> &FilterState {
        self.set_filter_at(update, Utc::now())
    }

    pub fn set_filter_at(&mut self, update: FilterUpdate, now: DateTime<Utc>) -> &FilterState {
        let next = self.filters.with(update);
        self.replace_filters(next, now);
        &self.filters
    }

    pub fn reset(&mut self) -> &FilterState {
        self.reset_at(Utc::now())
    }

    pub fn reset_at(&mut self, now: DateTime<Utc>) -> &FilterState {
        self.replace_filters(FilterState::default(), now);
        &self.filters
    }

    fn replace_filters(&mut self, filters: FilterState, now: DateTime<Utc>) {
        self.filters = filters;
        self.view = DashboardView::compute(self.store, &self.filters, now);
        tracing::debug!(
            matched = self.view.activities.len(),
            participants = self.view.summary.total_participants,
            focus_areas = self.view.focus_areas.len(),
            "recomputed dashboard view"
        );
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn view(&self) -> &DashboardView<'a> {
        &self.view
    }

    pub fn next_up(&self) -> &[&'a Activity] {
        &self.next_up
    }
}
