use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::aggregate::{platform_stack, scatter_points, ScatterDatum, StackChart};
use crate::data::catalog::FilterCatalog;
use crate::data::filter::{filter_records, FilterSelection, YearRange};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// The three dashboard outputs, replaced together after every pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardOutput {
    /// No genre or no rating picked yet.
    NoSelection,
    /// Filtered results; `count` may be zero.
    Results {
        count: usize,
        stack: StackChart,
        scatter: Vec<ScatterDatum>,
    },
}

impl DashboardOutput {
    /// Number of matching games, `None` in the no-selection state.
    pub fn count(&self) -> Option<usize> {
        match self {
            DashboardOutput::NoSelection => None,
            DashboardOutput::Results { count, .. } => Some(*count),
        }
    }
}

/// Filter, then aggregate. Pure: the same inputs give identical outputs.
pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> DashboardOutput {
    let outcome = filter_records(dataset, selection);
    match outcome.records() {
        None => DashboardOutput::NoSelection,
        Some(records) => DashboardOutput::Results {
            count: records.len(),
            stack: platform_stack(records),
            scatter: scatter_points(records),
        },
    }
}

// ---------------------------------------------------------------------------
// Events and controller state
// ---------------------------------------------------------------------------

/// Change notifications from the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    GenresChanged(BTreeSet<String>),
    RatingsChanged(BTreeSet<String>),
    YearRangeChanged(i32, i32),
}

/// Dashboard state, independent of rendering.
///
/// Each event updates one control and triggers one full pass over the
/// current selection. `handle` is the computing phase: it borrows the state
/// mutably and runs to completion, so events are applied in arrival order
/// and outside of it the state is always idle.
pub struct DashboardState {
    dataset: Dataset,
    catalog: FilterCatalog,
    selection: FilterSelection,
    output: DashboardOutput,
    passes: u64,

    /// Where the dataset came from, shown in the status bar.
    pub source: Option<String>,
}

impl DashboardState {
    /// Start with nothing picked, which shows the no-selection state.
    pub fn new(dataset: Dataset) -> Self {
        let catalog = FilterCatalog::from_dataset(&dataset);
        let selection = FilterSelection::initial(&catalog);
        let mut state = DashboardState {
            dataset,
            catalog,
            selection,
            output: DashboardOutput::NoSelection,
            passes: 0,
            source: None,
        };
        state.recompute();
        state
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn output(&self) -> &DashboardOutput {
        &self.output
    }

    /// Compute passes run so far, including the initial one.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Apply one control change and recompute all outputs.
    pub fn handle(&mut self, event: FilterEvent) -> &DashboardOutput {
        match event {
            FilterEvent::GenresChanged(genres) => self.selection.genres = genres,
            FilterEvent::RatingsChanged(ratings) => self.selection.ratings = ratings,
            FilterEvent::YearRangeChanged(a, b) => self.selection.years = YearRange::new(a, b),
        }
        self.recompute();
        &self.output
    }

    fn recompute(&mut self) {
        let output = compute(&self.dataset, &self.selection);
        self.passes += 1;
        log::debug!(
            "pass {}: {} genres, {} ratings, years {}..={} -> {:?} games",
            self.passes,
            self.selection.genres.len(),
            self.selection.ratings.len(),
            self.selection.years.min(),
            self.selection.years.max(),
            output.count()
        );
        self.output = output;
    }

    // -- Convenience wrappers used by the filter panel --

    /// Toggle a single genre in the selection.
    pub fn toggle_genre(&mut self, genre: &str) {
        let genres = toggled(&self.selection.genres, genre);
        self.handle(FilterEvent::GenresChanged(genres));
    }

    /// Toggle a single rating in the selection.
    pub fn toggle_rating(&mut self, rating: &str) {
        let ratings = toggled(&self.selection.ratings, rating);
        self.handle(FilterEvent::RatingsChanged(ratings));
    }

    pub fn select_all_genres(&mut self) {
        let all = self.catalog.genres.iter().cloned().collect();
        self.handle(FilterEvent::GenresChanged(all));
    }

    pub fn select_no_genres(&mut self) {
        self.handle(FilterEvent::GenresChanged(BTreeSet::new()));
    }

    pub fn select_all_ratings(&mut self) {
        let all = self.catalog.ratings.iter().cloned().collect();
        self.handle(FilterEvent::RatingsChanged(all));
    }

    pub fn select_no_ratings(&mut self) {
        self.handle(FilterEvent::RatingsChanged(BTreeSet::new()));
    }
}

fn toggled(set: &BTreeSet<String>, value: &str) -> BTreeSet<String> {
    let mut set = set.clone();
    if !set.remove(value) {
        set.insert(value.to_string());
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GameRecord;

    fn state() -> DashboardState {
        DashboardState::new(Dataset::from_records(vec![
            GameRecord::new("RPG", "PC", "E", 2010, 8.0, 80.0),
            GameRecord::new("RPG", "PC", "E", 2010, 6.0, 70.0),
            GameRecord::new("Action", "PS4", "M", 2015, 9.0, 90.0),
        ]))
    }

    #[test]
    fn starts_in_no_selection_state() {
        let s = state();
        assert_eq!(s.output(), &DashboardOutput::NoSelection);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn each_event_runs_one_pass_over_full_selection() {
        let mut s = state();
        s.toggle_genre("RPG");
        assert_eq!(s.output(), &DashboardOutput::NoSelection);
        s.toggle_rating("E");
        assert_eq!(s.output().count(), Some(2));
        s.handle(FilterEvent::YearRangeChanged(2011, 2020));
        assert_eq!(s.output().count(), Some(0));
        assert_eq!(s.passes(), 4);
        // Once `handle` returns, outputs match the current selection.
        assert_eq!(s.output(), &compute(s.dataset(), s.selection()));
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut s = state();
        s.toggle_genre("RPG");
        s.toggle_genre("RPG");
        assert!(s.selection().genres.is_empty());
    }

    #[test]
    fn select_all_and_none() {
        let mut s = state();
        s.select_all_genres();
        s.select_all_ratings();
        assert_eq!(s.output().count(), Some(3));
        s.select_no_ratings();
        assert_eq!(s.output(), &DashboardOutput::NoSelection);
        s.select_no_genres();
        assert!(s.selection().genres.is_empty());
    }

    #[test]
    fn inverted_year_event_is_normalized() {
        let mut s = state();
        s.handle(FilterEvent::YearRangeChanged(2016, 2012));
        assert_eq!(s.selection().years, YearRange::new(2012, 2016));
    }

    #[test]
    fn output_serializes_with_state_tag() {
        let json = serde_json::to_value(DashboardOutput::NoSelection).unwrap();
        assert_eq!(json["state"], "no_selection");
    }
}
