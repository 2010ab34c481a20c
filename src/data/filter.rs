use std::collections::BTreeSet;

use serde::Serialize;

use super::catalog::FilterCatalog;
use super::model::{Dataset, GameRecord};

// ---------------------------------------------------------------------------
// YearRange – inclusive release-year interval
// ---------------------------------------------------------------------------

/// Inclusive year interval. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Every representable year.
    pub const ALL: YearRange = YearRange {
        min: i32::MIN,
        max: i32::MAX,
    };

    /// Build a range from slider handles; handles dragged past each other
    /// are swapped.
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::ALL
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – state of all three filter controls
// ---------------------------------------------------------------------------

/// Snapshot of the genre, rating and year controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub genres: BTreeSet<String>,
    pub ratings: BTreeSet<String>,
    pub years: YearRange,
}

impl FilterSelection {
    pub fn new<G, R>(genres: G, ratings: R, years: YearRange) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        FilterSelection {
            genres: genres.into_iter().map(Into::into).collect(),
            ratings: ratings.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// Controls as first shown: nothing picked, full year span.
    pub fn initial(catalog: &FilterCatalog) -> Self {
        FilterSelection {
            genres: BTreeSet::new(),
            ratings: BTreeSet::new(),
            years: catalog.year_bounds().unwrap_or_default(),
        }
    }

    /// Both categorical filters have at least one value picked.
    pub fn is_complete(&self) -> bool {
        !self.genres.is_empty() && !self.ratings.is_empty()
    }

    /// Whether one record passes all three predicates.
    pub fn matches(&self, record: &GameRecord) -> bool {
        self.years.contains(record.year_of_release)
            && self.genres.contains(&record.genre)
            && self.ratings.contains(&record.rating)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Result of applying a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<'a> {
    /// No genre or no rating picked. Not the same as zero matches.
    NoSelection,
    /// Matching records in dataset order; may be empty.
    Matches(Vec<&'a GameRecord>),
}

impl<'a> FilterOutcome<'a> {
    /// Matching records, `None` for the no-selection state.
    pub fn records(&self) -> Option<&[&'a GameRecord]> {
        match self {
            FilterOutcome::NoSelection => None,
            FilterOutcome::Matches(records) => Some(records),
        }
    }
}

/// Return the records passing the selection.
///
/// A record passes when:
/// * its release year lies in `selection.years` (inclusive)
/// * its genre is one of `selection.genres`
/// * its rating is one of `selection.ratings`
///
/// An empty genre or rating set yields [`FilterOutcome::NoSelection`].
pub fn filter_records<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilterOutcome<'a> {
    if !selection.is_complete() {
        return FilterOutcome::NoSelection;
    }
    FilterOutcome::Matches(
        dataset
            .records()
            .iter()
            .filter(|record| selection.matches(record))
            .collect(),
    )
}
