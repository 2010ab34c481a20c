use std::collections::{BTreeSet, HashSet};

use super::filter::YearRange;
use super::model::Dataset;

/// Distinct values offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCatalog {
    /// Genres in first-seen order.
    pub genres: Vec<String>,
    /// Age ratings in first-seen order.
    pub ratings: Vec<String>,
    /// Release years, ascending and distinct.
    pub years: Vec<i32>,
}

impl FilterCatalog {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut genres = Vec::new();
        let mut ratings = Vec::new();
        let mut seen_genres = HashSet::new();
        let mut seen_ratings = HashSet::new();
        let mut years = BTreeSet::new();

        for record in dataset.records() {
            if seen_genres.insert(record.genre.as_str()) {
                genres.push(record.genre.clone());
            }
            if seen_ratings.insert(record.rating.as_str()) {
                ratings.push(record.rating.clone());
            }
            years.insert(record.year_of_release);
        }

        FilterCatalog {
            genres,
            ratings,
            years: years.into_iter().collect(),
        }
    }

    /// Range slider bounds; `None` when the dataset is empty.
    pub fn year_bounds(&self) -> Option<YearRange> {
        let first = *self.years.first()?;
        let last = *self.years.last()?;
        Some(YearRange::new(first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GameRecord;

    #[test]
    fn distinct_values_in_first_seen_order() {
        let ds = Dataset::from_records(vec![
            GameRecord::new("Sports", "Wii", "E", 2006, 8.0, 76.0),
            GameRecord::new("Racing", "Wii", "E", 2008, 8.3, 82.0),
            GameRecord::new("Sports", "PS3", "T", 2002, 7.0, 70.0),
            GameRecord::new("Action", "PC", "M", 2006, 6.5, 60.0),
        ]);
        let catalog = FilterCatalog::from_dataset(&ds);
        assert_eq!(catalog.genres, ["Sports", "Racing", "Action"]);
        assert_eq!(catalog.ratings, ["E", "T", "M"]);
        assert_eq!(catalog.years, [2002, 2006, 2008]);
        assert_eq!(catalog.year_bounds(), Some(YearRange::new(2002, 2008)));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let catalog = FilterCatalog::from_dataset(&Dataset::from_records(Vec::new()));
        assert!(catalog.genres.is_empty());
        assert_eq!(catalog.year_bounds(), None);
    }
}
