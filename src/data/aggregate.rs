use std::collections::HashMap;

use serde::Serialize;

use super::model::GameRecord;

// ---------------------------------------------------------------------------
// Scatter: user score vs critic score
// ---------------------------------------------------------------------------

/// One marker of the score scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterDatum {
    pub user_score: f64,
    pub critic_score: f64,
    pub genre: String,
}

/// One datum per record, ordered by ascending user score.
///
/// The sort is stable so records with equal user scores keep their
/// dataset order.
pub fn scatter_points(records: &[&GameRecord]) -> Vec<ScatterDatum> {
    let mut points: Vec<ScatterDatum> = records
        .iter()
        .map(|r| ScatterDatum {
            user_score: r.user_score,
            critic_score: r.critic_score,
            genre: r.genre.clone(),
        })
        .collect();
    points.sort_by(|a, b| a.user_score.total_cmp(&b.user_score));
    points
}

// ---------------------------------------------------------------------------
// Stack: genre share per platform
// ---------------------------------------------------------------------------

/// Record counts of one genre, aligned with [`StackChart::platforms`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSeries {
    pub genre: String,
    pub counts: Vec<u32>,
}

/// Raw genre-by-platform counts for the 100%-stacked chart.
///
/// Only platforms present in the subset appear, so every column total is
/// positive and percentage normalization never divides by zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackChart {
    pub platforms: Vec<String>,
    pub series: Vec<StackSeries>,
}

impl StackChart {
    /// Records per platform, summed over all genres.
    pub fn platform_totals(&self) -> Vec<u32> {
        let mut totals = vec![0; self.platforms.len()];
        for s in &self.series {
            for (total, count) in totals.iter_mut().zip(&s.counts) {
                *total += count;
            }
        }
        totals
    }

    /// Each series as a share of its platform column, in percent.
    pub fn percentages(&self) -> Vec<Vec<f64>> {
        let totals = self.platform_totals();
        self.series
            .iter()
            .map(|s| {
                s.counts
                    .iter()
                    .zip(&totals)
                    .map(|(&count, &total)| {
                        if total == 0 {
                            0.0
                        } else {
                            100.0 * count as f64 / total as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Count records per genre and platform.
///
/// Genres and platforms are listed in the order they are first met in
/// `records`. Every series has one count per platform, zero where the genre
/// is absent on that platform.
pub fn platform_stack(records: &[&GameRecord]) -> StackChart {
    let mut platforms: Vec<String> = Vec::new();
    let mut platform_index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<StackSeries> = Vec::new();
    let mut genre_index: HashMap<&str, usize> = HashMap::new();

    for &record in records {
        let p = *platform_index
            .entry(record.platform.as_str())
            .or_insert_with(|| {
                platforms.push(record.platform.clone());
                for s in series.iter_mut() {
                    s.counts.push(0);
                }
                platforms.len() - 1
            });
        let g = *genre_index.entry(record.genre.as_str()).or_insert_with(|| {
            series.push(StackSeries {
                genre: record.genre.clone(),
                counts: vec![0; platforms.len()],
            });
            series.len() - 1
        });
        series[g].counts[p] += 1;
    }

    StackChart { platforms, series }
}
