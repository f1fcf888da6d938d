use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::table::FilteredTable;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// The user's current global filter values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub years: BTreeSet<i32>,
    pub genres: BTreeSet<String>,
    /// Inclusive lower bound on weeks_on_chart
    pub min_weeks: u32,
}

impl Selection {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        genres: impl IntoIterator<Item = impl Into<String>>,
        min_weeks: u32,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            genres: genres.into_iter().map(Into::into).collect(),
            min_weeks,
        }
    }

    /// Everything the domain offers, with no week threshold
    pub fn defaults(domain: &SelectionDomain) -> Self {
        Self::new(
            domain.year_options.iter().copied(),
            domain.genre_options.iter().cloned(),
            0,
        )
    }
}

/// Options the selection widgets offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionDomain {
    /// Taken from configuration, not from the dataset
    pub year_options: Vec<i32>,
    /// Distinct genres in order of first appearance
    pub genre_options: Vec<String>,
    pub min_weeks_max: u32,
}

impl SelectionDomain {
    pub fn from_dataset(dataset: &Dataset, config: &DashboardConfig) -> Self {
        Self {
            year_options: config.year_options.clone(),
            genre_options: dataset.genres(),
            min_weeks_max: dataset.max_weeks_on_chart(),
        }
    }
}

/// Rows matching every predicate of the selection, in dataset order
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredTable<'a> {
    let rows: Vec<_> = dataset
        .entries()
        .iter()
        .filter(|e| selection.years.contains(&e.year))
        .filter(|e| selection.genres.contains(&e.genre_full))
        .filter(|e| e.weeks_on_chart >= selection.min_weeks)
        .collect();

    debug!(
        total = dataset.len(),
        kept = rows.len(),
        min_weeks = selection.min_weeks,
        "applied selection"
    );
    FilteredTable::new(rows)
}
