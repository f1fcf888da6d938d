// The dashboard tabs: each one runs filter -> aggregate -> build_spec for a selection

use crate::aggregate::{mean_indicator_by_group, overview, proportion_by_group, Overview};
use crate::chart::{build_spec, Axis, Channel, ChartSpec, EncodingConfig, Facet, Mark};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::error::{DashboardError, Result};
use crate::filter::{filter, Selection, SelectionDomain};
use crate::schema::Field;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

pub const CUSTOM_X_OPTIONS: [Field; 3] = [Field::PeakPosition, Field::WeeksOnChart, Field::Bpm];
pub const CUSTOM_Y_OPTIONS: [Field; 3] =
    [Field::WeeksOnChart, Field::PeakPosition, Field::Loudness];
pub const CUSTOM_COLOR_OPTIONS: [Field; 3] = [Field::MoodHappy, Field::Gender, Field::Year];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodView {
    #[default]
    YearComparison,
    GenreBreakdown,
}

impl FromStr for MoodView {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "year" => Ok(MoodView::YearComparison),
            "genre" => Ok(MoodView::GenreBreakdown),
            other => Err(DashboardError::unsupported("mood view", other)),
        }
    }
}

/// Axis and hue choices for the custom scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomOptions {
    x: Field,
    y: Field,
    color: Field,
    split_by_year: bool,
}

impl CustomOptions {
    pub fn new(x: Field, y: Field, color: Field, split_by_year: bool) -> Result<Self> {
        if !CUSTOM_X_OPTIONS.contains(&x) {
            return Err(DashboardError::unsupported("x-axis", x.name()));
        }
        if !CUSTOM_Y_OPTIONS.contains(&y) {
            return Err(DashboardError::unsupported("y-axis", y.name()));
        }
        if !CUSTOM_COLOR_OPTIONS.contains(&color) {
            return Err(DashboardError::unsupported("color", color.name()));
        }
        Ok(Self {
            x,
            y,
            color,
            split_by_year,
        })
    }
}

impl Default for CustomOptions {
    fn default() -> Self {
        Self {
            x: CUSTOM_X_OPTIONS[0],
            y: CUSTOM_Y_OPTIONS[0],
            color: CUSTOM_COLOR_OPTIONS[0],
            split_by_year: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub metrics: Overview,
    pub avg_weeks_label: String,
    pub genre_proportions: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderReport {
    pub proportions: ChartSpec,
    pub weeks_boxplot: ChartSpec,
}

/// Read-only view over a loaded dataset
pub struct Dashboard<'a> {
    dataset: &'a Dataset,
    config: &'a DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a DashboardConfig) -> Self {
        Self { dataset, config }
    }

    pub fn domain(&self) -> SelectionDomain {
        SelectionDomain::from_dataset(self.dataset, self.config)
    }

    /// Headline metrics and genre shares per year
    pub fn overview(&self, selection: &Selection) -> Result<OverviewReport> {
        let filtered = filter(self.dataset, selection);
        let metrics = overview(&filtered);
        info!(songs = metrics.total_songs, "rendering overview");

        let shares = proportion_by_group(&filtered, Field::Year, Field::GenreFull)?;
        let config = EncodingConfig::new(
            Mark::Bar,
            genre_axis(),
            Channel::new("proportion:Q")
                .title("Proportion")
                .axis(Axis::default().format("%")),
            "year:N",
        )
        .facet(Facet::column("year:N").spacing(10))
        .tooltip(Channel::new("genre_full:N").title("Genre"))
        .tooltip(Channel::new("proportion:Q").title("Proportion").format(".1%"))
        .tooltip("year:N")
        .size(400, 400);

        Ok(OverviewReport {
            avg_weeks_label: metrics.avg_weeks_label(),
            metrics,
            genre_proportions: build_spec(&shares, &config)?,
        })
    }

    /// Share of happy songs, per year or per genre and year
    pub fn mood(&self, selection: &Selection, view: MoodView) -> Result<ChartSpec> {
        let filtered = filter(self.dataset, selection);
        let happy = |keys: &[Field]| {
            mean_indicator_by_group(
                &filtered,
                keys,
                Field::MoodHappy,
                &self.config.happy_value,
                Field::ProportionHappy,
            )
        };
        let happy_axis = || {
            Channel::new("proportion_happy:Q")
                .title("Proportion Happy")
                .axis(Axis::default().format("%"))
        };
        let happy_tooltip = || {
            Channel::new("proportion_happy:Q")
                .title("Happy %")
                .format(".1%")
        };

        match view {
            MoodView::YearComparison => {
                let table = happy(&[Field::Year])?;
                let config = EncodingConfig::new(
                    Mark::Bar,
                    Channel::new("year:O").title("Year"),
                    happy_axis(),
                    "year:N",
                )
                .tooltip(Channel::new("year:O").title("Year"))
                .tooltip(happy_tooltip())
                .size(600, 400)
                .title("Proportion of Happy Songs by Year");
                build_spec(&table, &config)
            }
            MoodView::GenreBreakdown => {
                let table = happy(&[Field::GenreFull, Field::Year])?;
                let config = EncodingConfig::new(Mark::Bar, genre_axis(), happy_axis(), "year:N")
                    .tooltip(Channel::new("genre_full:N").title("Genre"))
                    .tooltip(Channel::new("year:O").title("Year"))
                    .tooltip(happy_tooltip())
                    .size(400, 350)
                    .facet(Facet::column("year:N").header_title("Year").spacing(20))
                    .title("Happy Songs by Genre and Year");
                build_spec(&table, &config)
            }
        }
    }

    /// Gender shares per year and weeks-on-chart spread per gender
    pub fn gender(&self, selection: &Selection) -> Result<GenderReport> {
        let filtered = filter(self.dataset, selection);

        let shares = proportion_by_group(&filtered, Field::Year, Field::Gender)?;
        let share_config = EncodingConfig::new(
            Mark::Bar,
            "year:O",
            Channel::new("proportion:Q").axis(Axis::default().format("%")),
            "gender:N",
        )
        .tooltip("year")
        .tooltip("gender")
        .tooltip(Channel::new("proportion:Q").format(".1%"))
        .size(700, 350)
        .title("Gender Proportions by Year");

        // Quartiles are left to the renderer's boxplot
        let raw = filtered.to_table();
        let box_config =
            EncodingConfig::new(Mark::Boxplot, "gender:N", "weeks_on_chart:Q", "gender:N")
                .mark_size(60)
                .tooltip("median(weeks_on_chart):Q")
                .size(700, 350)
                .title("Weeks on Chart by Gender");

        Ok(GenderReport {
            proportions: build_spec(&shares, &share_config)?,
            weeks_boxplot: build_spec(&raw, &box_config)?,
        })
    }

    /// Free-form scatter over the raw filtered rows
    pub fn custom(&self, selection: &Selection, options: &CustomOptions) -> Result<ChartSpec> {
        let filtered = filter(self.dataset, selection);
        let raw = filtered.to_table();

        let (width, height) = if options.split_by_year { (350, 250) } else { (700, 400) };
        let mut config = EncodingConfig::new(
            Mark::Circle,
            Channel::new(options.x.name()).title(options.x.display_title()),
            Channel::new(options.y.name()).title(options.y.display_title()),
            format!("{}:N", options.color).as_str(),
        )
        .mark_size(40)
        .tooltip(options.x.name())
        .tooltip(options.y.name())
        .tooltip("song")
        .tooltip("artist")
        .tooltip("genre_full")
        .tooltip("year")
        .interactive()
        .size(width, height);
        if options.split_by_year {
            config = config.facet(Facet::column("year:N"));
        }

        build_spec(&raw, &config)
    }
}

fn genre_axis() -> Channel {
    Channel::new("genre_full:N")
        .title("Genre")
        .axis(Axis::default().label_angle(-45).label_overlap(false))
}
