// Library exports for hitboard

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod parser;
pub mod schema;
pub mod table;

pub use chart::{build_spec, ChartSpec, EncodingConfig};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use data::{ChartEntry, DataSource, Dataset};
pub use error::{DashboardError, Result};
pub use filter::{filter, Selection, SelectionDomain};
pub use schema::{Field, Value};
pub use table::{FilteredTable, Table};
