// Parser for Altair-style field shorthand ("genre_full:N", "median(weeks_on_chart):Q")

pub mod ast;
pub mod lexer;
pub mod shorthand;

// Public API re-exports
pub use ast::Shorthand;
pub use shorthand::parse_shorthand;

use crate::error::{DashboardError, Result};
use nom::combinator::all_consuming;

/// Parse a complete shorthand string; trailing input is an error
pub fn parse_field_ref(text: &str) -> Result<Shorthand> {
    all_consuming(parse_shorthand)(text)
        .map(|(_, shorthand)| shorthand)
        .map_err(|_| DashboardError::InvalidShorthand(text.to_string()))
}
