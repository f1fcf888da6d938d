// Syntax tree for field shorthand

/// A field reference as written, before it is checked against the schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shorthand {
    /// Aggregate name, e.g. "median" in "median(weeks_on_chart)"
    pub aggregate: Option<String>,
    /// Column name; absent only for "count()"
    pub field: Option<String>,
    /// Encoding type code after the colon ("N", "O", "Q", "T" or a full name)
    pub type_code: Option<String>,
}
