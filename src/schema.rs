// Closed column registry shared by tables, aggregations and chart encodings

use crate::error::DashboardError;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Every column a table in this crate can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Chart-entry columns
    Year,
    GenreFull,
    WeeksOnChart,
    MoodHappy,
    Gender,
    PeakPosition,
    Bpm,
    Loudness,
    Song,
    Artist,
    // Derived by aggregation
    Count,
    Total,
    Proportion,
    ProportionHappy,
}

impl Field {
    /// Columns of a chart entry, in file order
    pub const ROW_FIELDS: [Field; 10] = [
        Field::Year,
        Field::GenreFull,
        Field::WeeksOnChart,
        Field::MoodHappy,
        Field::Gender,
        Field::PeakPosition,
        Field::Bpm,
        Field::Loudness,
        Field::Song,
        Field::Artist,
    ];

    const ALL: [Field; 14] = [
        Field::Year,
        Field::GenreFull,
        Field::WeeksOnChart,
        Field::MoodHappy,
        Field::Gender,
        Field::PeakPosition,
        Field::Bpm,
        Field::Loudness,
        Field::Song,
        Field::Artist,
        Field::Count,
        Field::Total,
        Field::Proportion,
        Field::ProportionHappy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::GenreFull => "genre_full",
            Field::WeeksOnChart => "weeks_on_chart",
            Field::MoodHappy => "mood_happy",
            Field::Gender => "gender",
            Field::PeakPosition => "peak_position",
            Field::Bpm => "bpm",
            Field::Loudness => "loudness",
            Field::Song => "song",
            Field::Artist => "artist",
            Field::Count => "count",
            Field::Total => "total",
            Field::Proportion => "proportion",
            Field::ProportionHappy => "proportion_happy",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Field::GenreFull | Field::MoodHappy | Field::Gender | Field::Song | Field::Artist
        )
    }

    /// Encoding type used when a field reference leaves the type out
    pub fn default_type(self) -> FieldType {
        if self.is_numeric() {
            FieldType::Quantitative
        } else {
            FieldType::Nominal
        }
    }

    /// Axis title derived from the column name: "peak_position" -> "Peak Position"
    pub fn display_title(self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Field {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| DashboardError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Measurement type of an encoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nominal,
    Ordinal,
    Quantitative,
    Temporal,
}

impl FieldType {
    /// Accepts the one-letter codes (N, O, Q, T) and the full names
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "n" | "nominal" => Some(FieldType::Nominal),
            "o" | "ordinal" => Some(FieldType::Ordinal),
            "q" | "quantitative" => Some(FieldType::Quantitative),
            "t" | "temporal" => Some(FieldType::Temporal),
            _ => None,
        }
    }
}

/// A single table cell
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing cell; serializes as JSON null
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Null | Value::Text(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

// Total order so values can key a BTreeMap; floats compare with total_cmp
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("genre_full".parse::<Field>().unwrap(), Field::GenreFull);
        assert_eq!("proportion_happy".parse::<Field>().unwrap(), Field::ProportionHappy);
    }

    #[test]
    fn test_field_from_str_unknown() {
        let err = "nonexistent_column".parse::<Field>().unwrap_err();
        assert!(matches!(err, DashboardError::UnknownField(name) if name == "nonexistent_column"));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn test_default_types() {
        assert_eq!(Field::Bpm.default_type(), FieldType::Quantitative);
        assert_eq!(Field::Year.default_type(), FieldType::Quantitative);
        assert_eq!(Field::Gender.default_type(), FieldType::Nominal);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(Field::PeakPosition.display_title(), "Peak Position");
        assert_eq!(Field::WeeksOnChart.display_title(), "Weeks On Chart");
        assert_eq!(Field::Bpm.display_title(), "Bpm");
    }

    #[test]
    fn test_field_type_codes() {
        assert_eq!(FieldType::from_code("N"), Some(FieldType::Nominal));
        assert_eq!(FieldType::from_code("ordinal"), Some(FieldType::Ordinal));
        assert_eq!(FieldType::from_code("x"), None);
    }

    #[test]
    fn test_value_ordering() {
        assert!(Value::Int(1969) < Value::Int(2019));
        assert!(Value::from("Pop") < Value::from("Rock"));
        assert_eq!(Value::Float(0.5), Value::Float(0.5));
        assert!(Value::Null < Value::Int(0));
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let cells = vec![Value::Int(3), Value::Float(0.5), Value::from("Rock"), Value::Null];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[3,0.5,"Rock",null]"#);
    }
}
