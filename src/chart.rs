use crate::error::{DashboardError, Result};
use crate::parser::parse_field_ref;
use crate::schema::{Field, FieldType};
use crate::table::Table;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

// =============================================================================
// Requested encoding
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
    Circle,
    Boxplot,
}

/// Aggregates the renderer can apply to a field inside an encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Count,
    Sum,
    Mean,
    Median,
    Min,
    Max,
    Q1,
    Q3,
}

impl Aggregate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Aggregate::Count),
            "sum" => Some(Aggregate::Sum),
            "mean" | "average" => Some(Aggregate::Mean),
            "median" => Some(Aggregate::Median),
            "min" => Some(Aggregate::Min),
            "max" => Some(Aggregate::Max),
            "q1" => Some(Aggregate::Q1),
            "q3" => Some(Aggregate::Q3),
            _ => None,
        }
    }
}

/// Axis presentation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_overlap: Option<bool>,
}

impl Axis {
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn label_angle(mut self, angle: i32) -> Self {
        self.label_angle = Some(angle);
        self
    }

    pub fn label_overlap(mut self, overlap: bool) -> Self {
        self.label_overlap = Some(overlap);
        self
    }
}

/// One encoding channel as written by the caller, e.g. `Channel::new("year:O").title("Year")`
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    shorthand: String,
    title: Option<String>,
    format: Option<String>,
    axis: Option<Axis>,
}

impl Channel {
    pub fn new(shorthand: impl Into<String>) -> Self {
        Self {
            shorthand: shorthand.into(),
            title: None,
            format: None,
            axis: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number format, used by tooltips
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }
}

impl From<&str> for Channel {
    fn from(shorthand: &str) -> Self {
        Channel::new(shorthand)
    }
}

/// Small-multiples split into columns by one field
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    channel: Channel,
    spacing: Option<u32>,
    header_title: Option<String>,
}

impl Facet {
    pub fn column(channel: impl Into<Channel>) -> Self {
        Self {
            channel: channel.into(),
            spacing: None,
            header_title: None,
        }
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn header_title(mut self, title: impl Into<String>) -> Self {
        self.header_title = Some(title.into());
        self
    }
}

/// Everything a caller chooses about one chart
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingConfig {
    mark: Mark,
    mark_size: Option<u32>,
    x: Channel,
    y: Channel,
    color: Channel,
    facet: Option<Facet>,
    tooltip: Vec<Channel>,
    interactive: bool,
    width: Option<u32>,
    height: Option<u32>,
    title: Option<String>,
}

impl EncodingConfig {
    pub fn new(
        mark: Mark,
        x: impl Into<Channel>,
        y: impl Into<Channel>,
        color: impl Into<Channel>,
    ) -> Self {
        Self {
            mark,
            mark_size: None,
            x: x.into(),
            y: y.into(),
            color: color.into(),
            facet: None,
            tooltip: Vec::new(),
            interactive: false,
            width: None,
            height: None,
            title: None,
        }
    }

    pub fn mark_size(mut self, size: u32) -> Self {
        self.mark_size = Some(size);
        self
    }

    pub fn facet(mut self, facet: Facet) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Append a tooltip entry; entries keep their insertion order
    pub fn tooltip(mut self, channel: impl Into<Channel>) -> Self {
        self.tooltip.push(channel.into());
        self
    }

    /// Pan and zoom bound to the x/y scales
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// =============================================================================
// Resolved, renderer-facing description
// =============================================================================

/// A field reference checked against the column registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRef {
    pub field: Option<Field>,
    pub aggregate: Option<Aggregate>,
    pub field_type: FieldType,
}

impl FieldRef {
    /// Resolve shorthand text such as "genre_full:N" or "median(weeks_on_chart):Q"
    pub fn parse(text: &str) -> Result<Self> {
        let shorthand = parse_field_ref(text)?;

        let aggregate = match &shorthand.aggregate {
            Some(name) => Some(
                Aggregate::from_name(name)
                    .ok_or_else(|| DashboardError::InvalidShorthand(text.to_string()))?,
            ),
            None => None,
        };

        let field = match &shorthand.field {
            Some(name) => Some(name.parse::<Field>()?),
            None if aggregate == Some(Aggregate::Count) => None,
            None => return Err(DashboardError::InvalidShorthand(text.to_string())),
        };

        let field_type = match &shorthand.type_code {
            Some(code) => FieldType::from_code(code)
                .ok_or_else(|| DashboardError::InvalidShorthand(text.to_string()))?,
            None => field.map(Field::default_type).unwrap_or(FieldType::Quantitative),
        };

        Ok(Self {
            field,
            aggregate,
            field_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encoding {
    pub x: ChannelDef,
    pub y: ChannelDef,
    pub color: ChannelDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<ChannelDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<ChannelDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkDef {
    #[serde(rename = "type")]
    pub kind: Mark,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<Map<String, JsonValue>>,
}

/// Interval selection bound to the scales (pan/zoom)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub select: Selector,
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    #[serde(rename = "type")]
    pub kind: String,
    pub encodings: Vec<String>,
}

/// Declarative chart description; serializes to a Vega-Lite v5 spec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    data: InlineData,
    mark: MarkDef,
    encoding: Encoding,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    params: Vec<Param>,
}

impl ChartSpec {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn size(&self) -> (Option<u32>, Option<u32>) {
        (self.width, self.height)
    }

    pub fn mark(&self) -> &MarkDef {
        &self.mark
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn values(&self) -> &[Map<String, JsonValue>] {
        &self.data.values
    }

    pub fn is_interactive(&self) -> bool {
        !self.params.is_empty()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Map a table and an encoding choice onto a chart description.
///
/// Every field named by a channel, tooltip or facet must be a column of
/// `table`; otherwise the whole build fails with `UnknownField`.
pub fn build_spec(table: &Table, config: &EncodingConfig) -> Result<ChartSpec> {
    // 1. Resolve channels
    let x = resolve_channel(table, &config.x)?;
    let y = resolve_channel(table, &config.y)?;
    let color = resolve_channel(table, &config.color)?;
    let column = match &config.facet {
        Some(facet) => {
            let mut def = resolve_channel(table, &facet.channel)?;
            def.spacing = facet.spacing;
            def.header = facet.header_title.clone().map(|title| Header { title });
            Some(def)
        }
        None => None,
    };
    let tooltip = config
        .tooltip
        .iter()
        .map(|c| resolve_channel(table, c))
        .collect::<Result<Vec<_>>>()?;

    // 2. Interaction
    let params = if config.interactive {
        vec![Param {
            name: "grid".to_string(),
            select: Selector {
                kind: "interval".to_string(),
                encodings: vec!["x".to_string(), "y".to_string()],
            },
            bind: "scales".to_string(),
        }]
    } else {
        Vec::new()
    };

    Ok(ChartSpec {
        schema: VEGA_LITE_SCHEMA,
        title: config.title.clone(),
        width: config.width,
        height: config.height,
        data: InlineData {
            values: table.to_records(),
        },
        mark: MarkDef {
            kind: config.mark,
            size: config.mark_size,
        },
        encoding: Encoding {
            x,
            y,
            color,
            column,
            tooltip,
        },
        params,
    })
}

fn resolve_channel(table: &Table, channel: &Channel) -> Result<ChannelDef> {
    let field_ref = FieldRef::parse(&channel.shorthand).map_err(|e| {
        warn!(shorthand = %channel.shorthand, error = %e, "rejected encoding field");
        e
    })?;

    if let Some(field) = field_ref.field {
        if !table.has_column(field) {
            warn!(%field, "encoding references a column the table does not have");
            return Err(DashboardError::UnknownField(field.to_string()));
        }
    }

    Ok(ChannelDef {
        field: field_ref.field,
        field_type: field_ref.field_type,
        aggregate: field_ref.aggregate,
        title: channel.title.clone(),
        format: channel.format.clone(),
        axis: channel.axis.clone(),
        header: None,
        spacing: None,
    })
}
