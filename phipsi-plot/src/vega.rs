//! Typed subset of the Vega-Lite v5 grammar.
//!
//! Only what the Ramachandran chart needs is modelled: a layered view over
//! inline data with circle, rule and text marks. Optional properties are
//! omitted from the JSON when unset.

use serde::{Deserialize, Serialize};

/// Vega-Lite major version the specs target.
pub const VEGA_LITE_VERSION: &str = "5";

/// JSON schema URL for [`VEGA_LITE_VERSION`].
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

// ── Data ─────────────────────────────────────────────────────────────────

/// One plotted residue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub phi: f64,
    pub psi: f64,
    pub model: u32,
    pub chain: char,
    /// Residue name and number, e.g. `GLY42`.
    pub residue: String,
}

/// A row of a layer's own data: text annotations carry all three fields,
/// rule layers use a single empty row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Inline data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData<T> {
    pub values: Vec<T>,
}

// ── Marks ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Circle,
    Rule,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl Mark {
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            size: None,
            opacity: None,
            color: None,
            stroke_width: None,
            stroke_dash: None,
            align: None,
            baseline: None,
            font_size: None,
        }
    }
}

// ── Encoding ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub domain: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nice: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

/// A field- or datum-bound encoding channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Channel {
    pub fn field(name: &str, kind: FieldType) -> Self {
        Self {
            field: Some(name.into()),
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn datum(value: f64) -> Self {
        Self {
            datum: Some(value),
            kind: Some(FieldType::Quantitative),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Vec<Channel>>,
}

// ── Views ────────────────────────────────────────────────────────────────

/// One layer of a layered view. Layers without their own data inherit the
/// top-level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InlineData<Annotation>>,
    pub mark: Mark,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// A complete layered Vega-Lite specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub data: InlineData<PlotPoint>,
    pub layer: Vec<Layer>,
}
