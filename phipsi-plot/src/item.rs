//! Chart items: a self-describing JSON envelope around a chart spec that a
//! browser client can embed without a full document.

use phipsi_core::{PhipsiError, Result};
use serde::{Deserialize, Serialize};

use crate::html::standalone_document;
use crate::vega::LayerSpec;

/// An embeddable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartItem {
    /// DOM element to render into; the client chooses when absent.
    pub target_id: Option<String>,
    /// Stable ID derived from the chart content.
    pub root_id: String,
    /// Vega-Lite major version of `spec`.
    pub version: String,
    pub spec: LayerSpec,
}

impl ChartItem {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PhipsiError::Other(format!("chart serialization failed: {}", e)))
    }

    /// Parse a chart item back from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PhipsiError::Parse(format!("chart item: {}", e)))
    }

    /// Render a complete standalone HTML page showing this chart.
    pub fn to_html(&self) -> Result<String> {
        standalone_document(self)
    }

    pub fn title(&self) -> &str {
        &self.spec.title.text
    }

    /// Number of plotted (phi, psi) points.
    pub fn point_count(&self) -> usize {
        self.spec.data.values.len()
    }
}
