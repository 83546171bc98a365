//! Ramachandran chart construction.
//!
//! The chart is a 800×600 scatter of (phi, psi) over fixed [-180, 180] axes,
//! with dashed guide lines and solid quadrant dividers through the origin
//! and three region labels.

use phipsi_core::hash::sha256;
use phipsi_core::ContentAddressable;
use phipsi_struct::AngleDataset;

use crate::item::ChartItem;
use crate::vega::{
    Annotation, Axis, Channel, Encoding, FieldType, InlineData, Layer, LayerSpec, Mark, MarkType,
    PlotPoint, Scale, Title, VEGA_LITE_SCHEMA, VEGA_LITE_VERSION,
};

pub const X_AXIS_LABEL: &str = "Phi (ϕ) Angle";
pub const Y_AXIS_LABEL: &str = "Psi (ψ) Angle";

const DOMAIN: [f64; 2] = [-180.0, 180.0];

/// Region labels and their anchor points.
pub const REGION_LABELS: [(&str, f64, f64); 3] = [
    ("β sheet", -20.0, 10.0),
    ("L-α helix", 20.0, 10.0),
    ("R-α helix", -20.0, -180.0),
];

/// Circle area in square pixels (a 5 px marker).
const POINT_SIZE: f64 = 25.0;
const POINT_OPACITY: f64 = 0.5;
/// 12 pt.
const LABEL_FONT_SIZE: f64 = 16.0;

/// Chart title for an identifier.
pub fn chart_title(identifier: &str) -> String {
    format!("Ramachandran Plot of {}", identifier)
}

/// Builds chart items from angle datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRenderer {
    width: u32,
    height: u32,
    target_id: Option<String>,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            target_id: None,
        }
    }
}

impl PlotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// DOM element ID the client should embed the chart into.
    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Build the chart item for `dataset`. An empty dataset gives a labelled
    /// chart with no points.
    pub fn render(&self, dataset: &AngleDataset, identifier: &str) -> ChartItem {
        let title = chart_title(identifier);
        let points: Vec<PlotPoint> = dataset
            .iter()
            .map(|p| PlotPoint {
                phi: p.phi,
                psi: p.psi,
                model: p.model,
                chain: p.chain,
                residue: residue_label(&p.residue, p.seq_num, p.i_code),
            })
            .collect();
        log::debug!("rendering {} point(s) for {}", points.len(), identifier);

        let root_id = root_id(&title, dataset);
        let spec = LayerSpec {
            schema: VEGA_LITE_SCHEMA.into(),
            title: Title {
                text: title,
                font_size: None,
            },
            width: self.width,
            height: self.height,
            data: InlineData { values: points },
            layer: vec![
                guide_rule(Guide::Vertical, true),
                guide_rule(Guide::Horizontal, true),
                scatter_layer(),
                guide_rule(Guide::Horizontal, false),
                guide_rule(Guide::Vertical, false),
                label_layer(),
            ],
        };

        ChartItem {
            target_id: self.target_id.clone(),
            root_id,
            version: VEGA_LITE_VERSION.into(),
            spec,
        }
    }
}

/// Chart item with the default renderer.
pub fn ramachandran_chart(dataset: &AngleDataset, identifier: &str) -> ChartItem {
    PlotRenderer::default().render(dataset, identifier)
}

fn residue_label(name: &str, seq_num: i32, i_code: Option<char>) -> String {
    match i_code {
        Some(ic) => format!("{}{}{}", name, seq_num, ic),
        None => format!("{}{}", name, seq_num),
    }
}

/// Deterministic element ID from the title and the plotted angles.
fn root_id(title: &str, dataset: &AngleDataset) -> String {
    let digest = sha256(format!("{}\n{}", title, dataset.content_hash()).as_bytes());
    format!("phipsi-{}", &digest[..16])
}

fn axis_channel(field: &str, title: &str) -> Channel {
    Channel::field(field, FieldType::Quantitative)
        .with_scale(Scale {
            domain: DOMAIN,
            nice: Some(false),
        })
        .with_axis(Axis {
            title: title.into(),
            values: Some(vec![-180.0, -120.0, -60.0, 0.0, 60.0, 120.0, 180.0]),
        })
}

fn scatter_layer() -> Layer {
    let mut mark = Mark::new(MarkType::Circle);
    mark.size = Some(POINT_SIZE);
    mark.opacity = Some(POINT_OPACITY);

    Layer {
        data: None,
        mark,
        encoding: Encoding {
            x: Some(axis_channel("phi", X_AXIS_LABEL)),
            y: Some(axis_channel("psi", Y_AXIS_LABEL)),
            tooltip: Some(vec![
                Channel::field("chain", FieldType::Nominal).with_title("Chain"),
                Channel::field("residue", FieldType::Nominal).with_title("Residue"),
                Channel::field("phi", FieldType::Quantitative)
                    .with_title("Phi")
                    .with_format(".1f"),
                Channel::field("psi", FieldType::Quantitative)
                    .with_title("Psi")
                    .with_format(".1f"),
            ]),
            ..Encoding::default()
        },
    }
}

#[derive(Clone, Copy)]
enum Guide {
    /// phi = 0
    Vertical,
    /// psi = 0
    Horizontal,
}

fn guide_rule(at: Guide, dashed: bool) -> Layer {
    let mut mark = Mark::new(MarkType::Rule);
    mark.color = Some("black".into());
    mark.stroke_width = Some(1.0);
    if dashed {
        mark.stroke_dash = Some(vec![6.0, 4.0]);
    }

    let encoding = match at {
        Guide::Vertical => Encoding {
            x: Some(Channel::datum(0.0)),
            y: Some(Channel::datum(DOMAIN[0])),
            y2: Some(Channel::datum(DOMAIN[1])),
            ..Encoding::default()
        },
        Guide::Horizontal => Encoding {
            x: Some(Channel::datum(DOMAIN[0])),
            x2: Some(Channel::datum(DOMAIN[1])),
            y: Some(Channel::datum(0.0)),
            ..Encoding::default()
        },
    };

    Layer {
        data: Some(InlineData {
            values: vec![Annotation::default()],
        }),
        mark,
        encoding,
    }
}

fn label_layer() -> Layer {
    let mut mark = Mark::new(MarkType::Text);
    mark.color = Some("black".into());
    mark.align = Some("center".into());
    mark.baseline = Some("middle".into());
    mark.font_size = Some(LABEL_FONT_SIZE);

    let values = REGION_LABELS
        .iter()
        .map(|&(text, x, y)| Annotation {
            x: Some(x),
            y: Some(y),
            text: Some(text.into()),
        })
        .collect();

    Layer {
        data: Some(InlineData { values }),
        mark,
        encoding: Encoding {
            x: Some(Channel::field("x", FieldType::Quantitative)),
            y: Some(Channel::field("y", FieldType::Quantitative)),
            text: Some(Channel::field("text", FieldType::Nominal)),
            ..Encoding::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phipsi_struct::AnglePair;

    fn pair(phi: f64, psi: f64, seq_num: i32) -> AnglePair {
        AnglePair {
            phi,
            psi,
            model: 1,
            chain: 'A',
            residue: "ALA".into(),
            seq_num,
            i_code: None,
        }
    }

    fn dataset() -> AngleDataset {
        vec![pair(-60.0, -45.0, 2), pair(-120.0, 130.0, 3), pair(60.0, 45.0, 4)]
            .into_iter()
            .collect()
    }

    #[test]
    fn title_and_size() {
        let item = ramachandran_chart(&dataset(), "1ah9");
        assert_eq!(item.spec.title.text, "Ramachandran Plot of 1ah9");
        assert_eq!(item.spec.width, 800);
        assert_eq!(item.spec.height, 600);
        assert_eq!(item.version, "5");
        assert!(item.target_id.is_none());
    }

    #[test]
    fn points_carry_provenance() {
        let item = ramachandran_chart(&dataset(), "1ah9");
        let pts = &item.spec.data.values;
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0].residue, "ALA2");
        assert_eq!(pts[2].phi, 60.0);
        assert_eq!(pts[1].psi, 130.0);
    }

    #[test]
    fn empty_dataset_still_labelled() {
        let item = ramachandran_chart(&AngleDataset::new(), "9xyz");
        assert_eq!(item.point_count(), 0);
        let labels = item.spec.layer.last().unwrap().data.as_ref().unwrap();
        assert_eq!(labels.values.len(), 3);
        assert_eq!(item.spec.title.text, "Ramachandran Plot of 9xyz");
    }

    #[test]
    fn scatter_layer_styling() {
        let item = ramachandran_chart(&dataset(), "x");
        let scatter = item
            .spec
            .layer
            .iter()
            .find(|l| l.mark.kind == MarkType::Circle)
            .unwrap();
        assert_eq!(scatter.mark.opacity, Some(0.5));
        assert!(scatter.data.is_none());
        let x = scatter.encoding.x.as_ref().unwrap();
        assert_eq!(x.scale.as_ref().unwrap().domain, [-180.0, 180.0]);
        assert_eq!(x.axis.as_ref().unwrap().title, X_AXIS_LABEL);
        let y = scatter.encoding.y.as_ref().unwrap();
        assert_eq!(y.axis.as_ref().unwrap().title, Y_AXIS_LABEL);
        assert_eq!(scatter.encoding.tooltip.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn guide_lines_dashed_and_solid() {
        let item = ramachandran_chart(&dataset(), "x");
        let rules: Vec<&Layer> = item
            .spec
            .layer
            .iter()
            .filter(|l| l.mark.kind == MarkType::Rule)
            .collect();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules.iter().filter(|l| l.mark.stroke_dash.is_some()).count(), 2);
        for rule in rules {
            let e = &rule.encoding;
            let spans = e.x2.is_some() || e.y2.is_some();
            assert!(spans);
        }
    }

    #[test]
    fn region_labels() {
        let item = ramachandran_chart(&dataset(), "x");
        let text = item.spec.layer.iter().find(|l| l.mark.kind == MarkType::Text).unwrap();
        assert_eq!(text.mark.align.as_deref(), Some("center"));
        assert_eq!(text.mark.baseline.as_deref(), Some("middle"));
        let values = &text.data.as_ref().unwrap().values;
        assert_eq!(values[0].text.as_deref(), Some("β sheet"));
        assert_eq!((values[2].x, values[2].y), (Some(-20.0), Some(-180.0)));
    }

    #[test]
    fn root_id_is_deterministic() {
        let a = ramachandran_chart(&dataset(), "1ah9");
        let b = ramachandran_chart(&dataset(), "1ah9");
        let c = ramachandran_chart(&dataset(), "2abc");
        assert_eq!(a.root_id, b.root_id);
        assert_ne!(a.root_id, c.root_id);
        assert!(a.root_id.starts_with("phipsi-"));
    }

    #[test]
    fn target_id_and_size_overrides() {
        let item = PlotRenderer::new()
            .with_size(400, 300)
            .with_target_id("rama")
            .render(&dataset(), "x");
        assert_eq!(item.target_id.as_deref(), Some("rama"));
        assert_eq!((item.spec.width, item.spec.height), (400, 300));
    }
}
