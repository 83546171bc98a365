//! Ramachandran chart rendering for the phipsi workspace.
//!
//! - **Chart model** — Typed Vega-Lite layered spec in [`vega`]
//! - **Renderer** — Angle dataset to [`ChartItem`] in [`ramachandran`]
//! - **Output** — JSON via [`ChartItem::to_json`], standalone page via
//!   [`ChartItem::to_html`]
//!
//! # Quick start
//!
//! ```
//! use phipsi_plot::ramachandran_chart;
//! use phipsi_struct::AngleDataset;
//!
//! let item = ramachandran_chart(&AngleDataset::new(), "1ah9");
//! assert_eq!(item.title(), "Ramachandran Plot of 1ah9");
//! assert!(item.to_html().unwrap().contains("vega-embed"));
//! ```

pub mod html;
pub mod item;
pub mod ramachandran;
pub mod vega;

pub use item::ChartItem;
pub use ramachandran::{chart_title, ramachandran_chart, PlotRenderer};
