//! Shared, immutable request state.

use std::sync::Arc;

use anyhow::{Context, Result};
use phipsi_io::{Endpoints, SourceClient};
use phipsi_plot::PlotRenderer;
use phipsi_struct::{DihedralExtractor, PolypeptideBuilder};

use crate::config::ServerConfig;

/// Everything a handler needs. Cloned per request; the HTTP connection pool
/// and configuration are shared.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub client: SourceClient,
    pub extractor: DihedralExtractor,
    pub renderer: PlotRenderer,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let client = SourceClient::new(Endpoints::from(&config.upstream))
            .context("creating upstream HTTP client")?;
        let builder = PolypeptideBuilder::new()
            .with_bond_cutoff(config.analysis.peptide_bond_cutoff)
            .standard_only(config.analysis.standard_residues_only);
        Ok(Self {
            config: Arc::new(config),
            client,
            extractor: DihedralExtractor::new(builder),
            renderer: PlotRenderer::default(),
        })
    }
}
