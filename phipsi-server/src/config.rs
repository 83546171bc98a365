//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden by command-line flags
//! or their environment variables (see [`Cli`]). Every section and field has
//! a default, so an empty file is a valid configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use phipsi_io::Endpoints;
use phipsi_struct::DEFAULT_PEPTIDE_BOND_CUTOFF;
use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Default `env_logger` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            cors: CorsConfig::default(),
            upstream: UpstreamConfig::default(),
            defaults: DefaultsConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.cors.allowed_origins.is_empty() {
            anyhow::bail!("cors.allowed_origins must list at least one origin");
        }
        for origin in &self.cors.allowed_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                anyhow::bail!("cors.allowed_origins contains an invalid origin: {:?}", origin);
            }
        }

        phipsi_io::fetch::validate_pdb_id(&self.defaults.pdb_id)
            .context("defaults.pdb_id")?;

        let cutoff = self.analysis.peptide_bond_cutoff;
        if !(cutoff.is_finite() && cutoff > 0.0) {
            anyhow::bail!("analysis.peptide_bond_cutoff must be > 0 (got {})", cutoff);
        }

        for (name, url) in self.upstream.named() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("upstream.{} must be an http(s) URL (got {:?})", name, url);
            }
        }

        Ok(())
    }

    /// The parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("bind address {:?} is not host:port", self.bind))
    }
}

/// Cross-origin resource sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API; `"*"` allows any origin and turns
    /// credentials off.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: true,
        }
    }
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_rcsb_files")]
    pub rcsb_files: String,
    #[serde(default = "default_rcsb_data")]
    pub rcsb_data: String,
    #[serde(default = "default_uniprot")]
    pub uniprot: String,
    #[serde(default = "default_quickgo")]
    pub quickgo: String,
    #[serde(default = "default_eutils")]
    pub eutils: String,
    #[serde(default = "default_emdb")]
    pub emdb: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Endpoints::default().into()
    }
}

impl UpstreamConfig {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("rcsb_files", &self.rcsb_files),
            ("rcsb_data", &self.rcsb_data),
            ("uniprot", &self.uniprot),
            ("quickgo", &self.quickgo),
            ("eutils", &self.eutils),
            ("emdb", &self.emdb),
        ]
    }
}

impl From<Endpoints> for UpstreamConfig {
    fn from(e: Endpoints) -> Self {
        Self {
            rcsb_files: e.rcsb_files,
            rcsb_data: e.rcsb_data,
            uniprot: e.uniprot,
            quickgo: e.quickgo,
            eutils: e.eutils,
            emdb: e.emdb,
        }
    }
}

impl From<&UpstreamConfig> for Endpoints {
    fn from(u: &UpstreamConfig) -> Self {
        Endpoints {
            rcsb_files: u.rcsb_files.clone(),
            rcsb_data: u.rcsb_data.clone(),
            uniprot: u.uniprot.clone(),
            quickgo: u.quickgo.clone(),
            eutils: u.eutils.clone(),
            emdb: u.emdb.clone(),
        }
    }
}

/// Values used when a request leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Entry shown by `/` without a `pdb_id` query parameter.
    #[serde(default = "default_pdb_id")]
    pub pdb_id: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pdb_id: default_pdb_id(),
        }
    }
}

/// Dihedral extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum C–N distance in Angstroms for a peptide bond.
    #[serde(default = "default_peptide_bond_cutoff")]
    pub peptide_bond_cutoff: f64,

    /// Accept only the twenty standard amino acids in segments.
    #[serde(default = "default_true")]
    pub standard_residues_only: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            peptide_bond_cutoff: default_peptide_bond_cutoff(),
            standard_residues_only: true,
        }
    }
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_true() -> bool { true }
fn default_allowed_origins() -> Vec<String> { vec!["http://localhost:3000".to_string()] }
fn default_rcsb_files() -> String { Endpoints::default().rcsb_files }
fn default_rcsb_data() -> String { Endpoints::default().rcsb_data }
fn default_uniprot() -> String { Endpoints::default().uniprot }
fn default_quickgo() -> String { Endpoints::default().quickgo }
fn default_eutils() -> String { Endpoints::default().eutils }
fn default_emdb() -> String { Endpoints::default().emdb }
fn default_pdb_id() -> String { "1ah9".to_string() }
fn default_peptide_bond_cutoff() -> f64 { DEFAULT_PEPTIDE_BOND_CUTOFF }

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Command-line options. Flags take precedence over the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "phipsi-server")]
#[command(version)]
#[command(about = "Ramachandran plot service backed by RCSB PDB", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "PHIPSI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000
    #[arg(long, env = "PHIPSI_BIND")]
    pub bind: Option<String>,

    /// Default log filter (RUST_LOG still wins)
    #[arg(long, env = "PHIPSI_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Allowed CORS origin; repeat or separate with commas
    #[arg(long = "allow-origin", env = "PHIPSI_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// PDB ID shown by `/` when none is given
    #[arg(long, env = "PHIPSI_DEFAULT_PDB_ID")]
    pub default_pdb_id: Option<String>,

    /// Peptide-bond C–N cutoff in Angstroms
    #[arg(long)]
    pub peptide_bond_cutoff: Option<f64>,

    /// Base URL for RCSB file downloads
    #[arg(long, env = "PHIPSI_RCSB_FILES_URL")]
    pub rcsb_files_url: Option<String>,
}

impl Cli {
    /// Read the config file (if any) and apply flag overrides.
    pub fn load_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if !self.allowed_origins.is_empty() {
            config.cors.allowed_origins = self.allowed_origins.clone();
        }
        if let Some(id) = &self.default_pdb_id {
            config.defaults.pdb_id = id.clone();
        }
        if let Some(cutoff) = self.peptide_bond_cutoff {
            config.analysis.peptide_bond_cutoff = cutoff;
        }
        if let Some(url) = &self.rcsb_files_url {
            config.upstream.rcsb_files = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ServerConfig::default();
        assert_eq!(c.bind, "127.0.0.1:8000");
        assert_eq!(c.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert!(c.cors.allow_credentials);
        assert_eq!(c.defaults.pdb_id, "1ah9");
        assert_eq!(c.analysis.peptide_bond_cutoff, 1.8);
        assert_eq!(c.upstream.rcsb_files, "https://files.rcsb.org/download");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn partial_toml() {
        let c = ServerConfig::from_toml(
            r#"
bind = "0.0.0.0:9000"

[cors]
allowed_origins = ["https://app.example.org", "http://localhost:3000"]

[defaults]
pdb_id = "4hhb"

[analysis]
peptide_bond_cutoff = 2.0
"#,
        )
        .unwrap();
        assert_eq!(c.bind_addr().unwrap().port(), 9000);
        assert_eq!(c.cors.allowed_origins.len(), 2);
        assert!(c.cors.allow_credentials);
        assert_eq!(c.defaults.pdb_id, "4hhb");
        assert_eq!(c.analysis.peptide_bond_cutoff, 2.0);
        assert!(c.analysis.standard_residues_only);
        assert_eq!(c.upstream, UpstreamConfig::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn mistyped_field_rejected() {
        assert!(ServerConfig::from_toml("bind = 8000").is_err());
    }

    #[test]
    fn validation_failures() {
        let mut c = ServerConfig::default();
        c.bind = "localhost".into();
        assert!(c.validate().is_err());

        let mut c = ServerConfig::default();
        c.cors.allowed_origins.clear();
        assert!(c.validate().is_err());

        let mut c = ServerConfig::default();
        c.analysis.peptide_bond_cutoff = 0.0;
        assert!(c.validate().is_err());

        let mut c = ServerConfig::default();
        c.defaults.pdb_id = "not-an-id".into();
        assert!(c.validate().is_err());

        let mut c = ServerConfig::default();
        c.upstream.uniprot = "ftp://example.org".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn cli_overrides_file_values() {
        let cli = Cli::parse_from([
            "phipsi-server",
            "--bind",
            "0.0.0.0:8080",
            "--allow-origin",
            "https://a.example,https://b.example",
            "--default-pdb-id",
            "2abc",
            "--peptide-bond-cutoff",
            "1.6",
        ]);
        let mut c = ServerConfig::default();
        cli.apply(&mut c);
        assert_eq!(c.bind, "0.0.0.0:8080");
        assert_eq!(c.cors.allowed_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(c.defaults.pdb_id, "2abc");
        assert_eq!(c.analysis.peptide_bond_cutoff, 1.6);
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn endpoints_conversion() {
        let u = UpstreamConfig::default();
        let e: Endpoints = (&u).into();
        assert_eq!(e, Endpoints::default());
    }
}
