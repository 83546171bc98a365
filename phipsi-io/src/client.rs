//! Async HTTP client for the upstream databases.
//!
//! Every call is a single GET with no retry. Status handling follows one
//! rule for all sources: 404 becomes [`PhipsiError::NotFound`], any other
//! non-success status or transport failure becomes [`PhipsiError::Fetch`],
//! and a body that is not the expected format becomes
//! [`PhipsiError::Parse`].

use std::sync::Arc;

use phipsi_core::{PhipsiError, Result};
use phipsi_struct::{parse_pdb, Structure};
use serde_json::Value;

use crate::fetch::{
    validate_emdb_id, validate_go_id, validate_pdb_id, validate_pmid,
    validate_uniprot_accession, Endpoints,
};

/// User-Agent header for outbound requests.
pub const USER_AGENT: &str = concat!("phipsi/", env!("CARGO_PKG_VERSION"));

/// Shared handle for upstream requests. Cloning is cheap; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

impl SourceClient {
    /// Create a client for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PhipsiError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http(http, endpoints))
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_http(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` and return the body as text. `what` names the resource in
    /// error messages.
    pub async fn fetch_text(&self, url: &str, what: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PhipsiError::Fetch(format!("network error fetching {}: {}", what, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PhipsiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            log::warn!("{} answered HTTP {}", url, status.as_u16());
            return Err(PhipsiError::Fetch(format!(
                "HTTP error {} for {}",
                status.as_u16(),
                what
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PhipsiError::Fetch(format!("failed to read {}: {}", what, e)))
    }

    /// GET `url` and decode the body as JSON.
    pub async fn fetch_json(&self, url: &str, what: &str) -> Result<Value> {
        let body = self.fetch_text(url, what).await?;
        serde_json::from_str(&body)
            .map_err(|e| PhipsiError::Parse(format!("{} is not valid JSON: {}", what, e)))
    }

    /// Download the PDB-format file of an entry.
    pub async fn fetch_pdb(&self, pdb_id: &str) -> Result<String> {
        validate_pdb_id(pdb_id)?;
        let url = self.endpoints.pdb_file(pdb_id);
        self.fetch_text(&url, &format!("PDB entry '{}'", pdb_id)).await
    }

    /// Download and parse an entry. The structure takes `pdb_id` as its ID
    /// when the file carries no HEADER ID.
    pub async fn fetch_structure(&self, pdb_id: &str) -> Result<Structure> {
        let text = self.fetch_pdb(pdb_id).await?;
        let mut structure = parse_pdb(&text)?;
        if structure.id == "UNKN" {
            structure.id = pdb_id.to_string();
        }
        Ok(structure)
    }

    /// RCSB Data API entry record.
    pub async fn rcsb_entry(&self, pdb_id: &str) -> Result<Value> {
        validate_pdb_id(pdb_id)?;
        let url = self.endpoints.rcsb_entry(pdb_id);
        self.fetch_json(&url, &format!("RCSB entry '{}'", pdb_id)).await
    }

    /// UniProtKB entry.
    pub async fn uniprot_entry(&self, accession: &str) -> Result<Value> {
        validate_uniprot_accession(accession)?;
        let url = self.endpoints.uniprot_entry(accession);
        self.fetch_json(&url, &format!("UniProt entry '{}'", accession)).await
    }

    /// QuickGO term record. A response without results counts as not found.
    pub async fn quickgo_term(&self, go_id: &str) -> Result<Value> {
        validate_go_id(go_id)?;
        let url = self.endpoints.quickgo_term(go_id);
        let what = format!("GO term '{}'", go_id);
        let value = self.fetch_json(&url, &what).await?;
        let empty = value
            .get("results")
            .and_then(Value::as_array)
            .is_some_and(|r| r.is_empty());
        if empty {
            return Err(PhipsiError::NotFound(what));
        }
        Ok(value)
    }

    /// PubMed document summary, reduced to the record for `pmid`.
    pub async fn pubmed_summary(&self, pmid: &str) -> Result<Value> {
        validate_pmid(pmid)?;
        let url = self.endpoints.pubmed_summary(pmid);
        let what = format!("PubMed record '{}'", pmid);
        let value = self.fetch_json(&url, &what).await?;
        pubmed_record(value, pmid).ok_or(PhipsiError::NotFound(what))
    }

    /// EMDB entry.
    pub async fn emdb_entry(&self, emdb_id: &str) -> Result<Value> {
        validate_emdb_id(emdb_id)?;
        let url = self.endpoints.emdb_entry(emdb_id);
        self.fetch_json(&url, &format!("EMDB entry '{}'", emdb_id)).await
    }
}

/// Pull `result[pmid]` out of an esummary response. Entries that E-utilities
/// reports with an `error` field are treated as absent.
fn pubmed_record(mut value: Value, pmid: &str) -> Option<Value> {
    let record = value.get_mut("result")?.get_mut(pmid)?.take();
    if record.is_null() || record.get("error").is_some() {
        None
    } else {
        Some(record)
    }
}
