//! URL builders and identifier validation for the public databases the
//! service reads from: RCSB PDB, UniProt, QuickGO, NCBI E-utilities (PubMed)
//! and EMDB.
//!
//! Every builder takes the base URL explicitly so deployments and tests can
//! point it elsewhere; [`Endpoints`] bundles one base per source and defaults
//! to the public services.

use phipsi_core::{PhipsiError, Result};

// ---------------------------------------------------------------------------
// Percent-encoding helper
// ---------------------------------------------------------------------------

/// Percent-encode characters that are reserved in a path segment or query
/// value.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for b in input.bytes() {
        match b {
            b' ' => out.push_str("%20"),
            b'&' => out.push_str("%26"),
            b'=' => out.push_str("%3D"),
            b'+' => out.push_str("%2B"),
            b'#' => out.push_str("%23"),
            b'/' => out.push_str("%2F"),
            b':' => out.push_str("%3A"),
            b'?' => out.push_str("%3F"),
            b'%' => out.push_str("%25"),
            _ => out.push(b as char),
        }
    }
    out
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

// ---------------------------------------------------------------------------
// RCSB PDB
// ---------------------------------------------------------------------------

/// URL builder for RCSB PDB file downloads and the RCSB Data API.
pub struct RcsbUrl;

impl RcsbUrl {
    pub const FILES_BASE: &'static str = "https://files.rcsb.org/download";
    pub const DATA_BASE: &'static str = "https://data.rcsb.org/rest/v1/core";

    /// Build the PDB-format download URL for an entry.
    ///
    /// ```
    /// use phipsi_io::fetch::RcsbUrl;
    /// let url = RcsbUrl::pdb_file(RcsbUrl::FILES_BASE, "1ah9");
    /// assert_eq!(url, "https://files.rcsb.org/download/1ah9.pdb");
    /// ```
    pub fn pdb_file(base_url: &str, pdb_id: &str) -> String {
        format!("{}/{}.pdb", trim_base(base_url), percent_encode(pdb_id))
    }

    /// Build a Data API entry URL.
    pub fn entry(base_url: &str, pdb_id: &str) -> String {
        format!("{}/entry/{}", trim_base(base_url), percent_encode(pdb_id))
    }
}

// ---------------------------------------------------------------------------
// UniProt
// ---------------------------------------------------------------------------

/// URL builder for the UniProt REST API.
pub struct UniprotUrl;

impl UniprotUrl {
    pub const BASE: &'static str = "https://rest.uniprot.org/uniprotkb";

    /// Build an entry retrieval URL.
    ///
    /// ```
    /// use phipsi_io::fetch::UniprotUrl;
    /// let url = UniprotUrl::entry(UniprotUrl::BASE, "P69905", "json");
    /// assert!(url.ends_with("/P69905.json"));
    /// ```
    pub fn entry(base_url: &str, accession: &str, format: &str) -> String {
        format!(
            "{}/{}.{}",
            trim_base(base_url),
            percent_encode(accession),
            percent_encode(format)
        )
    }
}

// ---------------------------------------------------------------------------
// QuickGO
// ---------------------------------------------------------------------------

/// URL builder for the QuickGO ontology service.
pub struct QuickGoUrl;

impl QuickGoUrl {
    pub const BASE: &'static str = "https://www.ebi.ac.uk/QuickGO/services/ontology/go";

    /// Build a GO term lookup URL. The colon in the identifier is encoded.
    pub fn term(base_url: &str, go_id: &str) -> String {
        format!("{}/terms/{}", trim_base(base_url), percent_encode(go_id))
    }
}

// ---------------------------------------------------------------------------
// NCBI Entrez
// ---------------------------------------------------------------------------

/// URL builder for NCBI Entrez E-utilities.
pub struct EntrezUrl;

impl EntrezUrl {
    pub const BASE: &'static str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// Build a JSON esummary URL for one or more IDs.
    pub fn esummary(base_url: &str, db: &str, ids: &[&str]) -> String {
        format!(
            "{}/esummary.fcgi?db={}&id={}&retmode=json",
            trim_base(base_url),
            percent_encode(db),
            ids.iter().map(|id| percent_encode(id)).collect::<Vec<_>>().join(","),
        )
    }
}

// ---------------------------------------------------------------------------
// EMDB
// ---------------------------------------------------------------------------

/// URL builder for the EMDB REST API.
pub struct EmdbUrl;

impl EmdbUrl {
    pub const BASE: &'static str = "https://www.ebi.ac.uk/emdb/api";

    /// Build an entry URL.
    pub fn entry(base_url: &str, emdb_id: &str) -> String {
        format!("{}/entry/{}", trim_base(base_url), percent_encode(emdb_id))
    }
}

// ---------------------------------------------------------------------------
// Endpoint set
// ---------------------------------------------------------------------------

/// Base URLs for every upstream source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub rcsb_files: String,
    pub rcsb_data: String,
    pub uniprot: String,
    pub quickgo: String,
    pub eutils: String,
    pub emdb: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rcsb_files: RcsbUrl::FILES_BASE.into(),
            rcsb_data: RcsbUrl::DATA_BASE.into(),
            uniprot: UniprotUrl::BASE.into(),
            quickgo: QuickGoUrl::BASE.into(),
            eutils: EntrezUrl::BASE.into(),
            emdb: EmdbUrl::BASE.into(),
        }
    }
}

impl Endpoints {
    /// Every source served from one base URL, with each source's path
    /// below it. Meant for local stand-ins.
    pub fn all_at(base_url: &str) -> Self {
        let base = trim_base(base_url);
        Self {
            rcsb_files: format!("{}/download", base),
            rcsb_data: format!("{}/rcsb", base),
            uniprot: format!("{}/uniprotkb", base),
            quickgo: format!("{}/quickgo", base),
            eutils: format!("{}/eutils", base),
            emdb: format!("{}/emdb", base),
        }
    }

    pub fn pdb_file(&self, pdb_id: &str) -> String {
        RcsbUrl::pdb_file(&self.rcsb_files, pdb_id)
    }

    pub fn rcsb_entry(&self, pdb_id: &str) -> String {
        RcsbUrl::entry(&self.rcsb_data, pdb_id)
    }

    pub fn uniprot_entry(&self, accession: &str) -> String {
        UniprotUrl::entry(&self.uniprot, accession, "json")
    }

    pub fn quickgo_term(&self, go_id: &str) -> String {
        QuickGoUrl::term(&self.quickgo, go_id)
    }

    pub fn pubmed_summary(&self, pmid: &str) -> String {
        EntrezUrl::esummary(&self.eutils, "pubmed", &[pmid])
    }

    pub fn emdb_entry(&self, emdb_id: &str) -> String {
        EmdbUrl::entry(&self.emdb, emdb_id)
    }
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

/// Validate a PDB ID: four alphanumeric characters (`1ah9`, `4HHB`) or the
/// extended form `pdb_` followed by eight (`pdb_00001ah9`). Case-insensitive.
pub fn validate_pdb_id(pdb_id: &str) -> Result<()> {
    let body = match (pdb_id.len(), pdb_id.get(..4)) {
        (4, _) => Some(pdb_id),
        (12, Some(prefix)) if prefix.eq_ignore_ascii_case("pdb_") => pdb_id.get(4..),
        _ => None,
    };
    if body.is_some_and(|b| b.bytes().all(|c| c.is_ascii_alphanumeric())) {
        Ok(())
    } else {
        Err(PhipsiError::InvalidInput(format!(
            "'{}' is not a PDB ID (expected 4 alphanumeric characters or pdb_ + 8)",
            pdb_id
        )))
    }
}

/// Validate a UniProtKB accession (6 or 10 characters, e.g. `P69905`,
/// `A0A023GPI8`).
pub fn validate_uniprot_accession(accession: &str) -> Result<()> {
    let b = accession.as_bytes();
    let alnum = |c: u8| c.is_ascii_uppercase() || c.is_ascii_digit();
    let first_ok = |c: u8| c.is_ascii_uppercase() && !matches!(c, b'O' | b'P' | b'Q');

    let valid = match b.len() {
        6 if matches!(b[0], b'O' | b'P' | b'Q') => {
            b[1].is_ascii_digit() && b[2..5].iter().all(|&c| alnum(c)) && b[5].is_ascii_digit()
        }
        6 => {
            first_ok(b[0])
                && b[1].is_ascii_digit()
                && b[2].is_ascii_uppercase()
                && b[3..5].iter().all(|&c| alnum(c))
                && b[5].is_ascii_digit()
        }
        10 => {
            first_ok(b[0])
                && b[1].is_ascii_digit()
                && b[2].is_ascii_uppercase()
                && b[3..5].iter().all(|&c| alnum(c))
                && b[5].is_ascii_digit()
                && b[6].is_ascii_uppercase()
                && b[7..9].iter().all(|&c| alnum(c))
                && b[9].is_ascii_digit()
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PhipsiError::InvalidInput(format!(
            "'{}' is not a UniProtKB accession",
            accession
        )))
    }
}

/// Validate a Gene Ontology term ID (`GO:` followed by seven digits).
pub fn validate_go_id(go_id: &str) -> Result<()> {
    match go_id.strip_prefix("GO:") {
        Some(digits) if digits.len() == 7 && digits.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(PhipsiError::InvalidInput(format!(
            "'{}' is not a GO term ID (expected GO:nnnnnnn)",
            go_id
        ))),
    }
}

/// Validate a PubMed ID (1 to 9 digits, not zero).
pub fn validate_pmid(pmid: &str) -> Result<()> {
    let valid = (1..=9).contains(&pmid.len())
        && pmid.bytes().all(|b| b.is_ascii_digit())
        && pmid.bytes().any(|b| b != b'0');
    if valid {
        Ok(())
    } else {
        Err(PhipsiError::InvalidInput(format!("'{}' is not a PubMed ID", pmid)))
    }
}

/// Validate an EMDB ID (`EMD-` followed by 4 or 5 digits).
pub fn validate_emdb_id(emdb_id: &str) -> Result<()> {
    let digits = emdb_id
        .get(..4)
        .filter(|p| p.eq_ignore_ascii_case("EMD-"))
        .and_then(|_| emdb_id.get(4..));
    match digits {
        Some(d) if (4..=5).contains(&d.len()) && d.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(PhipsiError::InvalidInput(format!(
            "'{}' is not an EMDB ID (expected EMD-nnnn)",
            emdb_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encode_reserved() {
        assert_eq!(percent_encode("GO:0008150"), "GO%3A0008150");
        assert_eq!(percent_encode("a b&c"), "a%20b%26c");
        assert_eq!(percent_encode("../x"), "..%2Fx");
    }

    #[test]
    fn rcsb_urls() {
        assert_eq!(
            RcsbUrl::pdb_file(RcsbUrl::FILES_BASE, "1ah9"),
            "https://files.rcsb.org/download/1ah9.pdb"
        );
        assert_eq!(
            RcsbUrl::entry("http://127.0.0.1:9000/rcsb/", "4HHB"),
            "http://127.0.0.1:9000/rcsb/entry/4HHB"
        );
    }

    #[test]
    fn metadata_urls() {
        let e = Endpoints::default();
        assert_eq!(
            e.uniprot_entry("P69905"),
            "https://rest.uniprot.org/uniprotkb/P69905.json"
        );
        assert_eq!(
            e.quickgo_term("GO:0008150"),
            "https://www.ebi.ac.uk/QuickGO/services/ontology/go/terms/GO%3A0008150"
        );
        assert_eq!(
            e.pubmed_summary("31452104"),
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi?db=pubmed&id=31452104&retmode=json"
        );
        assert_eq!(e.emdb_entry("EMD-1234"), "https://www.ebi.ac.uk/emdb/api/entry/EMD-1234");
    }

    #[test]
    fn endpoints_all_at() {
        let e = Endpoints::all_at("http://127.0.0.1:4000/");
        assert_eq!(e.pdb_file("1abc"), "http://127.0.0.1:4000/download/1abc.pdb");
        assert_eq!(e.rcsb_entry("1abc"), "http://127.0.0.1:4000/rcsb/entry/1abc");
        assert!(e.pubmed_summary("1").starts_with("http://127.0.0.1:4000/eutils/esummary.fcgi?"));
    }

    #[test]
    fn pdb_ids() {
        assert!(validate_pdb_id("1ah9").is_ok());
        assert!(validate_pdb_id("4HHB").is_ok());
        assert!(validate_pdb_id("pdb_00001ah9").is_ok());
        assert!(validate_pdb_id("PDB_00001AH9").is_ok());
        assert!(validate_pdb_id("").is_err());
        assert!(validate_pdb_id("1ah").is_err());
        assert!(validate_pdb_id("1ah9x").is_err());
        assert!(validate_pdb_id("1a-9").is_err());
        assert!(validate_pdb_id("../x").is_err());
        assert!(validate_pdb_id("pdb_0001ah9").is_err());
        assert!(validate_pdb_id("xyz_00001ah9").is_err());
    }

    #[test]
    fn uniprot_accessions() {
        assert!(validate_uniprot_accession("P69905").is_ok());
        assert!(validate_uniprot_accession("Q9Y6K9").is_ok());
        assert!(validate_uniprot_accession("A2BC19").is_ok());
        assert!(validate_uniprot_accession("A0A023GPI8").is_ok());
        assert!(validate_uniprot_accession("p69905").is_err());
        assert!(validate_uniprot_accession("P6990").is_err());
        assert!(validate_uniprot_accession("A12345").is_err());
        assert!(validate_uniprot_accession("P69905.json").is_err());
    }

    #[test]
    fn go_ids() {
        assert!(validate_go_id("GO:0008150").is_ok());
        assert!(validate_go_id("GO:008150").is_err());
        assert!(validate_go_id("go:0008150").is_err());
        assert!(validate_go_id("0008150").is_err());
    }

    #[test]
    fn pmids() {
        assert!(validate_pmid("31452104").is_ok());
        assert!(validate_pmid("1").is_ok());
        assert!(validate_pmid("0").is_err());
        assert!(validate_pmid("").is_err());
        assert!(validate_pmid("12a").is_err());
        assert!(validate_pmid("1234567890").is_err());
    }

    #[test]
    fn emdb_ids() {
        assert!(validate_emdb_id("EMD-1234").is_ok());
        assert!(validate_emdb_id("emd-12345").is_ok());
        assert!(validate_emdb_id("EMD-123").is_err());
        assert!(validate_emdb_id("EMD-123456").is_err());
        assert!(validate_emdb_id("1234").is_err());
    }
}
