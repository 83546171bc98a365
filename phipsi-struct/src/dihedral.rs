//! Backbone phi/psi extraction.
//!
//! For every model and chain, the chain is split into polypeptide segments
//! (see [`crate::peptide`]) and each interior residue of a segment yields
//! one `(phi, psi)` pair:
//!
//! - phi = dihedral(C[i-1], N[i], CA[i], C[i])
//! - psi = dihedral(N[i], CA[i], C[i], N[i+1])
//!
//! Segment termini never contribute, and a pair is emitted only when both
//! angles can be computed.

use phipsi_core::hash::sha256_chunks;
use phipsi_core::{ContentAddressable, Summarizable};
use serde::{Deserialize, Serialize};

use crate::geometry::dihedral_points;
use crate::peptide::{PolypeptideBuilder, Segment};
use crate::types::{Residue, Structure};

/// One residue's backbone dihedrals, in degrees within (-180, 180].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnglePair {
    pub phi: f64,
    pub psi: f64,
    /// Serial number of the model the residue belongs to.
    pub model: u32,
    pub chain: char,
    /// Three-letter residue name.
    pub residue: String,
    pub seq_num: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i_code: Option<char>,
}

impl AnglePair {
    /// Residue label such as `"A:GLY42"` or `"B:SER100A"`.
    pub fn label(&self) -> String {
        match self.i_code {
            Some(ic) => format!("{}:{}{}{}", self.chain, self.residue, self.seq_num, ic),
            None => format!("{}:{}{}", self.chain, self.residue, self.seq_num),
        }
    }
}

/// Ordered phi/psi pairs across all models and chains of a structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleDataset {
    pub pairs: Vec<AnglePair>,
}

impl AngleDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnglePair> {
        self.pairs.iter()
    }

    /// Phi values in dataset order.
    pub fn phi(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.phi).collect()
    }

    /// Psi values in dataset order.
    pub fn psi(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.psi).collect()
    }
}

impl<'a> IntoIterator for &'a AngleDataset {
    type Item = &'a AnglePair;
    type IntoIter = std::slice::Iter<'a, AnglePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl FromIterator<AnglePair> for AngleDataset {
    fn from_iter<I: IntoIterator<Item = AnglePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl Summarizable for AngleDataset {
    fn summary(&self) -> String {
        let mut chains: Vec<(u32, char)> = self.pairs.iter().map(|p| (p.model, p.chain)).collect();
        chains.sort_unstable();
        chains.dedup();
        format!(
            "{} phi/psi pair(s) from {} model chain(s)",
            self.len(),
            chains.len()
        )
    }
}

impl ContentAddressable for AngleDataset {
    fn content_hash(&self) -> String {
        let bytes: Vec<[u8; 16]> = self
            .pairs
            .iter()
            .map(|p| {
                let mut buf = [0u8; 16];
                buf[..8].copy_from_slice(&p.phi.to_le_bytes());
                buf[8..].copy_from_slice(&p.psi.to_le_bytes());
                buf
            })
            .collect();
        sha256_chunks(bytes.iter().map(|b| b.as_slice()))
    }
}

/// Computes phi/psi datasets from structures.
///
/// Holds no per-request state; one extractor can be shared by every caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct DihedralExtractor {
    builder: PolypeptideBuilder,
}

impl DihedralExtractor {
    pub fn new(builder: PolypeptideBuilder) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &PolypeptideBuilder {
        &self.builder
    }

    /// Extract pairs ordered by model, chain, segment and residue.
    pub fn extract(&self, structure: &Structure) -> AngleDataset {
        let mut dataset = AngleDataset::new();
        for model in &structure.models {
            for chain in &model.chains {
                let segments = self.builder.build(chain);
                log::debug!(
                    "{} model {} chain {}: {} segment(s)",
                    structure.id,
                    model.serial,
                    chain.id,
                    segments.len()
                );
                for segment in &segments {
                    segment_angles(model.serial, segment, &mut dataset);
                }
            }
        }
        dataset
    }
}

fn segment_angles(model: u32, segment: &Segment<'_>, out: &mut AngleDataset) {
    for window in segment.residues().windows(3) {
        let (prev, curr, next) = (window[0], window[1], window[2]);
        if let Some((phi, psi)) = residue_phi_psi(prev, curr, next) {
            out.pairs.push(AnglePair {
                phi,
                psi,
                model,
                chain: segment.chain_id(),
                residue: curr.name.clone(),
                seq_num: curr.seq_num,
                i_code: curr.i_code,
            });
        }
    }
}

/// Phi and psi of `curr` given its bonded neighbours.
///
/// `None` when a backbone atom is missing or either angle is not finite.
pub fn residue_phi_psi(prev: &Residue, curr: &Residue, next: &Residue) -> Option<(f64, f64)> {
    let c_prev = prev.coords_of("C")?;
    let n = curr.coords_of("N")?;
    let ca = curr.coords_of("CA")?;
    let c = curr.coords_of("C")?;
    let n_next = next.coords_of("N")?;

    let phi = dihedral_points(&c_prev, &n, &ca, &c);
    let psi = dihedral_points(&n, &ca, &c, &n_next);
    (phi.is_finite() && psi.is_finite()).then_some((phi, psi))
}

/// Phi/psi pairs of every model and chain with the default builder
/// (standard amino acids, 1.8 Å peptide-bond cutoff).
pub fn phi_psi_angles(structure: &Structure) -> AngleDataset {
    DihedralExtractor::default().extract(structure)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::geometry::angular_difference;
    use crate::types::{Chain, Model};

    fn assert_angle(actual: f64, expected: f64) {
        assert!(
            angular_difference(actual, expected) < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn extended_tripeptide_yields_one_pair_near_180() {
        let s = structure(vec![uniform_chain('A', 3, 180.0, 180.0)]);
        let ds = phi_psi_angles(&s);
        assert_eq!(ds.len(), 1);
        let pair = &ds.pairs[0];
        assert_angle(pair.phi, 180.0);
        assert_angle(pair.psi, 180.0);
        assert_eq!(pair.seq_num, 2);
        assert_eq!(pair.chain, 'A');
        assert_eq!(pair.model, 1);
    }

    #[test]
    fn helix_and_sheet_angles_recovered() {
        for (phi, psi) in [(-57.0, -47.0), (-120.0, 130.0), (60.0, 45.0)] {
            let s = structure(vec![uniform_chain('A', 6, phi, psi)]);
            let ds = phi_psi_angles(&s);
            assert_eq!(ds.len(), 4);
            for pair in &ds {
                assert_angle(pair.phi, phi);
                assert_angle(pair.psi, psi);
            }
        }
    }

    #[test]
    fn short_chains_contribute_nothing() {
        let s = structure(vec![uniform_chain('A', 2, -60.0, -45.0), uniform_chain('B', 1, -60.0, -45.0)]);
        assert!(phi_psi_angles(&s).is_empty());
        assert!(phi_psi_angles(&structure(vec![])).is_empty());
    }

    #[test]
    fn broken_chain_splits_into_segments() {
        // Two 4-residue pieces far apart in one chain: 2 interior residues each.
        let mut residues = uniform_chain('A', 4, -60.0, -45.0).residues;
        let mut tail = uniform_chain('A', 4, -60.0, -45.0).residues;
        for (i, r) in tail.iter_mut().enumerate() {
            r.seq_num = 20 + i as i32;
            for a in &mut r.atoms {
                a.coords = a.coords.add(&crate::types::Point3D::new(50.0, 0.0, 0.0));
            }
        }
        residues.extend(tail);
        let s = structure(vec![Chain::new('A', residues)]);
        let ds = phi_psi_angles(&s);
        let seqs: Vec<i32> = ds.iter().map(|p| p.seq_num).collect();
        assert_eq!(seqs, vec![2, 3, 21, 22]);
    }

    #[test]
    fn missing_atom_skips_residue() {
        let mut chain = uniform_chain('A', 5, -60.0, -45.0);
        // Residue 3 loses its C: it is still bonded to residue 2 (via its N)
        // but not to residue 4, so the segment ends after it.
        chain.residues[2].atoms.retain(|a| a.trimmed_name() != "C");
        let ds = phi_psi_angles(&structure(vec![chain]));
        let seqs: Vec<i32> = ds.iter().map(|p| p.seq_num).collect();
        assert_eq!(seqs, vec![2]);
    }

    #[test]
    fn missing_ca_skips_only_that_residue() {
        let mut chain = uniform_chain('A', 5, -60.0, -45.0);
        chain.residues[2].atoms.retain(|a| a.trimmed_name() != "CA");
        let ds = phi_psi_angles(&structure(vec![chain]));
        let seqs: Vec<i32> = ds.iter().map(|p| p.seq_num).collect();
        assert_eq!(seqs, vec![2, 4]);
    }

    #[test]
    fn hetero_residue_breaks_chain() {
        let mut chain = uniform_chain('A', 7, -60.0, -45.0);
        chain.residues[3].name = "HOH".into();
        let ds = phi_psi_angles(&structure(vec![chain]));
        let seqs: Vec<i32> = ds.iter().map(|p| p.seq_num).collect();
        assert_eq!(seqs, vec![2, 6]);
    }

    #[test]
    fn all_models_are_visited_in_order() {
        let chain = uniform_chain('A', 4, -60.0, -45.0);
        let s = Structure {
            id: "NMR1".into(),
            models: vec![Model::new(1, vec![chain.clone()]), Model::new(2, vec![chain])],
        };
        let ds = phi_psi_angles(&s);
        assert_eq!(ds.len(), 4);
        let models: Vec<u32> = ds.iter().map(|p| p.model).collect();
        assert_eq!(models, vec![1, 1, 2, 2]);
        assert!(ds.summary().starts_with("4 phi/psi pair(s) from 2 model chain(s)"));
    }

    #[test]
    fn permissive_builder_keeps_modified_residues() {
        let names = ["ALA", "MSE", "ALA", "ALA"];
        let residues = backbone(&names, &[-60.0; 4], &[-45.0; 4]);
        let s = structure(vec![Chain::new('A', residues)]);
        assert!(phi_psi_angles(&s).is_empty());

        let extractor = DihedralExtractor::new(PolypeptideBuilder::new().standard_only(false));
        let ds = extractor.extract(&s);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.pairs[0].residue, "MSE");
    }

    #[test]
    fn dataset_accessors_and_hash() {
        let s = structure(vec![uniform_chain('A', 5, -60.0, -45.0)]);
        let ds = phi_psi_angles(&s);
        assert_eq!(ds.phi().len(), 3);
        assert_eq!(ds.psi().len(), 3);
        assert_eq!(ds.pairs[0].label(), "A:ALA2");
        assert_eq!(ds.content_hash(), ds.clone().content_hash());
        assert_ne!(ds.content_hash(), AngleDataset::new().content_hash());

        let json = serde_json::to_string(&ds).unwrap();
        assert!(!json.contains("i_code"));
        let back: AngleDataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), ds.len());
    }

    #[test]
    fn label_with_insertion_code() {
        let pair = AnglePair {
            phi: -60.0,
            psi: -45.0,
            model: 1,
            chain: 'B',
            residue: "SER".into(),
            seq_num: 100,
            i_code: Some('A'),
        };
        assert_eq!(pair.label(), "B:SER100A");
    }
}
