//! Polypeptide segment building.
//!
//! A chain as written in a PDB file is rarely one continuous polypeptide:
//! ligands, waters and modified residues interrupt it, and unresolved loops
//! leave gaps in the backbone. [`PolypeptideBuilder`] splits a chain into
//! [`Segment`]s, maximal runs of accepted residues in which every
//! consecutive pair is joined by a peptide bond.

use crate::residue::{is_standard_amino_acid, one_letter_code};
use crate::types::{Atom, Chain, Residue};

/// Maximum C(i)–N(i+1) distance in Angstroms for two residues to count as
/// peptide-bonded.
pub const DEFAULT_PEPTIDE_BOND_CUTOFF: f64 = 1.8;

/// Splits chains into bond-continuous polypeptide segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolypeptideBuilder {
    bond_cutoff: f64,
    standard_only: bool,
}

impl Default for PolypeptideBuilder {
    fn default() -> Self {
        Self {
            bond_cutoff: DEFAULT_PEPTIDE_BOND_CUTOFF,
            standard_only: true,
        }
    }
}

impl PolypeptideBuilder {
    /// Builder with the default 1.8 Å cutoff, accepting only the twenty
    /// standard amino acids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the peptide-bond distance cutoff in Angstroms.
    pub fn with_bond_cutoff(mut self, cutoff: f64) -> Self {
        self.bond_cutoff = cutoff;
        self
    }

    /// When `false`, non-standard residues with a CA atom are accepted too,
    /// so modified residues (MSE, SEP, ...) no longer break a segment.
    pub fn standard_only(mut self, standard_only: bool) -> Self {
        self.standard_only = standard_only;
        self
    }

    /// The configured peptide-bond cutoff.
    pub fn bond_cutoff(&self) -> f64 {
        self.bond_cutoff
    }

    /// Whether `residue` may be part of a segment.
    ///
    /// Standard amino acids are always accepted, even with backbone atoms
    /// missing; the extractor skips such positions on its own.
    pub fn accepts(&self, residue: &Residue) -> bool {
        if is_standard_amino_acid(&residue.name) {
            return true;
        }
        !self.standard_only && residue.get_atom("CA").is_some()
    }

    /// Whether `prev` and `next` are joined by a peptide bond.
    ///
    /// Every alternate location of C in `prev` is tried against every
    /// alternate location of N in `next`; a pairing counts when the two
    /// share an altloc identifier (or one of them has none) and their
    /// distance is below the cutoff.
    pub fn is_bonded(&self, prev: &Residue, next: &Residue) -> bool {
        prev.atom_variants("C").any(|c| {
            next.atom_variants("N")
                .any(|n| altlocs_compatible(c, n) && c.coords.distance_to(&n.coords) < self.bond_cutoff)
        })
    }

    /// Split `chain` into segments, in chain order.
    ///
    /// Segments of a single residue are kept; callers that need interior
    /// residues filter by length.
    pub fn build<'a>(&self, chain: &'a Chain) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut current: Vec<&'a Residue> = Vec::new();

        for residue in &chain.residues {
            if !self.accepts(residue) {
                flush(chain.id, &mut current, &mut segments);
                continue;
            }
            if let Some(prev) = current.last() {
                if !self.is_bonded(prev, residue) {
                    flush(chain.id, &mut current, &mut segments);
                }
            }
            current.push(residue);
        }
        flush(chain.id, &mut current, &mut segments);
        segments
    }
}

fn altlocs_compatible(a: &Atom, b: &Atom) -> bool {
    match (a.alt_loc, b.alt_loc) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

fn flush<'a>(chain_id: char, current: &mut Vec<&'a Residue>, out: &mut Vec<Segment<'a>>) {
    if !current.is_empty() {
        out.push(Segment {
            chain_id,
            residues: std::mem::take(current),
        });
    }
}

/// A bond-continuous run of residues within one chain.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    chain_id: char,
    residues: Vec<&'a Residue>,
}

impl<'a> Segment<'a> {
    /// Identifier of the chain this segment came from.
    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    /// Residues in chain order.
    pub fn residues(&self) -> &[&'a Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// One-letter sequence, `X` for non-standard residues.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(|r| one_letter_code(&r.name)).collect()
    }

    /// Sequence numbers of the first and last residue.
    pub fn span(&self) -> Option<(i32, i32)> {
        Some((self.residues.first()?.seq_num, self.residues.last()?.seq_num))
    }
}
