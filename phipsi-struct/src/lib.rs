//! Protein 3D structures and backbone dihedrals for the phipsi workspace.
//!
//! - **PDB parsing** — Read macromolecular structure files with [`pdb::parse_pdb`]
//! - **Coordinate geometry** — Distance, angle, dihedral in [`geometry`]
//! - **Residues** — The twenty standard amino acids in [`residue`]
//! - **Polypeptides** — Bond-continuous segments in [`peptide`]
//! - **Dihedrals** — Phi/psi extraction in [`dihedral`]
//!
//! # Quick start
//!
//! ```
//! use phipsi_struct::{parse_pdb, phi_psi_angles};
//! use phipsi_core::Summarizable;
//!
//! let pdb_text = "\
//! HEADER                                                        1TST
//! ATOM      1  N   ALA A   1       1.000   2.000   3.000  1.00  0.00           N
//! ATOM      2  CA  ALA A   1       2.000   2.000   3.000  1.00  0.00           C
//! ATOM      3  C   ALA A   1       3.000   2.000   3.000  1.00  0.00           C
//! ATOM      4  O   ALA A   1       3.000   3.000   3.000  1.00  0.00           O
//! TER
//! END
//! ";
//!
//! let structure = parse_pdb(pdb_text).unwrap();
//! assert_eq!(structure.chain_count(), 1);
//! assert!(structure.summary().contains("1TST"));
//!
//! // A single residue has no interior positions.
//! assert!(phi_psi_angles(&structure).is_empty());
//! ```

pub mod dihedral;
pub mod geometry;
pub mod pdb;
pub mod peptide;
pub mod residue;
pub mod types;

pub use dihedral::{phi_psi_angles, AngleDataset, AnglePair, DihedralExtractor};
pub use geometry::{angular_difference, dihedral_points, normalize_degrees};
pub use pdb::parse_pdb;
pub use peptide::{PolypeptideBuilder, Segment, DEFAULT_PEPTIDE_BOND_CUTOFF};
pub use residue::AminoAcid;
pub use types::{Atom, Chain, Model, Point3D, Residue, Structure};
