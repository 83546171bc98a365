//! Core types for macromolecular 3D structure representation.
//!
//! The hierarchy mirrors the PDB file layout: a [`Structure`] holds one or
//! more [`Model`]s (NMR ensembles carry many), each model holds [`Chain`]s,
//! each chain holds [`Residue`]s, and each residue holds [`Atom`]s.

use phipsi_core::Summarizable;

/// A point in 3D Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        self.sub(other).norm()
    }

    /// Dot product.
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Vector magnitude.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero if magnitude is zero.
    pub fn normalize(&self) -> Point3D {
        let n = self.norm();
        if n < 1e-15 {
            Point3D::zero()
        } else {
            self.scale(1.0 / n)
        }
    }

    /// Vector addition.
    pub fn add(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Vector subtraction.
    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> Point3D {
        Point3D {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Whether all three components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A single atom in a macromolecular structure.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Atom {
    /// Atom serial number.
    pub serial: u32,
    /// Atom name as written in columns 13-16 (e.g. " CA ", " N  ").
    pub name: String,
    /// Alternate location indicator.
    pub alt_loc: Option<char>,
    /// 3D coordinates in Angstroms.
    pub coords: Point3D,
    /// Occupancy factor.
    pub occupancy: f64,
    /// Temperature factor (B-factor).
    pub temp_factor: f64,
    /// Element symbol.
    pub element: Option<String>,
    /// Formal charge.
    pub charge: Option<i8>,
    /// Whether this is a HETATM record.
    pub is_hetatm: bool,
}

impl Atom {
    /// Atom name with column padding removed.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

/// A residue (amino acid, nucleotide, ligand or water) in a chain.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Residue {
    /// Three-letter residue name (e.g. "ALA", "GLY").
    pub name: String,
    /// Sequence number from the PDB file.
    pub seq_num: i32,
    /// Insertion code.
    pub i_code: Option<char>,
    /// Atoms belonging to this residue, alternate locations included.
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// Get an atom by name.
    ///
    /// When several alternate locations share the name, the one with the
    /// highest occupancy wins; the first one listed wins a tie.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms
            .iter()
            .filter(|a| a.trimmed_name() == name)
            .fold(None, |best: Option<&Atom>, atom| match best {
                Some(b) if atom.occupancy <= b.occupancy => Some(b),
                _ => Some(atom),
            })
    }

    /// All alternate locations of the named atom, in file order.
    pub fn atom_variants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Atom> + 'a {
        self.atoms.iter().filter(move |a| a.trimmed_name() == name)
    }

    /// Coordinates of the named atom, if present.
    pub fn coords_of(&self, name: &str) -> Option<Point3D> {
        self.get_atom(name).map(|a| a.coords)
    }

    /// Whether every atom of this residue came from a HETATM record.
    pub fn is_hetero(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.iter().all(|a| a.is_hetatm)
    }
}

/// A polypeptide or polynucleotide chain within one model.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Chain {
    /// Single-character chain identifier.
    pub id: char,
    /// Residues in this chain, in file order.
    pub residues: Vec<Residue>,
}

impl Chain {
    /// Create a new chain.
    pub fn new(id: char, residues: Vec<Residue>) -> Self {
        Self { id, residues }
    }

    /// Number of residues.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Total number of atoms across all residues.
    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }
}

/// One conformation of the structure (a MODEL/ENDMDL block).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Model {
    /// Serial number from the MODEL record, or 1 for single-model files.
    pub serial: u32,
    /// Chains in this model, in order of first appearance.
    pub chains: Vec<Chain>,
}

impl Model {
    /// Create a new model.
    pub fn new(serial: u32, chains: Vec<Chain>) -> Self {
        Self { serial, chains }
    }

    /// Get a chain by its single-character ID.
    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Total residues across all chains.
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    /// Total atoms across all chains.
    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }
}

/// A complete macromolecular structure (one or more models).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Structure {
    /// PDB identifier or user-supplied name.
    pub id: String,
    /// Models in file order.
    pub models: Vec<Model>,
}

impl Structure {
    /// Number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// The first model, which is the only one for X-ray structures.
    pub fn first_model(&self) -> Option<&Model> {
        self.models.first()
    }

    /// Number of chains in the first model.
    pub fn chain_count(&self) -> usize {
        self.first_model().map_or(0, |m| m.chains.len())
    }

    /// Get a chain of the first model by its single-character ID.
    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.first_model().and_then(|m| m.get_chain(id))
    }

    /// Total residues across all models.
    pub fn residue_count(&self) -> usize {
        self.models.iter().map(|m| m.residue_count()).sum()
    }

    /// Total atoms across all models.
    pub fn atom_count(&self) -> usize {
        self.models.iter().map(|m| m.atom_count()).sum()
    }

    /// Apply `f` to the coordinates of every atom in place.
    pub fn map_coords(&mut self, mut f: impl FnMut(Point3D) -> Point3D) {
        for model in &mut self.models {
            for chain in &mut model.chains {
                for residue in &mut chain.residues {
                    for atom in &mut residue.atoms {
                        atom.coords = f(atom.coords);
                    }
                }
            }
        }
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        format!(
            "Structure {} — {} model(s), {} chain(s), {} residue(s), {} atom(s)",
            self.id,
            self.model_count(),
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_atom(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom {
            serial: 1,
            name: name.into(),
            alt_loc: None,
            coords: Point3D::new(x, y, z),
            occupancy: 1.0,
            temp_factor: 0.0,
            element: None,
            charge: None,
            is_hetatm: false,
        }
    }

    #[test]
    fn point3d_arithmetic() {
        let a = Point3D::new(1.0, 2.0, 3.0);
        let b = Point3D::new(4.0, 5.0, 6.0);
        assert_eq!(a.add(&b), Point3D::new(5.0, 7.0, 9.0));
        assert_eq!(a.sub(&b), Point3D::new(-3.0, -3.0, -3.0));
        assert!((a.dot(&b) - 32.0).abs() < 1e-10);
        assert!((a.scale(2.0).x - 2.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - (27.0_f64).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn point3d_cross_product() {
        let x = Point3D::new(1.0, 0.0, 0.0);
        let y = Point3D::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert!(z.x.abs() < 1e-10);
        assert!(z.y.abs() < 1e-10);
        assert!((z.z - 1.0).abs() < 1e-10);
    }

    #[test]
    fn point3d_normalize_zero() {
        assert_eq!(Point3D::zero().normalize(), Point3D::zero());
        let n = Point3D::new(3.0, 0.0, 4.0).normalize();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!(!Point3D::new(f64::NAN, 0.0, 0.0).is_finite());
    }

    #[test]
    fn get_atom_prefers_highest_occupancy() {
        let mut a = make_atom(" CA ", 1.0, 0.0, 0.0);
        a.alt_loc = Some('A');
        a.occupancy = 0.4;
        let mut b = make_atom(" CA ", 2.0, 0.0, 0.0);
        b.alt_loc = Some('B');
        b.occupancy = 0.6;
        let r = Residue {
            name: "SER".into(),
            seq_num: 7,
            i_code: None,
            atoms: vec![make_atom(" N  ", 0.0, 0.0, 0.0), a, b],
        };
        assert_eq!(r.get_atom("CA").unwrap().alt_loc, Some('B'));
        assert_eq!(r.atom_variants("CA").count(), 2);
        assert!(r.get_atom("CB").is_none());
    }

    #[test]
    fn get_atom_tie_keeps_first() {
        let mut a = make_atom(" CA ", 1.0, 0.0, 0.0);
        a.alt_loc = Some('A');
        a.occupancy = 0.5;
        let mut b = make_atom(" CA ", 2.0, 0.0, 0.0);
        b.alt_loc = Some('B');
        b.occupancy = 0.5;
        let r = Residue {
            name: "SER".into(),
            seq_num: 7,
            i_code: None,
            atoms: vec![a, b],
        };
        assert_eq!(r.coords_of("CA"), Some(Point3D::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn hetero_residue() {
        let mut w = make_atom(" O  ", 0.0, 0.0, 0.0);
        w.is_hetatm = true;
        let water = Residue {
            name: "HOH".into(),
            seq_num: 301,
            i_code: None,
            atoms: vec![w],
        };
        assert!(water.is_hetero());
    }

    #[test]
    fn structure_counts_and_summary() {
        let chain = Chain::new(
            'A',
            vec![Residue {
                name: "GLY".into(),
                seq_num: 1,
                i_code: None,
                atoms: vec![make_atom(" CA ", 1.0, 2.0, 3.0)],
            }],
        );
        let mut s = Structure {
            id: "1ABC".into(),
            models: vec![Model::new(1, vec![chain.clone()]), Model::new(2, vec![chain])],
        };
        assert_eq!(s.model_count(), 2);
        assert_eq!(s.chain_count(), 1);
        assert_eq!(s.residue_count(), 2);
        assert_eq!(s.atom_count(), 2);
        assert!(s.get_chain('A').is_some());
        let summary = s.summary();
        assert!(summary.contains("1ABC"));
        assert!(summary.contains("2 model"));

        s.map_coords(|p| p.add(&Point3D::new(1.0, 1.0, 1.0)));
        let moved = s.models[1].chains[0].residues[0].coords_of("CA").unwrap();
        assert_eq!(moved, Point3D::new(2.0, 3.0, 4.0));
    }
}
