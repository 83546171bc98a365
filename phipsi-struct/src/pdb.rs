//! PDB format parser.
//!
//! Parses ATOM, HETATM, TER, HEADER, MODEL/ENDMDL and END records from
//! PDB-format text. Every MODEL block becomes one [`Model`]; files without
//! MODEL records yield a single model with serial 1.
//!
//! Within a model, records for a chain identifier that was already seen are
//! appended to that chain, so ligands and waters listed after the TER record
//! stay with their polymer chain.

use phipsi_core::{PhipsiError, Result};

use crate::types::{Atom, Chain, Model, Point3D, Residue, Structure};

/// Residue identity within a chain: sequence number, insertion code, name.
type ResidueKey = (i32, Option<char>, String);

/// Parse a PDB-format string into a [`Structure`].
///
/// # Errors
///
/// Returns an error if no ATOM/HETATM records are found or if a coordinate
/// record is malformed (too short, unparseable serial, residue number or
/// coordinates).
pub fn parse_pdb(input: &str) -> Result<Structure> {
    let mut id = String::from("UNKN");
    let mut models: Vec<Model> = Vec::new();
    let mut builder = ModelBuilder::new(1);
    let mut atom_count = 0usize;

    for (line_no, line) in input.lines().enumerate() {
        if line.starts_with("HEADER") && line.len() >= 66 {
            let pdb_id = safe_slice(line, 62, 66).trim();
            if !pdb_id.is_empty() {
                id = pdb_id.into();
            }
        } else if line.starts_with("MODEL") {
            let serial = line
                .get(5..)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(models.len() as u32 + 1);
            // A MODEL without a preceding ENDMDL still closes the open model.
            let previous = std::mem::replace(&mut builder, ModelBuilder::new(serial));
            if let Some(model) = previous.finish() {
                models.push(model);
            }
        } else if line.starts_with("ENDMDL") {
            let next_serial = builder.serial + 1;
            let previous = std::mem::replace(&mut builder, ModelBuilder::new(next_serial));
            if let Some(model) = previous.finish() {
                models.push(model);
            }
        } else if line.starts_with("ATOM  ") || line.starts_with("HETATM") {
            let is_hetatm = line.starts_with("HETATM");
            let atom = parse_atom_record(line, is_hetatm)
                .map_err(|e| annotate_line(e, line_no + 1))?;
            let seq_num =
                parse_residue_seq(line).map_err(|e| annotate_line(e, line_no + 1))?;
            let key = (seq_num, parse_insertion_code(line), parse_residue_name(line));
            builder.push_atom(parse_chain_id(line), key, atom);
            atom_count += 1;
        } else if line.starts_with("TER") {
            builder.flush_chain();
        } else if line.starts_with("END") {
            break;
        }
    }

    if let Some(model) = builder.finish() {
        models.push(model);
    }

    if atom_count == 0 {
        return Err(PhipsiError::Parse("no ATOM records found".into()));
    }

    Ok(Structure { id, models })
}

/// Accumulates residues and chains for one MODEL block.
struct ModelBuilder {
    serial: u32,
    chains: Vec<Chain>,
    chain_id: Option<char>,
    residue_key: Option<ResidueKey>,
    residues: Vec<Residue>,
    atoms: Vec<Atom>,
}

impl ModelBuilder {
    fn new(serial: u32) -> Self {
        Self {
            serial,
            chains: Vec::new(),
            chain_id: None,
            residue_key: None,
            residues: Vec::new(),
            atoms: Vec::new(),
        }
    }

    fn push_atom(&mut self, chain_id: char, key: ResidueKey, atom: Atom) {
        if self.chain_id != Some(chain_id) {
            self.flush_chain();
            self.chain_id = Some(chain_id);
        }
        if self.residue_key.as_ref() != Some(&key) {
            self.flush_residue();
            self.residue_key = Some(key);
        }
        self.atoms.push(atom);
    }

    fn flush_residue(&mut self) {
        if let Some((seq_num, i_code, name)) = self.residue_key.take() {
            if !self.atoms.is_empty() {
                self.residues.push(Residue {
                    name,
                    seq_num,
                    i_code,
                    atoms: std::mem::take(&mut self.atoms),
                });
            }
        }
    }

    fn flush_chain(&mut self) {
        self.flush_residue();
        let Some(id) = self.chain_id.take() else {
            return;
        };
        if self.residues.is_empty() {
            return;
        }
        let residues = std::mem::take(&mut self.residues);
        match self.chains.iter_mut().find(|c| c.id == id) {
            Some(chain) => chain.residues.extend(residues),
            None => self.chains.push(Chain::new(id, residues)),
        }
    }

    fn finish(mut self) -> Option<Model> {
        self.flush_chain();
        if self.chains.is_empty() {
            None
        } else {
            Some(Model::new(self.serial, self.chains))
        }
    }
}

fn annotate_line(err: PhipsiError, line_no: usize) -> PhipsiError {
    match err {
        PhipsiError::Parse(msg) => PhipsiError::Parse(format!("line {}: {}", line_no, msg)),
        other => other,
    }
}

fn parse_atom_record(line: &str, is_hetatm: bool) -> Result<Atom> {
    // Fixed-width columns; coordinates end at column 54.
    if line.len() < 54 {
        return Err(PhipsiError::Parse(format!(
            "ATOM record too short ({} chars)",
            line.len()
        )));
    }

    // Overflowed (`*****`) and hybrid-36 serials read as 0.
    let serial = safe_slice(line, 6, 11).trim().parse::<u32>().unwrap_or(0);

    let name = safe_slice(line, 12, 16).to_string();

    let alt_loc = match safe_slice(line, 16, 17).chars().next() {
        Some(' ') | None => None,
        Some(c) => Some(c),
    };

    let coord = |start: usize, end: usize, axis: &str| {
        safe_slice(line, start, end)
            .trim()
            .parse::<f64>()
            .map_err(|e| PhipsiError::Parse(format!("bad {} coordinate: {}", axis, e)))
    };
    let x = coord(30, 38, "x")?;
    let y = coord(38, 46, "y")?;
    let z = coord(46, 54, "z")?;

    let occupancy = safe_slice(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0);
    let temp_factor = safe_slice(line, 60, 66).trim().parse::<f64>().unwrap_or(0.0);

    let element = match safe_slice(line, 76, 78).trim() {
        "" => None,
        e => Some(e.to_string()),
    };
    let charge = parse_pdb_charge(safe_slice(line, 78, 80));

    Ok(Atom {
        serial,
        name,
        alt_loc,
        coords: Point3D::new(x, y, z),
        occupancy,
        temp_factor,
        element,
        charge,
        is_hetatm,
    })
}

fn parse_chain_id(line: &str) -> char {
    safe_slice(line, 21, 22).chars().next().unwrap_or(' ')
}

fn parse_residue_seq(line: &str) -> Result<i32> {
    safe_slice(line, 22, 26)
        .trim()
        .parse::<i32>()
        .map_err(|e| PhipsiError::Parse(format!("bad residue seq number: {}", e)))
}

fn parse_insertion_code(line: &str) -> Option<char> {
    match safe_slice(line, 26, 27).chars().next() {
        Some(' ') | None => None,
        Some(c) => Some(c),
    }
}

fn parse_residue_name(line: &str) -> String {
    safe_slice(line, 17, 20).trim().to_string()
}

/// Charges are written "2+" / "1-"; the reversed "+2" form also shows up.
fn parse_pdb_charge(s: &str) -> Option<i8> {
    let bytes = s.trim().as_bytes();
    let (digit, sign) = match bytes {
        [d, sg @ (b'+' | b'-')] if d.is_ascii_digit() => (*d, *sg),
        [sg @ (b'+' | b'-'), d] if d.is_ascii_digit() => (*d, *sg),
        _ => return None,
    };
    let magnitude = (digit - b'0') as i8;
    Some(if sign == b'+' { magnitude } else { -magnitude })
}

/// Substring that tolerates short lines and non-ASCII garbage.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let end = end.min(s.len());
    if start >= end {
        return "";
    }
    s.get(start..end).unwrap_or("")
}
