//! The twenty standard amino acids and their residue codes.

/// A standard (proteinogenic) amino acid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
}

impl AminoAcid {
    /// All twenty standard amino acids in alphabetical order of their codes.
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Ala,
        AminoAcid::Arg,
        AminoAcid::Asn,
        AminoAcid::Asp,
        AminoAcid::Cys,
        AminoAcid::Gln,
        AminoAcid::Glu,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Pro,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Tyr,
        AminoAcid::Val,
    ];

    /// Look up a residue by its three-letter code (case-insensitive,
    /// surrounding whitespace ignored).
    ///
    /// Only the twenty standard codes match; modified residues such as MSE
    /// or SEP return `None`.
    pub fn from_three_letter(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() != 3 {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|aa| aa.three_letter().eq_ignore_ascii_case(code))
    }

    /// Upper-case three-letter code.
    pub fn three_letter(&self) -> &'static str {
        match self {
            Self::Ala => "ALA",
            Self::Arg => "ARG",
            Self::Asn => "ASN",
            Self::Asp => "ASP",
            Self::Cys => "CYS",
            Self::Gln => "GLN",
            Self::Glu => "GLU",
            Self::Gly => "GLY",
            Self::His => "HIS",
            Self::Ile => "ILE",
            Self::Leu => "LEU",
            Self::Lys => "LYS",
            Self::Met => "MET",
            Self::Phe => "PHE",
            Self::Pro => "PRO",
            Self::Ser => "SER",
            Self::Thr => "THR",
            Self::Trp => "TRP",
            Self::Tyr => "TYR",
            Self::Val => "VAL",
        }
    }

    /// One-letter code.
    pub fn one_letter(&self) -> char {
        match self {
            Self::Ala => 'A',
            Self::Arg => 'R',
            Self::Asn => 'N',
            Self::Asp => 'D',
            Self::Cys => 'C',
            Self::Gln => 'Q',
            Self::Glu => 'E',
            Self::Gly => 'G',
            Self::His => 'H',
            Self::Ile => 'I',
            Self::Leu => 'L',
            Self::Lys => 'K',
            Self::Met => 'M',
            Self::Phe => 'F',
            Self::Pro => 'P',
            Self::Ser => 'S',
            Self::Thr => 'T',
            Self::Trp => 'W',
            Self::Tyr => 'Y',
            Self::Val => 'V',
        }
    }
}

/// Whether `name` is the three-letter code of a standard amino acid.
pub fn is_standard_amino_acid(name: &str) -> bool {
    AminoAcid::from_three_letter(name).is_some()
}

/// One-letter code for a residue name; `'X'` for anything non-standard.
pub fn one_letter_code(name: &str) -> char {
    AminoAcid::from_three_letter(name).map_or('X', |aa| aa.one_letter())
}
