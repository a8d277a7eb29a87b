use crate::annotate::AnnotationError;

/**Monoisotopic residue mass for one of the 20 standard amino acids.
Returns None for any other character; callers decide how loudly to fail.
*/
pub fn residue_mass(residue: char) -> Option<f64> {
    match residue {
        'A' => Some(71.04),
        'C' => Some(103.01),
        'D' => Some(115.03),
        'E' => Some(129.04),
        'F' => Some(147.07),
        'G' => Some(57.02),
        'H' => Some(137.06),
        'I' => Some(113.08),
        'K' => Some(128.09),
        'L' => Some(113.08),
        'M' => Some(131.04),
        'N' => Some(114.04),
        'P' => Some(97.05),
        'Q' => Some(128.06),
        'R' => Some(156.10),
        'S' => Some(87.03),
        'T' => Some(101.05),
        'V' => Some(99.07),
        'W' => Some(186.08),
        'Y' => Some(163.06),
        _ => None,
    }
}

///A non-empty peptide sequence, uppercased at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peptide(String);

impl Peptide {
    pub fn new(sequence: &str) -> Result<Self, AnnotationError> {
        let sequence = sequence.trim().to_uppercase();
        if sequence.is_empty() {
            return Err(AnnotationError::EmptyPeptide);
        }
        Ok(Peptide(sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn residues(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.0.chars()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for Peptide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
