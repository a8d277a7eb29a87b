use crate::annotate::AnnotationError;
use crate::residue::{residue_mass, Peptide};
use std::fmt;

///Mass added to a b-ion prefix sum: the charging proton.
pub const B_ION_ADJUSTMENT: f64 = 1.0;
///Mass added to a y-ion suffix sum: the C-terminal water plus the proton.
pub const Y_ION_ADJUSTMENT: f64 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IonSeries {
    B,
    Y,
}

impl IonSeries {
    fn adjustment(self) -> f64 {
        match self {
            IonSeries::B => B_ION_ADJUSTMENT,
            IonSeries::Y => Y_ION_ADJUSTMENT,
        }
    }
}

impl fmt::Display for IonSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonSeries::B => f.write_str("b"),
            IonSeries::Y => f.write_str("y"),
        }
    }
}

/**Identifier of one theoretical fragment, e.g. b3 or y1.
Field order gives the derived Ord: all b-ions sort before all y-ions,
then by fragment index, which fixes the label enumeration order.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IonId {
    pub series: IonSeries,
    pub index: usize,
}

impl fmt::Display for IonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.series, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheoreticalIon {
    pub id: IonId,
    pub mz: f64,
}

/**Compute the full b- and y-ion series for a peptide.
Returns the b-ions (N-terminal prefixes) followed by the y-ions
(prefixes of the reversed sequence), indices 1..=N in each series.
An unknown residue fails the whole calculation; no partial table.
*/
pub fn fragment_ions(peptide: &Peptide) -> Result<Vec<TheoreticalIon>, AnnotationError> {
    let mut ions = Vec::with_capacity(peptide.len() * 2);
    ion_series(peptide, IonSeries::B, &mut ions)?;
    ion_series(peptide, IonSeries::Y, &mut ions)?;
    Ok(ions)
}

fn ion_series(
    peptide: &Peptide,
    series: IonSeries,
    ions: &mut Vec<TheoreticalIon>,
) -> Result<(), AnnotationError> {
    let residues: Vec<char> = match series {
        IonSeries::B => peptide.residues().collect(),
        IonSeries::Y => peptide.residues().rev().collect(),
    };
    let mut running = 0.0;
    for (i, residue) in residues.into_iter().enumerate() {
        running += residue_mass(residue).ok_or_else(|| AnnotationError::UnknownResidue {
            peptide: peptide.as_str().to_string(),
            residue,
        })?;
        ions.push(TheoreticalIon {
            id: IonId {
                series,
                index: i + 1,
            },
            mz: running + series.adjustment(),
        });
    }
    Ok(())
}
