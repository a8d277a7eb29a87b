use crate::fragment::fragment_ions;
use crate::layout::{plan_labels, LabelPlacement};
use crate::matching::match_ions;
use crate::peaks::{normalize, NormalizedPeak, Peak};
use crate::residue::Peptide;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("unknown residue '{residue}' in peptide {peptide}")]
    UnknownResidue { peptide: String, residue: char },
    #[error("peptide sequence is empty")]
    EmptyPeptide,
    #[error("scan contains no peaks to normalize")]
    EmptyPeakList,
    #[error("scan intensities are all zero, nothing to normalize against")]
    ZeroIntensities,
}

///Everything the renderer needs for one annotated spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    ///All normalized peaks, for the full stem plot.
    pub peaks: Vec<NormalizedPeak>,
    ///Label placements for the matched ions, in ascending ion-id order.
    pub labels: Vec<LabelPlacement>,
}

/**Annotate one scan: compute the b/y ion table for the peptide,
normalize the observed peaks, match within the tolerance window and
plan the label stack. The first failing stage aborts the pipeline.
*/
pub fn annotate(
    peptide: &Peptide,
    observed: &[Peak],
    tolerance: f64,
) -> Result<Annotation, AnnotationError> {
    let ions = fragment_ions(peptide)?;
    let peaks = normalize(observed)?;
    let matches = match_ions(&ions, &peaks, tolerance);
    let labels = plan_labels(&matches);
    Ok(Annotation { peaks, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{IonId, IonSeries};
    use crate::matching::DEFAULT_TOLERANCE;

    #[test]
    fn ag_end_to_end() {
        let peptide = Peptide::new("AG").unwrap();
        let observed = [
            Peak {
                mz: 72.1,
                intensity: 50.0,
            },
            Peak {
                mz: 147.0,
                intensity: 100.0,
            },
        ];
        let annotation = annotate(&peptide, &observed, DEFAULT_TOLERANCE).unwrap();

        assert_eq!(annotation.peaks.len(), 2);
        assert_eq!(annotation.peaks[0].relative_intensity, 50.0);
        assert_eq!(annotation.peaks[1].relative_intensity, 100.0);

        assert_eq!(annotation.labels.len(), 2);
        let b1 = &annotation.labels[0];
        assert_eq!(
            b1.ion,
            IonId {
                series: IonSeries::B,
                index: 1
            }
        );
        assert_eq!(b1.mz, 72.1);
        assert_eq!(b1.relative_intensity, 50.0);
        let y2 = &annotation.labels[1];
        assert_eq!(
            y2.ion,
            IonId {
                series: IonSeries::Y,
                index: 2
            }
        );
        assert_eq!(y2.mz, 147.0);
        assert_eq!(y2.relative_intensity, 100.0);
    }

    #[test]
    fn zero_matches_still_yields_the_peak_list() {
        let peptide = Peptide::new("AG").unwrap();
        let observed = [Peak {
            mz: 500.0,
            intensity: 10.0,
        }];
        let annotation = annotate(&peptide, &observed, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(annotation.peaks.len(), 1);
        assert_eq!(annotation.peaks[0].relative_intensity, 100.0);
        assert!(annotation.labels.is_empty());
    }

    #[test]
    fn unknown_residue_aborts_the_pipeline() {
        let peptide = Peptide::new("AX1").unwrap();
        let observed = [Peak {
            mz: 72.1,
            intensity: 50.0,
        }];
        assert!(matches!(
            annotate(&peptide, &observed, DEFAULT_TOLERANCE),
            Err(AnnotationError::UnknownResidue { .. })
        ));
    }

    #[test]
    fn empty_scan_aborts_the_pipeline() {
        let peptide = Peptide::new("AG").unwrap();
        assert!(matches!(
            annotate(&peptide, &[], DEFAULT_TOLERANCE),
            Err(AnnotationError::EmptyPeakList)
        ));
    }
}
