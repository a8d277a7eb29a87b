use crate::annotate::AnnotationError;

///One observed signal from a scan, as decoded from the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

///An observed peak rescaled to percent of the most intense peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPeak {
    pub mz: f64,
    pub relative_intensity: f64,
}

/**Rescale intensities to relative abundance in [0, 100], rounded to
three decimals. Order and length are preserved; the most intense peak
maps to exactly 100.0. A scan whose intensities are all zero has no
usable maximum and is rejected rather than normalized to NaN.
*/
pub fn normalize(peaks: &[Peak]) -> Result<Vec<NormalizedPeak>, AnnotationError> {
    if peaks.is_empty() {
        return Err(AnnotationError::EmptyPeakList);
    }
    let max = peaks
        .iter()
        .map(|p| p.intensity)
        .fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return Err(AnnotationError::ZeroIntensities);
    }
    Ok(peaks
        .iter()
        .map(|p| NormalizedPeak {
            mz: p.mz,
            relative_intensity: round3(p.intensity / max * 100.0),
        })
        .collect())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
