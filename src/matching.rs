use crate::fragment::{IonId, TheoreticalIon};
use crate::peaks::NormalizedPeak;
use std::collections::BTreeMap;

///Default half-width of the symmetric match window, in m/z units.
pub const DEFAULT_TOLERANCE: f64 = 0.3;

///The peak a theoretical ion was matched to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPeak {
    pub mz: f64,
    pub relative_intensity: f64,
}

pub type MatchedIons = BTreeMap<IonId, MatchedPeak>;

/**Match theoretical ions against observed peaks within the tolerance
window (inclusive on both bounds).

One peak may satisfy several ions, but each ion keeps at most one peak:
when several peaks fall inside an ion's window, the last one in peak
order wins, not the closest. An empty result just means nothing matched.
*/
pub fn match_ions(
    ions: &[TheoreticalIon],
    peaks: &[NormalizedPeak],
    tolerance: f64,
) -> MatchedIons {
    let mut matches = MatchedIons::new();
    for peak in peaks {
        for ion in ions {
            if (peak.mz - ion.mz).abs() <= tolerance {
                matches.insert(
                    ion.id,
                    MatchedPeak {
                        mz: peak.mz,
                        relative_intensity: peak.relative_intensity,
                    },
                );
            }
        }
    }
    matches
}
