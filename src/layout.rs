use crate::fragment::{IonId, IonSeries};
use crate::matching::MatchedIons;
use std::collections::HashMap;

///Visual discriminator for the two ion series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelColor {
    Blue,
    Red,
}

impl From<IonSeries> for LabelColor {
    fn from(series: IonSeries) -> Self {
        match series {
            IonSeries::B => LabelColor::Blue,
            IonSeries::Y => LabelColor::Red,
        }
    }
}

///One ion label, placed at its peak plus a stacking offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub ion: IonId,
    pub mz: f64,
    pub relative_intensity: f64,
    pub offset: f64,
    pub color: LabelColor,
}

/**Plan one label per matched ion, in ascending ion-id order.
Labels landing on the same matched m/z stack upward: the k-th collision
at an m/z gets offset 0, 2.5, 4.5, 6.5, ... above the peak baseline.
*/
pub fn plan_labels(matches: &MatchedIons) -> Vec<LabelPlacement> {
    let mut placed_at: HashMap<u64, u32> = HashMap::new();
    matches
        .iter()
        .map(|(id, matched)| {
            let count = placed_at.entry(matched.mz.to_bits()).or_insert(0);
            let offset = if *count == 0 {
                0.0
            } else {
                2.5 + (*count as f64 - 1.0) * 2.0
            };
            *count += 1;
            LabelPlacement {
                ion: *id,
                mz: matched.mz,
                relative_intensity: matched.relative_intensity,
                offset,
                color: id.series.into(),
            }
        })
        .collect()
}
