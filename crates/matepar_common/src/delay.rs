//! Combinatorial path delays and per-corner delay tables.

use crate::corner::PtvCorner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, SubAssign};

/// Delay down a combinatorial path, in nanoseconds, at some externally
/// specified [`PtvCorner`].
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CombinatorialDelay {
    /// Delay for a rising output edge.
    pub rising: f32,
    /// Delay for a falling output edge.
    pub falling: f32,
}

impl CombinatorialDelay {
    /// Creates a delay from rising and falling edge values.
    pub fn new(rising: f32, falling: f32) -> Self {
        Self { rising, falling }
    }

    /// Returns the worst-case delay regardless of edge direction.
    pub fn worst(&self) -> f32 {
        self.rising.max(self.falling)
    }
}

impl Add for CombinatorialDelay {
    type Output = CombinatorialDelay;

    fn add(self, rhs: CombinatorialDelay) -> CombinatorialDelay {
        CombinatorialDelay::new(self.rising + rhs.rising, self.falling + rhs.falling)
    }
}

impl AddAssign for CombinatorialDelay {
    fn add_assign(&mut self, rhs: CombinatorialDelay) {
        self.rising += rhs.rising;
        self.falling += rhs.falling;
    }
}

impl SubAssign for CombinatorialDelay {
    fn sub_assign(&mut self, rhs: CombinatorialDelay) {
        self.rising -= rhs.rising;
        self.falling -= rhs.falling;
    }
}

/// One row of a [`DelayTable`]: a delay and the corner it was measured at.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DelayEntry {
    /// Operating point of the measurement.
    pub corner: PtvCorner,
    /// The measured delay.
    #[serde(flatten)]
    pub delay: CombinatorialDelay,
}

/// Characterization data for one path of a primitive, keyed by corner.
///
/// Serialized as a list of [`DelayEntry`] rows in corner order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DelayEntry>", into = "Vec<DelayEntry>")]
pub struct DelayTable {
    entries: BTreeMap<PtvCorner, CombinatorialDelay>,
}

impl From<Vec<DelayEntry>> for DelayTable {
    fn from(rows: Vec<DelayEntry>) -> Self {
        let mut table = DelayTable::new();
        for row in rows {
            table.insert(row.corner, row.delay);
        }
        table
    }
}

impl From<DelayTable> for Vec<DelayEntry> {
    fn from(table: DelayTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(corner, delay)| DelayEntry { corner, delay })
            .collect()
    }
}

impl DelayTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the delay measured at `corner`, replacing any previous value.
    pub fn insert(&mut self, corner: PtvCorner, delay: CombinatorialDelay) {
        self.entries.insert(corner, delay);
    }

    /// Returns the delay measured at `corner`, if characterized.
    pub fn get(&self, corner: &PtvCorner) -> Option<CombinatorialDelay> {
        self.entries.get(corner).copied()
    }

    /// Returns the largest worst-case delay across every characterized corner.
    pub fn worst_case(&self) -> Option<f32> {
        self.entries
            .values()
            .map(CombinatorialDelay::worst)
            .reduce(f32::max)
    }

    /// Iterates over all entries in corner order.
    pub fn iter(&self) -> impl Iterator<Item = (&PtvCorner, &CombinatorialDelay)> {
        self.entries.iter()
    }

    /// Returns the number of characterized corners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no corner has been characterized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corner::ProcessSpeed;

    #[test]
    fn worst_picks_larger_edge() {
        assert_eq!(CombinatorialDelay::new(1.5, 2.0).worst(), 2.0);
        assert_eq!(CombinatorialDelay::new(3.0, 2.0).worst(), 3.0);
    }

    #[test]
    fn arithmetic() {
        let a = CombinatorialDelay::new(1.0, 2.0);
        let b = CombinatorialDelay::new(0.5, 0.25);
        assert_eq!(a + b, CombinatorialDelay::new(1.5, 2.25));

        let mut c = a;
        c += b;
        assert_eq!(c, CombinatorialDelay::new(1.5, 2.25));
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(CombinatorialDelay::default(), CombinatorialDelay::new(0.0, 0.0));
    }

    #[test]
    fn table_lookup_and_worst_case() {
        let typ = PtvCorner::new(ProcessSpeed::Typical, 25, 3300);
        let slow = PtvCorner::new(ProcessSpeed::Slow, 85, 3000);

        let mut table = DelayTable::new();
        assert!(table.is_empty());
        assert_eq!(table.worst_case(), None);

        table.insert(typ, CombinatorialDelay::new(4.0, 4.5));
        table.insert(slow, CombinatorialDelay::new(6.0, 5.5));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&typ), Some(CombinatorialDelay::new(4.0, 4.5)));
        assert_eq!(table.worst_case(), Some(6.0));

        let corners: Vec<_> = table.iter().map(|(c, _)| *c).collect();
        assert_eq!(corners, vec![slow, typ]);
    }

    #[test]
    fn table_reads_rows_from_json() {
        let json = r#"[
            {"corner": {"speed": "typical", "die_temp": 25, "voltage": 3300}, "rising": 4.0, "falling": 4.5},
            {"corner": {"speed": "slow", "die_temp": 85, "voltage": 3000}, "rising": 6.0, "falling": 5.5}
        ]"#;
        let table: DelayTable = serde_json::from_str(json).unwrap();
        let slow = PtvCorner::new(ProcessSpeed::Slow, 85, 3000);
        assert_eq!(table.get(&slow), Some(CombinatorialDelay::new(6.0, 5.5)));

        let rows: Vec<DelayEntry> = table.into();
        assert_eq!(rows[0].corner, slow);
    }
}
