//! Up-front feasibility check.
//!
//! Catches designs that cannot fit the device before any placement work is
//! done. Passing is necessary, not sufficient, for a routable placement.

use super::PlacementEngine;
use crate::error::PlacementError;
use matepar_graph::{Label, LabelNames};
use std::collections::BTreeSet;

impl<N, D> PlacementEngine<'_, N, D> {
    /// Checks label ranges and per-label capacity.
    ///
    /// Every netlist node is grouped by the set of labels it can occupy. For
    /// each such group, the netlist nodes confined to it must not outnumber the
    /// device sites whose label belongs to it. For a node without alternate
    /// labels this is the plain per-label count comparison.
    pub(super) fn sanity_check(&self, labels: &LabelNames) -> Result<(), PlacementError> {
        let device_labels = self.device.label_count();
        for (_, node) in self.netlist.iter() {
            if let Some(label) = node
                .candidate_labels()
                .find(|label| label.as_raw() >= device_labels)
            {
                return Err(PlacementError::LabelOutOfRange {
                    label,
                    device_labels,
                });
            }
        }

        let supply = self.device.count_labels();
        let groups: BTreeSet<Vec<Label>> = self
            .netlist
            .iter()
            .map(|(_, node)| {
                let mut group: Vec<Label> = node.candidate_labels().collect();
                group.sort();
                group.dedup();
                group
            })
            .collect();

        for group in &groups {
            let required = self
                .netlist
                .iter()
                .filter(|(_, node)| {
                    node.candidate_labels()
                        .all(|l| group.binary_search(&l).is_ok())
                })
                .count();
            let available: usize = group.iter().map(|l| supply[l.index()] as usize).sum();

            if required > available {
                return Err(PlacementError::DesignTooBig {
                    labels: describe_group(group, labels),
                    required,
                    available,
                });
            }
        }

        Ok(())
    }
}

fn describe_group(group: &[Label], labels: &LabelNames) -> String {
    group
        .iter()
        .map(|&l| labels.describe(l))
        .collect::<Vec<_>>()
        .join(" or ")
}
