//! The route resolver: time simulation over the graph.
//!
//! For every node that owns outgoing edges, the resolver partitions
//! those edges into priority groups, walks the groups in ascending
//! rank order, and activates the first group whose schedule is
//! satisfied at the simulated instant. Everything else incident from
//! the node goes inactive. This mirrors how the PBX itself picks a
//! routing tier at call time.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use tracing::trace;

use crate::model::{Edge, RouteGraph};

/// Priority rank of an edge group. The absent-priority sentinel sorts
/// after every numeric rank and forms a single group of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Numbered(i64),
    Unranked,
}

impl From<Option<i64>> for Rank {
    fn from(priority: Option<i64>) -> Self {
        match priority {
            Some(value) => Rank::Numbered(value),
            None => Rank::Unranked,
        }
    }
}

/// Whether an edge's schedule permits the instant. An empty schedule
/// is unconditional.
fn edge_satisfied(edge: &Edge, instant: NaiveDateTime) -> bool {
    edge.schedule.is_empty() || edge.schedule.iter().any(|rule| rule.matches(instant))
}

impl RouteGraph {
    /// Resolves the live route at a simulated instant.
    ///
    /// Writes `active_for_instant` on every edge and returns the same
    /// classification as an edge-id map. The pass is total and
    /// idempotent: every flag is overwritten on every run, so no state
    /// from a previous instant survives. A node whose groups all fail
    /// ends up with every outgoing edge inactive, which is a valid
    /// "no live route at this instant" outcome.
    pub fn resolve(&mut self, instant: NaiveDateTime) -> HashMap<String, bool> {
        let mut decisions: Vec<(usize, bool)> = Vec::with_capacity(self.edges.len());

        for node in &self.nodes {
            let Some(outgoing) = self.outgoing.get(&node.id) else {
                continue;
            };

            let mut groups: BTreeMap<Rank, Vec<usize>> = BTreeMap::new();
            for &index in outgoing {
                groups
                    .entry(Rank::from(self.edges[index].priority))
                    .or_default()
                    .push(index);
            }

            // First satisfied group in ascending rank order wins. A
            // group is satisfied when any of its edges permits the
            // instant.
            let mut active: HashSet<usize> = HashSet::new();
            for (rank, members) in &groups {
                if members
                    .iter()
                    .any(|&index| edge_satisfied(&self.edges[index], instant))
                {
                    trace!(node = %node.id, ?rank, "active priority group");
                    active.extend(members.iter().copied());
                    break;
                }
            }

            for &index in outgoing {
                decisions.push((index, active.contains(&index)));
            }
        }

        let mut classification = HashMap::with_capacity(self.edges.len());
        for (index, is_active) in decisions {
            self.edges[index].active_for_instant = Some(is_active);
            classification.insert(self.edges[index].id.clone(), is_active);
        }
        classification
    }

    /// Clears the time simulation, returning every edge to the
    /// undistinguished state where no inactivity flag is set.
    pub fn clear_simulation(&mut self) {
        for edge in &mut self.edges {
            edge.active_for_instant = None;
        }
    }
}
