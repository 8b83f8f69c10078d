//! The reachability filter: isolating call paths from selected entry
//! points.
//!
//! Given a set of selected root node ids, the filter computes the
//! forward transitive closure along `source -> target` edges and
//! classifies every element as visible or not. Reachability is a
//! structural query: it deliberately ignores `active_for_instant`, so
//! an operator can trace where a call *could* go regardless of the
//! simulated clock.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::model::RouteGraph;

/// Result of a reachability pass: the visible element ids plus display
/// bookkeeping for the host UI.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    /// Ids of visible nodes.
    pub nodes: HashSet<String>,
    /// Ids of visible edges.
    pub edges: HashSet<String>,
    /// Size of the selection as given, including stale ids. Shown as
    /// the filter badge count.
    pub root_count: usize,
}

impl VisibleSet {
    /// Whether nothing at all is visible.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The focus region the presentation layer should re-center on:
    /// every visible element id, or `None` when the set is empty.
    pub fn focus(&self) -> Option<Vec<&str>> {
        if self.is_empty() {
            return None;
        }
        Some(
            self.nodes
                .iter()
                .chain(self.edges.iter())
                .map(String::as_str)
                .collect(),
        )
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }
}

impl RouteGraph {
    /// Classifies every element as visible or hidden based on forward
    /// reachability from the selected roots.
    ///
    /// Three regimes, checked in order:
    ///
    /// 1. the selection covers every eligible (ingress) root: all
    ///    elements are visible and no traversal runs;
    /// 2. the selection is empty: nothing is visible;
    /// 3. otherwise a breadth-first walk from each selected root that
    ///    exists in the graph. Stale ids are skipped, and visited-set
    ///    bookkeeping keeps the walk terminating on cyclic graphs.
    ///
    /// Writes the `visible` flag on every node and edge and returns
    /// the visible set. The flag field is disjoint from the resolver's
    /// `active_for_instant`, so the two passes commute.
    pub fn compute_visible<I, S>(&mut self, selected_roots: I) -> VisibleSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: HashSet<String> = selected_roots.into_iter().map(Into::into).collect();

        let all_selected = self
            .nodes
            .iter()
            .filter(|node| node.is_ingress())
            .all(|node| selected.contains(&node.id));
        if all_selected {
            return self.mark_all_visible(selected.len());
        }

        if selected.is_empty() {
            for node in &mut self.nodes {
                node.visible = false;
            }
            for edge in &mut self.edges {
                edge.visible = false;
            }
            return VisibleSet::default();
        }

        let (visible_nodes, visible_edges) = self.forward_closure(&selected);
        debug!(
            roots = selected.len(),
            nodes = visible_nodes.len(),
            edges = visible_edges.len(),
            "computed reachable subgraph"
        );

        for node in &mut self.nodes {
            node.visible = visible_nodes.contains(&node.id);
        }
        for edge in &mut self.edges {
            edge.visible = visible_edges.contains(&edge.id);
        }

        VisibleSet {
            nodes: visible_nodes,
            edges: visible_edges,
            root_count: selected.len(),
        }
    }

    /// Breadth-first forward closure over `source -> target` edges.
    /// Every outgoing edge of a reached node is itself reachable,
    /// along with its target.
    fn forward_closure(
        &self,
        selected: &HashSet<String>,
    ) -> (HashSet<String>, HashSet<String>) {
        let mut visible_nodes = HashSet::new();
        let mut visible_edges = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for id in selected {
            // Stale selections (ids no longer in the graph) are
            // ignored rather than failing the pass.
            if self.node_index.contains_key(id) && visible_nodes.insert(id.clone()) {
                queue.push_back(id.as_str());
            }
        }

        while let Some(id) = queue.pop_front() {
            for &edge_index in self.outgoing.get(id).into_iter().flatten() {
                let edge = &self.edges[edge_index];
                visible_edges.insert(edge.id.clone());
                if visible_nodes.insert(edge.target.clone()) {
                    queue.push_back(edge.target.as_str());
                }
            }
        }

        (visible_nodes, visible_edges)
    }

    fn mark_all_visible(&mut self, root_count: usize) -> VisibleSet {
        let mut nodes = HashSet::with_capacity(self.nodes.len());
        for node in &mut self.nodes {
            node.visible = true;
            nodes.insert(node.id.clone());
        }
        let mut edges = HashSet::with_capacity(self.edges.len());
        for edge in &mut self.edges {
            edge.visible = true;
            edges.insert(edge.id.clone());
        }
        VisibleSet {
            nodes,
            edges,
            root_count,
        }
    }
}
