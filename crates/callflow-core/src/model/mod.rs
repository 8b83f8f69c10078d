//! The route graph model: typed nodes and edges with routing metadata.
//!
//! A [`RouteGraph`] is built once per fetch from a flat sequence of
//! [`Element`] records (the shape the provisioning-API collaborator
//! produces) and then mutated in place by repeated resolver and filter
//! passes. The model holds pure topology plus two derived
//! classification flags:
//!
//! - `Edge::active_for_instant`, written by the route resolver;
//! - `visible` on both nodes and edges, written by the reachability
//!   filter.
//!
//! The flags are transient. They are recomputed in full on every pass,
//! never serialized, and never influence graph structure. The two
//! passes write disjoint fields, so they compose in either order.
//!
//! Loading is total over malformed-but-shaped input with one
//! exception: an edge whose `source` or `target` references a missing
//! node fails fast with [`GraphError::MissingEndpoint`] rather than
//! surfacing as a silent no-op deep inside resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GraphError;
use crate::schedule::TimeRule;

/// Node kind marking a selectable entry point (a callable phone
/// number). The kind set is otherwise open-ended: routing rules,
/// destinations, visual containers and anything else the provisioning
/// side invents all flow through untouched.
pub const INGRESS_KIND: &str = "ingress";

/// A graph node: a phone number, routing rule, destination, or visual
/// container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier.
    pub id: String,
    /// Domain-open node kind; only [`INGRESS_KIND`] is semantically
    /// special.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable display text.
    pub label: String,
    /// Containing group node, visual nesting only. Containers have no
    /// outgoing routing edges of their own.
    #[serde(default, alias = "parent", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Derived by the reachability filter; not persisted.
    #[serde(skip_serializing, skip_deserializing, default = "default_visible")]
    pub visible: bool,
}

impl Node {
    /// Creates a node with no parent container.
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            parent_id: None,
            visible: true,
        }
    }

    /// Places this node inside a container node.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Whether this node is a selectable entry point.
    pub fn is_ingress(&self) -> bool {
        self.kind == INGRESS_KIND
    }
}

/// A directed routing edge with priority and schedule metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier. May be omitted on the wire, in which case
    /// the graph synthesizes `"{source}_{target}"` at load time.
    #[serde(default)]
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Evaluation rank: smaller is tried first. `None` is a sentinel
    /// that sorts after every numeric priority, not a real rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Eligibility windows. Empty means the edge is unconditional.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<TimeRule>,
    /// Derived by the route resolver. `None` means no simulation is in
    /// effect; the edge is in the undistinguished state.
    #[serde(skip_serializing, skip_deserializing)]
    pub active_for_instant: Option<bool>,
    /// Derived by the reachability filter; not persisted.
    #[serde(skip_serializing, skip_deserializing, default = "default_visible")]
    pub visible: bool,
}

impl Edge {
    /// Creates an unconditional edge with no priority rank.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            priority: None,
            schedule: Vec::new(),
            active_for_instant: None,
            visible: true,
        }
    }

    /// Sets the priority rank.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the schedule.
    pub fn with_schedule(mut self, schedule: Vec<TimeRule>) -> Self {
        self.schedule = schedule;
        self
    }
}

fn default_visible() -> bool {
    true
}

/// One record of the graph input sequence: either a node or an edge.
///
/// Edge records are distinguished by the presence of `source` and
/// `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Edge(Edge),
    Node(Node),
}

/// The in-memory routing topology plus derived classification flags.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) node_index: HashMap<String, usize>,
    pub(crate) edge_index: HashMap<String, usize>,
    /// Edge indices keyed by source node id.
    pub(crate) outgoing: HashMap<String, Vec<usize>>,
}

impl RouteGraph {
    /// Builds a graph from a flat element sequence.
    ///
    /// Elements are deduplicated by id with the first occurrence
    /// winning, matching how the upstream builder merges overlapping
    /// call paths. Node and edge records may arrive in any order; edge
    /// endpoints are validated only after all nodes are known.
    pub fn from_elements(elements: Vec<Element>) -> Result<Self, GraphError> {
        let mut graph = RouteGraph::default();
        let mut pending_edges = Vec::new();

        for element in elements {
            match element {
                Element::Node(node) => {
                    if graph.node_index.contains_key(&node.id) {
                        continue;
                    }
                    graph.node_index.insert(node.id.clone(), graph.nodes.len());
                    graph.nodes.push(node);
                }
                Element::Edge(mut edge) => {
                    if edge.id.is_empty() {
                        edge.id = format!("{}_{}", edge.source, edge.target);
                    }
                    pending_edges.push(edge);
                }
            }
        }

        for edge in pending_edges {
            if graph.edge_index.contains_key(&edge.id) {
                continue;
            }
            for endpoint in [&edge.source, &edge.target] {
                if !graph.node_index.contains_key(endpoint) {
                    return Err(GraphError::MissingEndpoint {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            let index = graph.edges.len();
            graph.edge_index.insert(edge.id.clone(), index);
            graph
                .outgoing
                .entry(edge.source.clone())
                .or_default()
                .push(index);
            graph.edges.push(edge);
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "loaded route graph"
        );
        Ok(graph)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&index| &self.nodes[index])
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&index| &self.edges[index])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of a node, in insertion order. Empty for unknown
    /// ids and for nodes without outgoing edges.
    pub fn outgoing<'a>(&'a self, node_id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.outgoing
            .get(node_id)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// Ids of all ingress nodes, sorted by display label. This is the
    /// order the entry-point checklist presents them in.
    pub fn ingress_ids(&self) -> Vec<&str> {
        let mut ingress: Vec<&Node> = self.nodes.iter().filter(|n| n.is_ingress()).collect();
        ingress.sort_by(|a, b| a.label.cmp(&b.label));
        ingress.into_iter().map(|n| n.id.as_str()).collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
