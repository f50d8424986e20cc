use std::collections::HashSet;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::node::NodeId;

/// Failure to look up a node which was never registered with a [`Network`].
///
/// This means the input violated its contract; callers are not expected to recover from it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The node was never registered by [`Network::with_nodes`], [`Network::add_node`], [`Network::add_edge`] or [`Network::mark_exit`].
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// The undirected network the adversary moves on, together with its exit nodes.
///
/// Links are stored in a [`UnGraphMap`], so they are symmetric by construction.
/// Exits are fixed once marked; only links are ever removed.
///
/// Networks are usually obtained from a [`NetworkBuilder`](crate::builder::NetworkBuilder) or [`Level`](crate::protocol::Level).
#[derive(Clone, Debug)]
pub struct Network {
    pub(crate) graph: UnGraphMap<NodeId, ()>,
    pub(crate) exits: HashSet<NodeId>,
}

impl Network {
    /// An edgeless network with nodes `0..node_count` registered and no exits.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut graph = UnGraphMap::with_capacity(node_count, 0);
        for index in 0..node_count {
            graph.add_node(NodeId(index));
        }

        Self {
            graph,
            exits: HashSet::new(),
        }
    }

    /// Register `node` without linking it. Registering a known node changes nothing.
    pub fn add_node(&mut self, node: NodeId) {
        self.graph.add_node(node);
    }

    /// Link `a` and `b`, registering either of them if they are not yet known.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        // add_edge on the graph map inserts missing endpoints itself
        self.graph.add_edge(a, b, ());
    }

    /// Unlink `a` and `b`. Returns whether a link was actually removed; removing an absent link is not an error.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        self.graph.remove_edge(a, b).is_some()
    }

    /// Mark `node` as an exit, registering it if it is not yet known.
    pub fn mark_exit(&mut self, node: NodeId) {
        self.add_node(node);
        self.exits.insert(node);
    }

    /// Whether `node` was marked as an exit.
    pub fn is_exit(&self, node: NodeId) -> bool {
        self.exits.contains(&node)
    }

    /// Whether `node` is registered, linked or not.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.graph.contains_node(node)
    }

    /// Whether `a` and `b` are currently linked, in either order.
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Number of registered nodes, exits included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of links not yet removed.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of exits.
    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }

    /// All exits, in ascending order.
    pub fn exits(&self) -> Vec<NodeId> {
        self.exits.iter().copied().sorted().collect_vec()
    }

    /// All remaining links, in the order the graph map holds them.
    pub fn edges(&self) -> Vec<UnorderedPair<NodeId>> {
        self.graph.all_edges()
            .map(|(a, b, _)| UnorderedPair(a, b))
            .collect_vec()
    }

    /// The neighbors of `node` in adjacency order.
    ///
    /// Adjacency order is insertion order until a link is removed, at which point the last neighbor takes the removed one's slot.
    /// Either way the order depends only on the sequence of mutations, so repeated runs agree.
    pub fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, LookupError> {
        // the graph map yields nothing at all for unknown nodes
        if !self.graph.contains_node(node) {
            return Err(LookupError::UnknownNode(node));
        }

        Ok(self.graph.neighbors(node).collect_vec())
    }

    /// The exits among the neighbors of `node`, in adjacency order. A non-empty result with a non-exit `node` makes it gate-adjacent.
    pub fn adjacent_exits(&self, node: NodeId) -> Result<Vec<NodeId>, LookupError> {
        Ok(self.neighbors(node)?
            .into_iter()
            .filter(|neighbor| self.is_exit(*neighbor))
            .collect_vec())
    }
}
