use std::collections::HashSet;

use itertools::Itertools;
use unordered_pair::UnorderedPair;

use crate::network::Network;
use crate::node::NodeId;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuilderInvalidReason {
    /// A link endpoint was outside the node range given to [`NetworkBuilder::with_nodes`].
    NodeOutOfBounds(NodeId),
    /// A link from a node to itself.
    SelfLink(NodeId),
    /// The same link was added twice, in either order.
    DuplicateLink(NodeId, NodeId),
    /// An exit was outside the node range given to [`NetworkBuilder::with_nodes`].
    ExitOutOfBounds(NodeId),
    /// The same node was marked as an exit twice.
    DuplicateExit(NodeId),
    /// A non-exit node neighbors more than two exits, which the interception heuristic cannot cover.
    OverloadedNode(NodeId),
    /// More nodes were requested than [`NetworkBuilder::MAX_NODES`].
    TooManyNodes(usize),
}

/// A builder for [`Network`]s over a fixed range of nodes.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a builder has become invalid, every further mutation is ignored and [`build`](Self::build) reports why.
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    node_count: usize,
    // in insertion order, which fixes adjacency order in the built network
    links: Vec<UnorderedPair<NodeId>>,
    link_set: HashSet<UnorderedPair<NodeId>>,
    exits: Vec<NodeId>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::with_nodes(0)
    }
}

impl NetworkBuilder {
    /// Largest network a builder accepts. Every node is registered up front, so the node count must stay allocatable.
    pub const MAX_NODES: usize = 1 << 16;

    /// Construct a new builder for a network with nodes `0..node_count`.
    ///
    /// The builder starts out invalid if `node_count` exceeds [`Self::MAX_NODES`].
    pub fn with_nodes(node_count: usize) -> Self {
        let mut invalid_reasons = Vec::new();
        if node_count > Self::MAX_NODES {
            invalid_reasons.push(BuilderInvalidReason::TooManyNodes(node_count));
        }

        Self {
            node_count,
            links: Default::default(),
            link_set: Default::default(),
            exits: Default::default(),
            invalid_reasons,
        }
    }

    #[inline]
    fn in_bounds(&self, node: NodeId) -> bool {
        node.index() < self.node_count
    }

    /// Link `a` and `b`. The order of the two endpoints does not matter.
    ///
    /// May cause the builder to enter an invalid state if either endpoint is out of bounds, the endpoints coincide, or the link already exists.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for node in [a, b] {
            if !self.in_bounds(node) {
                self.invalid_reasons.push(BuilderInvalidReason::NodeOutOfBounds(node));
                return self;
            }
        }

        if a == b {
            self.invalid_reasons.push(BuilderInvalidReason::SelfLink(a));
            return self;
        }

        let link = UnorderedPair(a, b);
        if !self.link_set.insert(link) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateLink(a, b));
            return self;
        }
        self.links.push(link);

        self
    }

    /// Drop a previously added link between `a` and `b`. Dropping a link that was never added does nothing.
    ///
    /// If the builder is in an invalid state, this function does nothing.
    pub fn remove_link(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let link = UnorderedPair(a, b);
        if self.link_set.remove(&link) {
            // UnorderedPair equality ignores order, so this catches (b, a) as well
            self.links.retain(|existing| *existing != link);
        }

        self
    }

    /// Mark `node` as an exit.
    ///
    /// May cause the builder to enter an invalid state if `node` is out of bounds or is already an exit.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_exit(&mut self, node: NodeId) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(node) {
            self.invalid_reasons.push(BuilderInvalidReason::ExitOutOfBounds(node));
            return self;
        }

        if self.exits.contains(&node) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateExit(node));
            return self;
        }

        self.exits.push(node);
        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Overloaded nodes are only detected by [`build`](Self::build).
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Network`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    ///
    /// Checking for nodes neighboring more than two exits happens here, since it depends on the complete link and exit lists.
    pub fn build(&mut self) -> Result<Network, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let mut network = Network::with_nodes(self.node_count);
        for UnorderedPair(a, b) in self.links.iter() {
            network.add_edge(*a, *b);
        }
        for exit in self.exits.iter() {
            network.mark_exit(*exit);
        }

        let overloaded = network.graph.nodes()
            .filter(|node| !network.is_exit(*node))
            .filter(|node| network.graph.neighbors(*node).filter(|n| network.is_exit(*n)).count() > 2)
            .sorted()
            .map(BuilderInvalidReason::OverloadedNode)
            .collect_vec();

        if !overloaded.is_empty() {
            self.invalid_reasons.extend(overloaded);
            return Err(&self.invalid_reasons);
        }

        Ok(network)
    }
}
