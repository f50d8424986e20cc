use std::collections::{HashSet, VecDeque};

use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::network::{LookupError, Network};
use crate::node::NodeId;

/// Reasons a [`Planner`] may fail. Both mean the network or the adversary position broke the input contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerFailure {
    /// No node bordering an exit is reachable from the adversary, so there is no edge worth cutting.
    #[error("no exit-adjacent node reachable from {from}")]
    NoThreat {
        /// Where the adversary stood.
        from: NodeId,
    },
    /// The adversary, or a node met during the search, is not part of the network.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// The node the planner wants to cut off from an exit, and why.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Threat {
    /// The adversary already stands next to an exit.
    Immediate {
        /// The adversary's node.
        node: NodeId,
        /// The first adjacent exit.
        exit: NodeId,
    },
    /// The nearest node bordering two exits; one of them can be cut now, the other is left for a later turn.
    Fork {
        /// The fork itself.
        node: NodeId,
        /// Its first two exits in adjacency order.
        exits: (NodeId, NodeId),
    },
    /// No fork is reachable; the nearest node bordering a single exit.
    Single {
        /// The exit-adjacent node.
        node: NodeId,
        /// Its exit.
        exit: NodeId,
    },
}

impl Threat {
    /// The node the adversary would escape from.
    pub fn node(&self) -> NodeId {
        match *self {
            Threat::Immediate { node, .. } | Threat::Fork { node, .. } | Threat::Single { node, .. } => node,
        }
    }

    /// The edge to cut: always `(node, first exit)`. The second exit of a fork is left standing.
    pub fn edge(&self) -> UnorderedPair<NodeId> {
        match *self {
            Threat::Immediate { node, exit } | Threat::Single { node, exit } => UnorderedPair(node, exit),
            Threat::Fork { node, exits: (first, _) } => UnorderedPair(node, first),
        }
    }
}

/// Counters describing one search, for diagnostics only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose neighbors were inspected.
    pub expanded: usize,
    /// Times the frontier was replaced by the priority pool.
    pub promotions: usize,
}

/// The search frontier.
///
/// [`Level`](Frontier::Level) is plain breadth-first order.
/// Once more than one node bordering an exit has been seen, those nodes replace whatever was queued and the frontier becomes [`Promoted`](Frontier::Promoted).
/// Both variants pop and push the same way; the tag only records, for `Debug` output, whether a promotion has happened.
#[derive(Debug)]
enum Frontier {
    Level(VecDeque<NodeId>),
    Promoted(VecDeque<NodeId>),
}

impl Frontier {
    fn queue(&mut self) -> &mut VecDeque<NodeId> {
        match self {
            Frontier::Level(queue) | Frontier::Promoted(queue) => queue,
        }
    }

    fn push(&mut self, node: NodeId) {
        self.queue().push_back(node);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue().pop_front()
    }

    fn promote(&mut self, pool: Vec<NodeId>) {
        *self = Frontier::Promoted(VecDeque::from(pool));
    }
}

/// Chooses which edge to cut given the adversary's position.
/// Use [`Self::plan`] to run the search.
///
/// The heuristic assumes the adversary always heads for its nearest reachable exit.
/// A node bordering two exits (a "fork") is a loss if the adversary gets there first, since only one edge can be cut per turn.
/// Nodes bordering a single exit are safe to leave until the adversary is next to them.
/// So the planner races the adversary to the nearest fork, and only cuts single exits once no fork remains.
pub struct Planner<'a> {
    network: &'a Network,
}

impl<'a> From<&'a Network> for Planner<'a> {
    fn from(network: &'a Network) -> Self {
        Self { network }
    }
}

impl Planner<'_> {
    /// Find the threat to cut off this turn with the adversary standing on `adversary`.
    ///
    /// # Search
    /// If the adversary already neighbors an exit, that edge is returned without searching.
    ///
    /// Otherwise this is a breadth-first search from the adversary. When a node V is expanded, each undiscovered neighbor N of V is inspected in adjacency order:
    /// - if N is an exit, it counts toward the exits of V;
    /// - otherwise N is discovered and queued, and if N itself borders an exit it also joins the priority pool.
    ///
    /// If V has two exits, V is the nearest fork and the search stops.
    /// If V has one exit and nothing was recorded yet, V becomes the fallback; a later fork still takes precedence.
    /// Whenever the pool holds more than one node after an expansion, it replaces the frontier.
    ///
    /// Exits are never discovered, so they may be counted again from another node, but they are never expanded.
    /// Every node enters the pool at most once, so the search is bounded by the size of the network.
    pub fn plan(&self, adversary: NodeId) -> Result<(Threat, SearchStats), PlannerFailure> {
        let mut stats = SearchStats::default();

        if let Some(exit) = self.network.adjacent_exits(adversary)?.first() {
            return Ok((Threat::Immediate { node: adversary, exit: *exit }, stats));
        }

        let mut discovered = HashSet::from([adversary]);
        let mut frontier = Frontier::Level(VecDeque::new());
        let mut pool = Vec::new();
        let mut fallback = None;
        let mut current = Some(adversary);

        while let Some(node) = current {
            stats.expanded += 1;
            let mut exits = Vec::with_capacity(2);

            for neighbor in self.network.neighbors(node)? {
                if discovered.contains(&neighbor) {
                    continue;
                }

                if self.network.is_exit(neighbor) {
                    exits.push(neighbor);
                    continue;
                }

                if !self.network.adjacent_exits(neighbor)?.is_empty() {
                    pool.push(neighbor);
                }
                discovered.insert(neighbor);
                frontier.push(neighbor);
            }

            match exits.as_slice() {
                // more than two breaks the structural invariant; still the most urgent thing in sight
                [first, second, ..] => return Ok((Threat::Fork { node, exits: (*first, *second) }, stats)),
                [exit] if fallback.is_none() => fallback = Some(Threat::Single { node, exit: *exit }),
                _ => {}
            }

            if pool.len() > 1 {
                frontier.promote(std::mem::take(&mut pool));
                stats.promotions += 1;
            }

            current = frontier.pop();
        }

        fallback
            .map(|threat| (threat, stats))
            .ok_or(PlannerFailure::NoThreat { from: adversary })
    }
}
