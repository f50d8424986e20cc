use strum::Display;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::network::{LookupError, Network};
use crate::node::NodeId;
use crate::planner::{Planner, PlannerFailure, SearchStats, Threat};

/// Lifecycle of an [`Interceptor`].
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum TurnState {
    /// Still answering adversary positions.
    Running,
    /// An edge next to the adversary was cut; no further turns are played.
    Stopped,
}

/// Reasons a turn may fail. All of them end the game.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptError {
    /// A turn was requested after the interceptor stopped.
    #[error("interceptor already stopped")]
    Stopped,
    /// The adversary stands on a node the network does not know.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The planner found nothing to cut.
    #[error(transparent)]
    Planner(PlannerFailure),
}

impl From<PlannerFailure> for InterceptError {
    fn from(value: PlannerFailure) -> Self {
        match value {
            PlannerFailure::Lookup(lookup) => Self::Lookup(lookup),
            failure => Self::Planner(failure),
        }
    }
}

/// What happened during one turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// 1-based turn number.
    pub turn: usize,
    /// The edge that was severed, as `(node, exit)`.
    pub cut: UnorderedPair<NodeId>,
    /// Why this edge was chosen.
    pub threat: Threat,
    /// How much searching the choice took.
    pub stats: SearchStats,
    /// The state after this turn.
    pub state: TurnState,
}

/// Plays the game: owns the [`Network`] and severs one edge per adversary position.
pub struct Interceptor {
    network: Network,
    state: TurnState,
    turns: usize,
}

impl From<Network> for Interceptor {
    fn from(network: Network) -> Self {
        Self {
            network,
            state: TurnState::Running,
            turns: 0,
        }
    }
}

impl Interceptor {
    /// The network with every cut so far applied.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Consume the interceptor, returning its network.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Whether further turns will be played.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Number of turns played so far.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Respond to the adversary standing on `adversary` by cutting one edge.
    ///
    /// If the adversary neighbors an exit, that edge is cut and the interceptor stops.
    /// Only one edge is cut even if the adversary neighbors two exits; the other stays open.
    /// Otherwise the edge chosen by [`Planner::plan`] is cut and the interceptor keeps running.
    pub fn turn(&mut self, adversary: NodeId) -> Result<TurnReport, InterceptError> {
        if self.state == TurnState::Stopped {
            return Err(InterceptError::Stopped);
        }

        let (threat, stats) = Planner::from(&self.network).plan(adversary)?;
        let cut = threat.edge();
        self.network.remove_edge(cut.0, cut.1);

        if let Threat::Immediate { .. } = threat {
            self.state = TurnState::Stopped;
        }
        self.turns += 1;

        Ok(TurnReport {
            turn: self.turns,
            cut,
            threat,
            stats,
            state: self.state,
        })
    }
}
