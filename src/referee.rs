//! Offline games against the adversary the planner is designed for.
//!
//! Each round the interceptor answers the adversary's position with a cut, then the adversary takes one step along a shortest path toward its nearest reachable exit.
//! Ties between exits go to the lower node, ties between steps to the earlier neighbor in adjacency order.

use petgraph::algo::dijkstra;
use strum::Display;
use thiserror::Error;

use crate::interceptor::{InterceptError, Interceptor, TurnReport};
use crate::network::{LookupError, Network};
use crate::node::NodeId;
use crate::planner::PlannerFailure;

/// Reasons a simulated game may be aborted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefereeError {
    /// The interceptor failed to play a turn.
    #[error(transparent)]
    Intercept(#[from] InterceptError),
    /// The adversary's position is not part of the network.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// How a simulated game ended.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum Outcome {
    /// No exit is reachable from the adversary any more.
    Contained,
    /// The adversary stepped onto `exit`.
    Escaped {
        /// The exit reached.
        exit: NodeId,
    },
    /// Neither happened within the turn budget.
    TurnLimit,
}

/// The record of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    /// How the game ended.
    pub outcome: Outcome,
    /// One report per turn the interceptor played.
    pub reports: Vec<TurnReport>,
    /// Every node the adversary stood on, starting position first.
    pub path: Vec<NodeId>,
}

/// The adversary's next node: one step along a shortest path toward its nearest reachable exit, or `None` if no exit is reachable.
pub fn nearest_exit_step(network: &Network, from: NodeId) -> Result<Option<NodeId>, LookupError> {
    if !network.contains_node(from) {
        return Err(LookupError::UnknownNode(from));
    }

    let from_adversary = dijkstra(&network.graph, from, None, |_| 1usize);
    let target = network.exits()
        .into_iter()
        .filter_map(|exit| from_adversary.get(&exit).map(|distance| (*distance, exit)))
        .min();

    let Some((distance, exit)) = target else {
        return Ok(None);
    };

    let from_exit = dijkstra(&network.graph, exit, Some(from), |_| 1usize);
    Ok(network.neighbors(from)?
        .into_iter()
        .find(|neighbor| from_exit.get(neighbor).is_some_and(|d| *d + 1 == distance)))
}

/// Plays an [`Interceptor`] against the nearest-exit adversary.
pub struct Referee {
    interceptor: Interceptor,
    adversary: NodeId,
    max_turns: usize,
    reports: Vec<TurnReport>,
    path: Vec<NodeId>,
}

impl Referee {
    /// Rounds played by [`run`](Self::run) unless [`with_max_turns`](Self::with_max_turns) says otherwise.
    pub const DEFAULT_MAX_TURNS: usize = 1000;

    /// A game on `network` with the adversary starting on `start`.
    pub fn new(network: Network, start: NodeId) -> Self {
        Self {
            interceptor: Interceptor::from(network),
            adversary: start,
            max_turns: Self::DEFAULT_MAX_TURNS,
            reports: Vec::new(),
            path: vec![start],
        }
    }

    /// Limit the game to `max_turns` rounds.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Where the adversary currently stands.
    pub fn adversary(&self) -> NodeId {
        self.adversary
    }

    /// The interceptor playing against the adversary.
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Play one round: the interceptor cuts (unless it has stopped), then the adversary moves.
    ///
    /// Returns the outcome if this round ended the game.
    pub fn round(&mut self) -> Result<Option<Outcome>, RefereeError> {
        match self.interceptor.turn(self.adversary) {
            Ok(report) => self.reports.push(report),
            // a stopped interceptor simply stops cutting; the adversary keeps moving
            Err(InterceptError::Stopped) => {}
            // nothing left to cut means no exit is reachable, which the step below reports
            Err(InterceptError::Planner(PlannerFailure::NoThreat { .. })) => {}
            Err(err) => return Err(err.into()),
        }

        let Some(next) = nearest_exit_step(self.interceptor.network(), self.adversary)? else {
            return Ok(Some(Outcome::Contained));
        };

        self.adversary = next;
        self.path.push(next);

        if self.interceptor.network().is_exit(next) {
            return Ok(Some(Outcome::Escaped { exit: next }));
        }

        Ok(None)
    }

    /// Play rounds until the game ends or the turn budget runs out.
    pub fn run(mut self) -> Result<Game, RefereeError> {
        let mut outcome = Outcome::TurnLimit;

        if self.interceptor.network().is_exit(self.adversary) {
            outcome = Outcome::Escaped { exit: self.adversary };
        } else {
            for _ in 0..self.max_turns {
                if let Some(ended) = self.round()? {
                    outcome = ended;
                    break;
                }
            }
        }

        Ok(Game {
            outcome,
            reports: self.reports,
            path: self.path,
        })
    }
}
