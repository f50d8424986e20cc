#![warn(missing_docs)]

//! # `gatekeeper`
//!
//! An agent for the interception game: an adversary walks an undirected network toward one of several exit nodes,
//! and each turn we may sever exactly one link. The goal is that the adversary never reaches an exit.
//!
//! Begin by building a [`Network`] using a [`NetworkBuilder`] or by reading a [`Level`](protocol::Level) with the [`protocol`] module.
//! Hand it to an [`Interceptor`], then call [`turn()`](Interceptor::turn) with the adversary's position each turn.
//! Every call severs one link and reports which.
//!
//! # Internals
//! We assume the adversary always heads for its nearest reachable exit, and that no ordinary node borders more than two exits.
//!
//! A node bordering a single exit is harmless until the adversary stands next to it: at that point we cut the link to the exit and the adversary has lost its way out.
//! A node bordering two exits, a "fork", is not: if the adversary reaches a fork we can only close one of its exits.
//! So every turn we either
//! 1. cut the exit link next to the adversary, if there is one, or
//! 2. search outward from the adversary for the nearest fork and cut one of its exit links, or
//! 3. failing that, cut the exit link of the nearest node bordering a single exit.
//!
//! The search is breadth-first with one twist: nodes found next to exit-bordering nodes are promoted ahead of the plain level order,
//! which keeps irregular branching from hiding a nearby fork. See [`Planner::plan`] for the details.
//!
//! This is a heuristic. It is not optimal, and an adversary starting next to two exits escapes.
//! The [`referee`] module simulates the assumed adversary for offline games.

pub use builder::{BuilderInvalidReason, NetworkBuilder};
pub use interceptor::{InterceptError, Interceptor, TurnReport, TurnState};
pub use network::{LookupError, Network};
pub use node::NodeId;
pub use planner::{Planner, PlannerFailure, SearchStats, Threat};

pub(crate) mod node;
pub(crate) mod network;
mod tests;
pub(crate) mod builder;
pub(crate) mod planner;
pub(crate) mod interceptor;
pub mod protocol;
pub mod referee;
