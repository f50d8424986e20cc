//! The line-based text protocol spoken with the game harness.
//!
//! Initialisation is a header `totalNodes linkCount exitCount`, then `linkCount` lines `a b`, then `exitCount` lines naming one exit each.
//! After that, every line names the node the adversary stands on, and each is answered by exactly one line `a b` naming the severed edge.

use std::io;
use std::io::{BufRead, Write};

use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::builder::{BuilderInvalidReason, NetworkBuilder};
use crate::interceptor::{InterceptError, Interceptor, TurnReport, TurnState};
use crate::network::Network;
use crate::node::NodeId;

/// Reasons protocol input may be rejected.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Reading input or writing a cut failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended in the middle of the initialisation block.
    #[error("input ended while expecting {expected}")]
    UnexpectedEof {
        /// The record that was missing.
        expected: &'static str,
    },

    /// A token on line `line` is not a node index or count.
    #[error("line {line}: {token:?} is not a non-negative integer")]
    BadInteger {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// Line `line` holds the wrong number of integers.
    #[error("line {line}: expected {expected} integers, found {found}")]
    WrongArity {
        /// 1-based line number.
        line: usize,
        /// Integers the record needs.
        expected: usize,
        /// Integers on the line.
        found: usize,
    },

    /// The level parsed but does not describe a valid network.
    #[error("invalid level: {0:?}")]
    InvalidLevel(Vec<BuilderInvalidReason>),

    /// A turn could not be played.
    #[error("turn failed: {0}")]
    Intercept(#[from] InterceptError),
}

/// A parsed initialisation block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    /// Nodes are `0..node_count`.
    pub node_count: usize,
    /// Links in input order.
    pub links: Vec<(NodeId, NodeId)>,
    /// Exits in input order.
    pub exits: Vec<NodeId>,
}

impl Level {
    /// Build the network described by this level, rejecting it if it is malformed.
    pub fn network(&self) -> Result<Network, ProtocolError> {
        let mut builder = NetworkBuilder::with_nodes(self.node_count);
        for (a, b) in self.links.iter() {
            builder.add_link(*a, *b);
        }
        for exit in self.exits.iter() {
            builder.add_exit(*exit);
        }

        builder.build().map_err(|reasons| ProtocolError::InvalidLevel(reasons.clone()))
    }
}

/// Reads protocol records line by line, keeping count of lines for error messages.
pub struct LineReader<R> {
    input: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    /// Start reading at the first line of `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The integers on the next non-blank line, or `None` at end of input.
    fn next_record(&mut self) -> Result<Option<Vec<usize>>, ProtocolError> {
        loop {
            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            if self.buf.trim().is_empty() {
                continue;
            }

            let line = self.line;
            return self.buf.split_whitespace()
                .map(|token| token.parse::<usize>().map_err(|_| ProtocolError::BadInteger { line, token: token.to_string() }))
                .collect::<Result<Vec<_>, _>>()
                .map(Some);
        }
    }

    /// Exactly `N` integers from the next non-blank line.
    fn expect_record<const N: usize>(&mut self, expected: &'static str) -> Result<[usize; N], ProtocolError> {
        let record = self.next_record()?.ok_or(ProtocolError::UnexpectedEof { expected })?;
        let found = record.len();

        record.try_into().map_err(|_| ProtocolError::WrongArity { line: self.line, expected: N, found })
    }

    /// Read a whole initialisation block.
    pub fn read_level(&mut self) -> Result<Level, ProtocolError> {
        let [node_count, link_count, exit_count] = self.expect_record::<3>("level header")?;

        let links = (0..link_count)
            .map(|_| self.expect_record::<2>("link").map(|[a, b]| (NodeId(a), NodeId(b))))
            .collect::<Result<Vec<_>, _>>()?;
        let exits = (0..exit_count)
            .map(|_| self.expect_record::<1>("exit").map(|[exit]| NodeId(exit)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Level { node_count, links, exits })
    }

    /// Read the adversary's position for the next turn, or `None` once input is exhausted.
    pub fn read_position(&mut self) -> Result<Option<NodeId>, ProtocolError> {
        match self.next_record()? {
            None => Ok(None),
            Some(record) => match record.as_slice() {
                [node] => Ok(Some(NodeId(*node))),
                _ => Err(ProtocolError::WrongArity { line: self.line, expected: 1, found: record.len() }),
            }
        }
    }
}

/// Read a level from `input`. Shorthand for [`LineReader::read_level`] when no turns follow.
pub fn read_level(input: impl BufRead) -> Result<Level, ProtocolError> {
    LineReader::new(input).read_level()
}

/// The output line for a severed edge, without the trailing newline.
pub fn format_cut(cut: &UnorderedPair<NodeId>) -> String {
    format!("{} {}", cut.0, cut.1)
}

/// Play a whole game over the protocol: read the level from `input`, then answer every position with one cut line on `output`.
///
/// Output is flushed after every line, since the harness waits for it before sending the next position.
/// Play ends at end of input or once the interceptor stops; `on_turn` sees every turn's report.
pub fn play<R, W, F>(input: R, mut output: W, mut on_turn: F) -> Result<Interceptor, ProtocolError>
where
    R: BufRead,
    W: Write,
    F: FnMut(&TurnReport),
{
    let mut reader = LineReader::new(input);
    let mut interceptor = Interceptor::from(reader.read_level()?.network()?);

    while let Some(adversary) = reader.read_position()? {
        let report = interceptor.turn(adversary)?;
        writeln!(output, "{}", format_cut(&report.cut))?;
        output.flush()?;
        on_turn(&report);

        if report.state == TurnState::Stopped {
            break;
        }
    }

    Ok(interceptor)
}
