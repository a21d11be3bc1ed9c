//! build-time and parse-time errors.

use std::fmt;
use thiserror::Error;

/// Why a parser could not be built from a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("grammar is not LL(1)\n{0}")]
  NotLl1(Ll1Conflict),
  #[error("grammar is not SLR(1)\n{0}")]
  NotSlr1(LrConflict),
  #[error("grammar is not LR(1)\n{0}")]
  NotLr1(LrConflict),
  #[error("grammar is not LALR(1)\n{0}")]
  NotLalr1(LrConflict),
}

impl Error {
  pub fn lr_conflict(&self) -> Option<&LrConflict> {
    match self {
      Error::NotLl1(_) => None,
      Error::NotSlr1(c) | Error::NotLr1(c) | Error::NotLalr1(c) => Some(c),
    }
  }
}

/// Two productions claim the same predictive table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ll1Conflict {
  pub head: String,
  pub lookahead: String,
  pub prod1: String,
  pub prod2: String,
}

impl fmt::Display for Ll1Conflict {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(
      f,
      "two productions of `{}` apply on lookahead `{}`:",
      self.head, self.lookahead
    )?;
    writeln!(f, "  {}", self.prod1)?;
    write!(f, "  {}", self.prod2)
  }
}

/// The first action-table cell two LR actions fought over. Construction
/// aborts at the first conflict; there is no precedence resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrConflict {
  pub state: u32,
  pub lookahead: String,
  /// Rendered items of the conflicting state.
  pub items: Vec<String>,
  pub actions: ConflictActions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictActions {
  ShiftReduce { reduce: String },
  ReduceReduce { reduce1: String, reduce2: String },
}

impl fmt::Display for LrConflict {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match &self.actions {
      ConflictActions::ShiftReduce { reduce } => {
        writeln!(
          f,
          "shift-reduce conflict on `{}` in state {}, reducing by",
          self.lookahead, self.state
        )?;
        writeln!(f, "  {}", reduce)?;
      }
      ConflictActions::ReduceReduce { reduce1, reduce2 } => {
        writeln!(
          f,
          "reduce-reduce conflict on `{}` in state {}, between",
          self.lookahead, self.state
        )?;
        writeln!(f, "  {}", reduce1)?;
        writeln!(f, "  {}", reduce2)?;
      }
    }
    writeln!(f, "in the state")?;
    for item in &self.items {
      writeln!(f, "  {}", item)?;
    }
    Ok(())
  }
}

/// The input does not belong to the grammar's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
  /// Token offset of the offending terminal; one past the input when the
  /// input ended too early.
  pub pos: usize,
  pub found: String,
  pub expected: Vec<String>,
}

impl fmt::Display for SyntaxError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "syntax error at token {}: found `{}`, expected one of: {}",
      self.pos,
      self.found,
      self.expected.join(", ")
    )
  }
}

impl std::error::Error for SyntaxError {}

/// The engine hit a hole in its own tables. Not reachable with tables built
/// by this crate; indicates corruption, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no goto from state {state} on `{nonterminal}`; parse tables are corrupted")]
pub struct FatalEngineError {
  pub state: u32,
  pub nonterminal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error(transparent)]
  Syntax(#[from] SyntaxError),
  #[error(transparent)]
  Fatal(#[from] FatalEngineError),
}
