//! table-driven parser construction.
//!
//! Builds LL(1), SLR(1), canonical LR(1), or LALR(1) parsers from a grammar,
//! rejecting grammars outside the chosen class with a report of the first
//! conflict. Parsing runs against packed tables and reports derivations as
//! an event stream or a concrete parse tree.

use cfg::{Cfg, NontermId, ParseTree, TermId};

mod builder;
mod clr;
mod engine;
mod error;
mod flat;
mod item;
mod lalr;
mod ll1;
mod slr;
mod tables;

pub use error::{
  ConflictActions, Error, FatalEngineError, Ll1Conflict, LrConflict, ParseError, SyntaxError,
};
pub use flat::{FlatGrammar, Prod};
pub use ll1::LlTable;

/// The parsing strategy a parser was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
  Ll1,
  Slr1,
  Lr1,
  Lalr1,
}

/// Derivation callbacks. LL parsers report `expand` and `terminal` in
/// pre-order; LR parsers report `terminal` and `reduce` in post-order.
/// All methods default to doing nothing.
pub trait ParseEvents {
  fn expand(&mut self, _head: NontermId, _prod: usize, _len: usize) {}
  fn terminal(&mut self, _term: TermId) {}
  fn reduce(&mut self, _head: NontermId, _prod: usize, _len: usize) {}
}

struct NoEvents;

impl ParseEvents for NoEvents {}

enum Tables {
  Ll(LlTable),
  Lr(tables::LrTables),
}

/// A built parser: a grammar snapshot plus its tables.
pub struct Parser {
  grammar: FlatGrammar,
  tables: Tables,
  kind: ParserKind,
  num_states: usize,
}

/// Builds a parser of the requested kind, or reports why the grammar is
/// outside that class. Tables are built eagerly; a returned parser can no
/// longer fail for grammar reasons.
pub fn build(grammar: &mut Cfg, kind: ParserKind) -> Result<Parser, Error> {
  let ffn = grammar.ffn().clone();
  let flat = FlatGrammar::from_cfg(grammar);

  let (tables, num_states) = match kind {
    ParserKind::Ll1 => {
      let table = ll1::gen_ll_table(&flat, &ffn).map_err(Error::NotLl1)?;
      (Tables::Ll(table), 0)
    }
    ParserKind::Slr1 => {
      let (tables, n) = slr::build_tables(&flat, &ffn).map_err(Error::NotSlr1)?;
      (Tables::Lr(tables), n)
    }
    ParserKind::Lr1 => {
      let (tables, n) = clr::build_tables(&flat, &ffn).map_err(Error::NotLr1)?;
      (Tables::Lr(tables), n)
    }
    ParserKind::Lalr1 => {
      let (tables, n) = lalr::build_tables(&flat, &ffn).map_err(Error::NotLalr1)?;
      (Tables::Lr(tables), n)
    }
  };

  Ok(Parser {
    grammar: flat,
    tables,
    kind,
    num_states,
  })
}

/// Size of the LR(0) collection, which is also the LALR(1) state count.
pub fn lr0_state_count(grammar: &mut Cfg) -> usize {
  let ffn = grammar.ffn().clone();
  let flat = FlatGrammar::from_cfg(grammar);
  let mut builder = builder::Builder::<slr::Lr0Computation>::new(&flat, &ffn);
  builder.gen_states();
  builder.num_states()
}

impl Parser {
  pub fn kind(&self) -> ParserKind {
    self.kind
  }

  /// LR state count; zero for an LL parser.
  pub fn num_states(&self) -> usize {
    self.num_states
  }

  pub fn grammar(&self) -> &FlatGrammar {
    &self.grammar
  }

  /// Parses the input, reporting the derivation to `events`.
  pub fn parse_with<E: ParseEvents>(
    &self,
    input: &[TermId],
    events: &mut E,
  ) -> Result<(), ParseError> {
    match &self.tables {
      Tables::Ll(table) => engine::ll_parse(&self.grammar, table, input, events),
      Tables::Lr(tables) => engine::lr_parse(&self.grammar, tables, input, events),
    }
  }

  /// Parses the input into a concrete parse tree.
  pub fn parse(&self, input: &[TermId]) -> Result<ParseTree, ParseError> {
    match &self.tables {
      Tables::Ll(table) => {
        let mut sink = engine::LlTreeSink::new();
        engine::ll_parse(&self.grammar, table, input, &mut sink)?;
        Ok(sink.root.unwrap())
      }
      Tables::Lr(tables) => {
        let mut sink = engine::LrTreeSink::new();
        engine::lr_parse(&self.grammar, tables, input, &mut sink)?;
        Ok(sink.stack.pop().unwrap())
      }
    }
  }

  pub fn accepts(&self, input: &[TermId]) -> bool {
    self.parse_with(input, &mut NoEvents).is_ok()
  }
}
