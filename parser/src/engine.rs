//! table-driven parse engines and the tree-building event sinks.

use cfg::{NontermId, ParseTree, Symbol, SymbolNames, TermId};
use crate::error::{FatalEngineError, ParseError, SyntaxError};
use crate::flat::FlatGrammar;
use crate::ll1::LlTable;
use crate::tables::{LrTables, ACCEPT};
use crate::ParseEvents;

fn lookahead_col(grammar: &FlatGrammar, input: &[TermId], pos: usize) -> usize {
  if pos < input.len() {
    input[pos].index()
  } else {
    grammar.eof
  }
}

fn found_name(grammar: &FlatGrammar, input: &[TermId], pos: usize) -> String {
  grammar.term_col_name(lookahead_col(grammar, input, pos)).to_owned()
}

/// Rejects terminals outside the grammar's alphabet before they can index
/// out of a table row.
pub(crate) fn check_input(grammar: &FlatGrammar, input: &[TermId]) -> Result<(), SyntaxError> {
  for (pos, term) in input.iter().enumerate() {
    if term.index() >= grammar.num_terms {
      return Err(SyntaxError {
        pos,
        found: "<unknown terminal>".to_owned(),
        expected: Vec::new(),
      });
    }
  }
  Ok(())
}

/// Predictive LL(1) driver. Emits `expand` for every table hit and
/// `terminal` for every matched input symbol, a pre-order walk of the parse
/// tree.
pub(crate) fn ll_parse<E: ParseEvents>(
  grammar: &FlatGrammar,
  table: &LlTable,
  input: &[TermId],
  events: &mut E,
) -> Result<(), ParseError> {
  check_input(grammar, input)?;

  let mut stack = vec![Symbol::Nonterm(grammar.user_start)];
  let mut pos = 0;

  while let Some(top) = stack.pop() {
    match top {
      Symbol::Term(t) => {
        if pos < input.len() && input[pos] == t {
          events.terminal(t);
          pos += 1;
        } else {
          return Err(
            SyntaxError {
              pos,
              found: found_name(grammar, input, pos),
              expected: vec![grammar.term_name(t).to_owned()],
            }
            .into(),
          );
        }
      }
      Symbol::Nonterm(nt) => {
        let col = lookahead_col(grammar, input, pos);
        let prod_ix = match table.entry(nt, col) {
          Some(prod_ix) => prod_ix,
          None => {
            return Err(
              SyntaxError {
                pos,
                found: found_name(grammar, input, pos),
                expected: table.expected(grammar, nt),
              }
              .into(),
            );
          }
        };
        let prod = &grammar.prods[prod_ix];
        events.expand(nt, prod_ix, prod.symbols.len());
        stack.extend(prod.symbols.iter().rev().copied());
      }
    }
  }

  if pos < input.len() {
    return Err(
      SyntaxError {
        pos,
        found: found_name(grammar, input, pos),
        expected: vec!["$".to_owned()],
      }
      .into(),
    );
  }
  Ok(())
}

/// Shift-reduce LR driver, shared by SLR, canonical LR(1), and LALR(1).
/// Emits `terminal` per shift and `reduce` per reduction, a post-order walk
/// of the parse tree.
pub(crate) fn lr_parse<E: ParseEvents>(
  grammar: &FlatGrammar,
  tables: &LrTables,
  input: &[TermId],
  events: &mut E,
) -> Result<(), ParseError> {
  check_input(grammar, input)?;

  let mut stack: Vec<u32> = vec![0];
  let mut pos = 0;

  loop {
    let state = stack[stack.len() - 1];
    let col = lookahead_col(grammar, input, pos);
    let action = tables.action[state as usize][col];

    if action == 0 {
      let expected = (0..=grammar.eof)
        .filter(|c| tables.action[state as usize][*c] != 0)
        .map(|c| grammar.term_col_name(c).to_owned())
        .collect();
      return Err(
        SyntaxError {
          pos,
          found: found_name(grammar, input, pos),
          expected,
        }
        .into(),
      );
    }

    if action == ACCEPT {
      return Ok(());
    }

    if action > 0 {
      events.terminal(input[pos]);
      stack.push(action as u32 - 1);
      pos += 1;
    } else {
      let prod_ix = !action as usize;
      let prod = &grammar.prods[prod_ix];
      let len = prod.symbols.len();
      stack.truncate(stack.len() - len);

      let top = stack[stack.len() - 1];
      let target = tables.goto[top as usize][prod.nt.index()];
      if target == 0 {
        return Err(
          FatalEngineError {
            state: top,
            nonterminal: grammar.nonterm_name(prod.nt).to_owned(),
          }
          .into(),
        );
      }
      stack.push(target - 1);
      events.reduce(prod.nt, prod_ix, len);
    }
  }
}

/// Builds the tree from LL events: `expand` opens a node with a known child
/// count, terminals and completed nodes fill the open slots.
pub(crate) struct LlTreeSink {
  pending: Vec<(ParseTree, usize)>,
  pub root: Option<ParseTree>,
}

impl LlTreeSink {
  pub fn new() -> LlTreeSink {
    LlTreeSink {
      pending: Vec::new(),
      root: None,
    }
  }

  fn attach(&mut self, mut tree: ParseTree) {
    loop {
      match self.pending.last_mut() {
        None => {
          self.root = Some(tree);
          return;
        }
        Some((node, remaining)) => {
          node.children.push(tree);
          *remaining -= 1;
          if *remaining > 0 {
            return;
          }
          let (done, _) = self.pending.pop().unwrap();
          tree = done;
        }
      }
    }
  }
}

impl ParseEvents for LlTreeSink {
  fn expand(&mut self, head: NontermId, _prod: usize, len: usize) {
    if len == 0 {
      self.attach(ParseTree::node(head, vec![ParseTree::leaf(TermId::EPSILON)]));
    } else {
      self.pending.push((ParseTree::node(head, Vec::new()), len));
    }
  }

  fn terminal(&mut self, term: TermId) {
    self.attach(ParseTree::leaf(term));
  }
}

/// Builds the tree from LR events: terminals pile up on a stack and each
/// reduction folds the top `len` trees into a node.
pub(crate) struct LrTreeSink {
  pub stack: Vec<ParseTree>,
}

impl LrTreeSink {
  pub fn new() -> LrTreeSink {
    LrTreeSink { stack: Vec::new() }
  }
}

impl ParseEvents for LrTreeSink {
  fn terminal(&mut self, term: TermId) {
    self.stack.push(ParseTree::leaf(term));
  }

  fn reduce(&mut self, head: NontermId, _prod: usize, len: usize) {
    if len == 0 {
      self.stack.push(ParseTree::node(head, vec![ParseTree::leaf(TermId::EPSILON)]));
    } else {
      let children = self.stack.split_off(self.stack.len() - len);
      self.stack.push(ParseTree::node(head, children));
    }
  }
}
