//! concrete parse trees.

use crate::alphabet::TermId;
use crate::symbol::{NontermId, Symbol, SymbolNames};

/// A concrete parse tree. Interior nodes carry nonterminals, leaves carry
/// terminals. A nonterminal expanded by an epsilon body gets a single leaf
/// labeled `TermId::EPSILON`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
  pub symbol: Symbol,
  pub children: Vec<ParseTree>,
}

impl ParseTree {
  pub fn leaf(term: TermId) -> ParseTree {
    ParseTree {
      symbol: Symbol::Term(term),
      children: Vec::new(),
    }
  }

  pub fn node(nt: NontermId, children: Vec<ParseTree>) -> ParseTree {
    ParseTree {
      symbol: Symbol::Nonterm(nt),
      children,
    }
  }

  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  /// In-order terminal leaves, the fringe of the tree. Epsilon leaves are
  /// skipped.
  pub fn fringe(&self) -> Vec<TermId> {
    let mut out = Vec::new();
    self.collect_fringe(&mut out);
    out
  }

  fn collect_fringe(&self, out: &mut Vec<TermId>) {
    match self.symbol {
      Symbol::Term(TermId::EPSILON) => {}
      Symbol::Term(t) => out.push(t),
      Symbol::Nonterm(_) => {
        for child in &self.children {
          child.collect_fringe(out);
        }
      }
    }
  }

  /// Renders the tree as one s-expression line, like `(E (T id) + (T id))`.
  pub fn to_sexpr(&self, names: &impl SymbolNames) -> String {
    let mut buf = String::new();
    self.write_sexpr(names, &mut buf);
    buf
  }

  fn write_sexpr(&self, names: &impl SymbolNames, buf: &mut String) {
    match self.symbol {
      Symbol::Term(t) => buf.push_str(names.term_name(t)),
      Symbol::Nonterm(nt) => {
        buf.push('(');
        buf.push_str(names.nonterm_name(nt));
        for child in &self.children {
          buf.push(' ');
          child.write_sexpr(names, buf);
        }
        buf.push(')');
      }
    }
  }
}
