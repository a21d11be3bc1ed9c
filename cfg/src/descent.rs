//! backtracking recursive-descent acceptance oracle.
//!
//! Tries production bodies in rule order against a sentential form kept as a
//! stack, backtracking at the nearest choice point on a mismatch. A guard on
//! (nonterminal, position) pairs prunes expansion chains that consume no
//! input, so the oracle terminates on every grammar; a left-recursive
//! nonterminal fails fast instead of looping, which means the oracle is only
//! an authority for grammars without left recursion.

use fnv::FnvHashSet;
use crate::alphabet::TermId;
use crate::grammar::Cfg;
use crate::symbol::{NontermId, Symbol};

impl Cfg {
  /// Whether the grammar derives `input`. Exponential in the worst case;
  /// meant as a cross-check for the table-driven parsers, not for use on
  /// real input.
  pub fn recursive_descent_parse(&self, input: &[TermId]) -> bool {
    if input.iter().any(|t| !self.alphabet.contains(*t)) {
      return false;
    }
    let mut busy = FnvHashSet::default();
    self.derive(vec![Symbol::Nonterm(self.start)], input, 0, &mut busy)
  }

  // the sentential form is stored reversed: leftmost symbol on top
  fn derive(
    &self,
    mut stack: Vec<Symbol>,
    input: &[TermId],
    pos: usize,
    busy: &mut FnvHashSet<(NontermId, usize)>,
  ) -> bool {
    match stack.pop() {
      None => pos == input.len(),
      Some(Symbol::Term(t)) => {
        pos < input.len() && input[pos] == t && self.derive(stack, input, pos + 1, busy)
      }
      Some(Symbol::Nonterm(nt)) => {
        if !busy.insert((nt, pos)) {
          return false;
        }
        let mut accepted = false;
        for body in &self.prods[&nt] {
          let mut next = stack.clone();
          next.extend(body.iter().rev().copied());
          if self.derive(next, input, pos, busy) {
            accepted = true;
            break;
          }
        }
        busy.remove(&(nt, pos));
        accepted
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Alphabet;

  fn terms(grammar: &Cfg, input: &str) -> Vec<TermId> {
    input
      .split_whitespace()
      .map(|name| grammar.alphabet().term(name).unwrap())
      .collect()
  }

  fn accepts(grammar: &Cfg, input: &str) -> bool {
    grammar.recursive_descent_parse(&terms(grammar, input))
  }

  #[test]
  fn balanced_pairs() {
    let grammar = Cfg::builder(Alphabet::new(vec!["a", "b"]), "S")
      .rule("S", &[&["a", "S", "b", "S"], &["b", "S", "a", "S"], &[]])
      .build()
      .unwrap();

    assert!(accepts(&grammar, ""));
    assert!(accepts(&grammar, "a b"));
    assert!(accepts(&grammar, "b a a b"));
    assert!(accepts(&grammar, "a a b b"));
    assert!(!accepts(&grammar, "a"));
    assert!(!accepts(&grammar, "a a b"));
    assert!(!accepts(&grammar, "b b b a"));
  }

  #[test]
  fn backtracks_across_alternatives() {
    // the first body is a dead end for "i b t a e a"; the oracle has to
    // back out of it and retry with the longer one
    let grammar = Cfg::builder(Alphabet::new(vec!["i", "t", "e", "a", "b"]), "S")
      .rule("S", &[&["i", "E", "t", "S"], &["i", "E", "t", "S", "e", "S"], &["a"]])
      .rule("E", &[&["b"]])
      .build()
      .unwrap();

    assert!(accepts(&grammar, "a"));
    assert!(accepts(&grammar, "i b t a"));
    assert!(accepts(&grammar, "i b t a e a"));
    assert!(accepts(&grammar, "i b t i b t a e a"));
    assert!(!accepts(&grammar, "i b t"));
    assert!(!accepts(&grammar, "i b t a e"));
  }

  #[test]
  fn rejects_terms_outside_the_alphabet() {
    let grammar = Cfg::builder(Alphabet::new(vec!["a"]), "S")
      .rule("S", &[&["a"]])
      .build()
      .unwrap();

    assert!(!grammar.recursive_descent_parse(&[grammar.alphabet().endmarker()]));
    assert!(!grammar.recursive_descent_parse(&[TermId::EPSILON]));
  }
}
