//! epsilon-production elimination.

use itertools::Itertools;
use crate::ffn;
use crate::grammar::{BodySet, Cfg};
use crate::symbol::Symbol;

impl Cfg {
  /// Removes epsilon productions. Every body gets a variant for each subset
  /// of its nullable occurrences deleted; empty variants are discarded. If
  /// the whole grammar derives the empty string, a single `S -> ε` body on
  /// the start symbol keeps it derivable.
  pub fn eliminate_epsilon_productions(&mut self) {
    self.touch();

    let nullable = ffn::compute_nullable(self);
    let start_nullable = nullable.contains(self.start.index());

    let heads: Vec<_> = self.nonterms().collect();
    for head in heads {
      let old = std::mem::take(self.prods.get_mut(&head).unwrap());

      let mut new = BodySet::default();
      for body in old {
        if body.is_empty() {
          continue;
        }
        let positions: Vec<usize> = body
          .iter()
          .enumerate()
          .filter_map(|(i, sym)| {
            match sym {
              Symbol::Nonterm(nt) if nullable.contains(nt.index()) => Some(i),
              _ => None,
            }
          })
          .collect();

        for dropped in positions.iter().copied().powerset() {
          let variant: Vec<Symbol> = body
            .iter()
            .enumerate()
            .filter(|(i, _)| !dropped.contains(i))
            .map(|(_, sym)| *sym)
            .collect();
          if !variant.is_empty() {
            new.insert(variant);
          }
        }
      }

      *self.prods.get_mut(&head).unwrap() = new;
    }

    if start_nullable {
      self.prods.get_mut(&self.start).unwrap().insert(Vec::new());
    }

    self.prods.retain(|_, bodies| !bodies.is_empty());
    self.remove_useless();
  }
}
