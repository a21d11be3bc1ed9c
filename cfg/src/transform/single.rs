//! unit-production elimination.

use bit_set::BitSet;
use crate::grammar::{Body, BodySet, Cfg};
use crate::symbol::{NontermId, Symbol};
use crate::Map;

fn unit_target(body: &[Symbol]) -> Option<NontermId> {
  match body {
    [Symbol::Nonterm(nt)] => Some(*nt),
    _ => None,
  }
}

impl Cfg {
  /// Removes unit productions `A -> B`. Epsilon productions are eliminated
  /// first, since a nullable tail can turn a longer body into a unit one.
  /// Each head then absorbs the non-unit bodies of its whole unit closure;
  /// unit cycles collapse instead of looping.
  pub fn eliminate_single_productions(&mut self) {
    self.eliminate_epsilon_productions();

    let snapshot: Map<NontermId, Vec<Body>> = self
      .rules()
      .map(|(nt, bodies)| (nt, bodies.iter().cloned().collect()))
      .collect();

    let heads: Vec<_> = self.nonterms().collect();
    for head in heads {
      let mut visited = BitSet::new();
      visited.insert(head.index());

      let mut queue = Vec::new();
      let mut new = BodySet::default();
      for body in &snapshot[&head] {
        match unit_target(body) {
          Some(target) => {
            if visited.insert(target.index()) {
              queue.push(target);
            }
          }
          None => {
            new.insert(body.clone());
          }
        }
      }

      while let Some(nt) = queue.pop() {
        for body in &snapshot[&nt] {
          match unit_target(body) {
            Some(target) => {
              if visited.insert(target.index()) {
                queue.push(target);
              }
            }
            None => {
              new.insert(body.clone());
            }
          }
        }
      }

      *self.prods.get_mut(&head).unwrap() = new;
    }

    self.remove_useless();
  }
}
