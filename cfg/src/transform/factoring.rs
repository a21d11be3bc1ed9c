//! left factoring.

use std::collections::VecDeque;
use crate::grammar::{Body, BodySet, Cfg};
use crate::symbol::{NontermId, Symbol};

fn common_prefix_len(a: &[Symbol], b: &[Symbol]) -> usize {
  a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl Cfg {
  /// Left-factors the grammar: wherever two or more bodies of a head share
  /// a prefix, the longest such prefix is hoisted into `A -> prefix A'` and
  /// the divergent suffixes move to the fresh `A'`. Repeats until no head
  /// has a shared prefix left.
  pub fn left_factoring(&mut self) {
    self.touch();

    let mut queue: VecDeque<NontermId> = self.nonterms().collect();
    while let Some(head) = queue.pop_front() {
      if let Some(fresh) = self.factor_once(head) {
        queue.push_back(head);
        queue.push_back(fresh);
      }
    }
  }

  fn factor_once(&mut self, head: NontermId) -> Option<NontermId> {
    let bodies: Vec<Body> = self.prods[&head].iter().cloned().collect();

    let mut best = 0;
    let mut prefix: &[Symbol] = &[];
    for (i, a) in bodies.iter().enumerate() {
      for b in &bodies[i + 1..] {
        let len = common_prefix_len(a, b);
        if len > best {
          best = len;
          prefix = &a[..len];
        }
      }
    }
    if best == 0 {
      return None;
    }
    let prefix = prefix.to_vec();

    let base = self.nonterm_name_owned(head);
    let fresh = self.mint_nonterm(&base);

    let mut kept = BodySet::default();
    let mut suffixes = BodySet::default();
    let mut factored = prefix.clone();
    factored.push(Symbol::Nonterm(fresh));
    for body in bodies {
      if body.starts_with(&prefix) {
        suffixes.insert(body[prefix.len()..].to_vec());
        kept.insert(factored.clone());
      } else {
        kept.insert(body);
      }
    }

    *self.prods.get_mut(&head).unwrap() = kept;
    self.prods.insert(fresh, suffixes);
    Some(fresh)
  }
}
