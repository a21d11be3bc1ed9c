//! left-recursion elimination.

use log::debug;
use crate::grammar::{Body, BodySet, Cfg};
use crate::symbol::{NontermId, Symbol};

impl Cfg {
  /// Removes all left recursion, direct and indirect, in rule order.
  pub fn eliminate_left_recursion(&mut self) {
    let order: Vec<NontermId> = self.nonterms().collect();
    self.eliminate_left_recursion_in(&order);
  }

  /// Removes all left recursion, processing nonterminals in the given
  /// order. For each A_i, bodies starting with an earlier A_j are first
  /// expanded by A_j's bodies, then immediate recursion on A_i is unrolled
  /// into a fresh primed tail nonterminal.
  pub fn eliminate_left_recursion_in(&mut self, order: &[NontermId]) {
    self.touch();

    for (i, &ai) in order.iter().enumerate() {
      if !self.prods.contains_key(&ai) {
        continue;
      }
      for &aj in &order[..i] {
        self.substitute_leading(ai, aj);
      }
      self.remove_immediate_left_recursion(ai);
    }

    self.remove_useless();
    debug_assert!(self.prods.contains_key(&self.start));
  }

  /// Replaces every body of `ai` of the form `aj γ` with `δ γ` for each
  /// body `δ` of `aj`.
  fn substitute_leading(&mut self, ai: NontermId, aj: NontermId) {
    let leading = Symbol::Nonterm(aj);
    if !self.prods[&ai].iter().any(|body| body.first() == Some(&leading)) {
      return;
    }

    let aj_bodies: Vec<Body> = self.prods[&aj].iter().cloned().collect();
    let old = std::mem::take(self.prods.get_mut(&ai).unwrap());

    let mut new = BodySet::default();
    for body in old {
      if body.first() == Some(&leading) {
        for delta in &aj_bodies {
          let mut expanded = delta.clone();
          expanded.extend_from_slice(&body[1..]);
          new.insert(expanded);
        }
      } else {
        new.insert(body);
      }
    }
    *self.prods.get_mut(&ai).unwrap() = new;
  }

  /// Rewrites `A -> A α | β` into `A -> β A'` and `A' -> α A' | ε`.
  /// A self-unit body `A -> A` derives nothing new and is dropped.
  fn remove_immediate_left_recursion(&mut self, a: NontermId) {
    let head = Symbol::Nonterm(a);
    let had_self_unit = self.prods[&a].contains(&vec![head]);

    let mut alphas: Vec<Body> = Vec::new();
    let mut betas: Vec<Body> = Vec::new();
    for body in &self.prods[&a] {
      if body.first() == Some(&head) {
        if body.len() > 1 {
          alphas.push(body[1..].to_vec());
        }
      } else {
        betas.push(body.clone());
      }
    }

    if alphas.is_empty() {
      if had_self_unit {
        let new: BodySet = betas.into_iter().collect();
        *self.prods.get_mut(&a).unwrap() = new;
      }
      return;
    }

    let base = self.nonterm_name_owned(a);
    let prime = self.mint_nonterm(&base);
    debug!("unrolling left recursion of {} into {}", base, self.nonterm_name_owned(prime));

    let mut a_bodies = BodySet::default();
    for mut beta in betas {
      beta.push(Symbol::Nonterm(prime));
      a_bodies.insert(beta);
    }
    *self.prods.get_mut(&a).unwrap() = a_bodies;

    let mut prime_bodies = BodySet::default();
    for mut alpha in alphas {
      alpha.push(Symbol::Nonterm(prime));
      prime_bodies.insert(alpha);
    }
    prime_bodies.insert(Vec::new());
    self.prods.insert(prime, prime_bodies);
  }
}
