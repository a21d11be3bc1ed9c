//! Chomsky normal form.

use crate::alphabet::TermId;
use crate::grammar::{BodySet, Cfg};
use crate::symbol::{NontermId, Symbol};
use crate::Map;

impl Cfg {
  /// Converts to Chomsky normal form: every body is a single terminal or a
  /// pair of nonterminals, except a possible `S -> ε` when the language
  /// contains the empty string. Runs epsilon and unit elimination first.
  pub fn to_cnf(&mut self) {
    self.eliminate_single_productions();
    self.touch();

    self.wrap_terminals();
    self.binarize();

    self.remove_useless();
    debug_assert!(self.is_cnf());
  }

  /// Whether the grammar already satisfies the CNF body shapes.
  pub fn is_cnf(&self) -> bool {
    self.rules().all(|(head, bodies)| {
      bodies.iter().all(|body| {
        match body.as_slice() {
          [] => head == self.start,
          [Symbol::Term(_)] => true,
          [Symbol::Nonterm(_), Symbol::Nonterm(_)] => true,
          _ => false,
        }
      })
    })
  }

  /// Replaces terminals inside bodies of length two or more by fresh
  /// wrapper nonterminals `<t> -> t`, one wrapper per terminal.
  fn wrap_terminals(&mut self) {
    let mut wrappers: Map<TermId, NontermId> = Map::default();

    let heads: Vec<_> = self.nonterms().collect();
    for head in heads {
      let old = std::mem::take(self.prods.get_mut(&head).unwrap());

      let mut new = BodySet::default();
      for mut body in old {
        if body.len() >= 2 {
          for sym in body.iter_mut() {
            if let Symbol::Term(t) = *sym {
              let nt = match wrappers.get(&t) {
                Some(nt) => *nt,
                None => {
                  let name = format!("<{}>", self.alphabet.name(t));
                  let nt = self.mint_nonterm(&name);
                  wrappers.insert(t, nt);
                  nt
                }
              };
              *sym = Symbol::Nonterm(nt);
            }
          }
        }
        new.insert(body);
      }

      *self.prods.get_mut(&head).unwrap() = new;
    }

    for (t, nt) in wrappers {
      let mut bodies = BodySet::default();
      bodies.insert(vec![Symbol::Term(t)]);
      self.prods.insert(nt, bodies);
    }
  }

  /// Splits bodies of length three or more into chains of pairs, peeling
  /// the first symbol into a fresh nonterminal each step.
  fn binarize(&mut self) {
    let heads: Vec<_> = self.nonterms().collect();
    for head in heads {
      if self.prods[&head].iter().all(|body| body.len() <= 2) {
        continue;
      }
      let base = self.nonterm_name_owned(head);
      let old = std::mem::take(self.prods.get_mut(&head).unwrap());

      let mut new = BodySet::default();
      for body in old {
        if body.len() <= 2 {
          new.insert(body);
          continue;
        }

        let mut symbols = body;
        let mut owner: Option<NontermId> = None;
        while symbols.len() > 2 {
          let first = symbols.remove(0);
          let fresh = self.mint_nonterm(&base);
          let link = vec![first, Symbol::Nonterm(fresh)];
          match owner {
            None => {
              new.insert(link);
            }
            Some(nt) => {
              let mut bodies = BodySet::default();
              bodies.insert(link);
              self.prods.insert(nt, bodies);
            }
          }
          owner = Some(fresh);
        }
        if let Some(nt) = owner {
          let mut bodies = BodySet::default();
          bodies.insert(symbols);
          self.prods.insert(nt, bodies);
        }
      }

      *self.prods.get_mut(&head).unwrap() = new;
    }
  }
}
