//! compute FIRST, FOLLOW, and NULLABLE sets.

use bit_set::BitSet;
use crate::grammar::Cfg;
use crate::symbol::{NontermId, Symbol};
use crate::Map;

/// FIRST/FOLLOW/NULLABLE of a grammar. Terminal sets are indexed by
/// `TermId::index()`; the endmarker occupies column `eof`. `nullable` is
/// indexed by `NontermId::index()`.
#[derive(Debug, Clone)]
pub struct Ffn {
  pub first: Map<NontermId, BitSet>,
  pub follow: Map<NontermId, BitSet>,
  pub nullable: BitSet,
  pub eof: usize,
}

pub fn compute(grammar: &Cfg) -> Ffn {
  let eof = grammar.alphabet().len();
  let nullable = compute_nullable(grammar);
  let first = compute_first(grammar, &nullable);
  let follow = compute_follow(grammar, &nullable, &first, eof);

  Ffn {
    first,
    follow,
    nullable,
    eof,
  }
}

impl Ffn {
  pub fn is_nullable(&self, nt: NontermId) -> bool {
    self.nullable.contains(nt.index())
  }

  /// FIRST of a symbol sequence; the flag is true iff the whole sequence is
  /// nullable.
  pub fn first_of(&self, symbols: &[Symbol]) -> (BitSet, bool) {
    let mut set = BitSet::new();
    let nullable = sequence_first_into(&mut set, &self.first, &self.nullable, symbols);
    (set, nullable)
  }

  /// Unions FIRST of `symbols` into `out`; if the sequence is nullable, also
  /// unions `tail` (the lookaheads of whatever may follow it). Returns
  /// whether the sequence was nullable.
  pub fn sequence_first(
    &self,
    out: &mut BitSet,
    symbols: &[Symbol],
    tail: Option<&BitSet>,
  ) -> bool {
    let nullable = sequence_first_into(out, &self.first, &self.nullable, symbols);
    if nullable {
      if let Some(tail) = tail {
        out.union_with(tail);
      }
    }
    nullable
  }
}

fn sequence_first_into(
  out: &mut BitSet,
  first: &Map<NontermId, BitSet>,
  nullable: &BitSet,
  symbols: &[Symbol],
) -> bool {
  for sym in symbols {
    match sym {
      Symbol::Term(t) => {
        out.insert(t.index());
        return false;
      }
      Symbol::Nonterm(nt) => {
        out.union_with(&first[nt]);
        if !nullable.contains(nt.index()) {
          return false;
        }
      }
    }
  }
  true
}

pub(crate) fn compute_nullable(grammar: &Cfg) -> BitSet {
  let mut nullable = BitSet::new();

  loop {
    let mut changed = false;

    for (nt, bodies) in grammar.rules() {
      if nullable.contains(nt.index()) {
        continue;
      }

      let nt_nullable = bodies.iter().any(|body| {
        body.iter().all(|sym| {
          match sym {
            Symbol::Term(_) => false,
            Symbol::Nonterm(other) => nullable.contains(other.index()),
          }
        })
      });

      if nt_nullable {
        nullable.insert(nt.index());
        changed = true;
      }
    }

    if !changed {
      break;
    }
  }

  nullable
}

fn compute_first(grammar: &Cfg, nullable: &BitSet) -> Map<NontermId, BitSet> {
  let mut first = Map::default();
  for (nt, _) in grammar.rules() {
    first.insert(nt, BitSet::new());
  }

  loop {
    let mut changed = false;

    for (nt, bodies) in grammar.rules() {
      let mut add = BitSet::new();
      for body in bodies {
        sequence_first_into(&mut add, &first, nullable, body);
      }

      let nt_first = first.get_mut(&nt).unwrap();
      if !add.is_subset(nt_first) {
        nt_first.union_with(&add);
        changed = true;
      }
    }

    if !changed {
      break;
    }
  }

  first
}

fn compute_follow(
  grammar: &Cfg,
  nullable: &BitSet,
  first: &Map<NontermId, BitSet>,
  eof: usize,
) -> Map<NontermId, BitSet> {
  let mut follow = Map::default();
  for (nt, _) in grammar.rules() {
    follow.insert(nt, BitSet::new());
  }
  follow.get_mut(&grammar.start()).unwrap().insert(eof);

  loop {
    let mut changed = false;

    for (head, bodies) in grammar.rules() {
      let head_follow = follow[&head].clone();

      for body in bodies {
        for (i, sym) in body.iter().enumerate() {
          let nt = match sym {
            Symbol::Term(_) => continue,
            Symbol::Nonterm(nt) => *nt,
          };

          let mut add = BitSet::new();
          let suffix_nullable =
            sequence_first_into(&mut add, first, nullable, &body[i + 1..]);
          if suffix_nullable {
            add.union_with(&head_follow);
          }

          let nt_follow = follow.get_mut(&nt).unwrap();
          if !add.is_subset(nt_follow) {
            nt_follow.union_with(&add);
            changed = true;
          }
        }
      }
    }

    if !changed {
      break;
    }
  }

  follow
}
