//! LALR(1): the LR(0) collection with per-item lookaheads attached after
//! the fact, via spontaneous generation and propagation.

use std::collections::VecDeque;
use bit_set::BitSet;
use cfg::{Ffn, Map};
use crate::builder::{closure, Builder, Item, State};
use crate::error::LrConflict;
use crate::flat::FlatGrammar;
use crate::item::symbol_after_dot;
use crate::slr::Lr0Computation;
use crate::tables::{gen_tables, LrTables, ReduceLookaheads};

pub(crate) fn build_tables(
  grammar: &FlatGrammar,
  ffn: &Ffn,
) -> Result<(LrTables, usize), LrConflict> {
  let mut builder = Builder::<Lr0Computation>::new(grammar, ffn);
  builder.gen_states();
  let mut states = builder.into_states();

  attach_lookaheads(grammar, ffn, &mut states);
  let tables = gen_tables(grammar, ffn, &states, ReduceLookaheads::PerItem)?;
  Ok((tables, states.len()))
}

/// Computes kernel lookaheads over the LR(0) collection.
///
/// Each kernel item is closed in isolation under a sentinel lookahead that
/// stands for "whatever the kernel item will carry". A lookahead reaching a
/// successor kernel as a real terminal is spontaneous; the sentinel reaching
/// it records a propagation edge, and a worklist then flows lookaheads along
/// the edges to a fixed point. Finally every state's closure is rebuilt from
/// the now-annotated kernel.
fn attach_lookaheads(grammar: &FlatGrammar, ffn: &Ffn, states: &mut Vec<State>) {
  let sentinel = grammar.eof + 1;

  let mut propagations: Map<(usize, usize), Vec<(usize, usize)>> = Map::default();

  for s in 0..states.len() {
    for i in 0..states[s].kernel_len {
      let mut seed_las = BitSet::new();
      seed_las.insert(sentinel);
      let probe = vec![Item {
        key: states[s].items[i].key,
        lookaheads: seed_las,
      }];

      for item in closure(grammar, ffn, &probe, true) {
        let sym = match symbol_after_dot(grammar, item.key) {
          Some(sym) => sym,
          None => continue,
        };
        let t = states[s].transitions[&sym] as usize;
        let j = kernel_index(&states[t], item.key + 1);

        for la in item.lookaheads.iter() {
          if la == sentinel {
            propagations
              .entry((s, i))
              .or_insert_with(Vec::new)
              .push((t, j));
          } else {
            states[t].items[j].lookaheads.insert(la);
          }
        }
      }
    }
  }

  // the accept item starts out with the endmarker
  states[0].items[0].lookaheads.insert(grammar.eof);

  let mut queue: VecDeque<(usize, usize)> = states
    .iter()
    .enumerate()
    .flat_map(|(s, state)| {
      (0..state.kernel_len)
        .filter(|i| !state.items[*i].lookaheads.is_empty())
        .map(move |i| (s, i))
        .collect::<Vec<_>>()
    })
    .collect();

  while let Some((s, i)) = queue.pop_front() {
    let targets = match propagations.get(&(s, i)) {
      Some(targets) => targets.clone(),
      None => continue,
    };
    let source = states[s].items[i].lookaheads.clone();
    for (t, j) in targets {
      let dest = &mut states[t].items[j].lookaheads;
      if !source.is_subset(dest) {
        dest.union_with(&source);
        queue.push_back((t, j));
      }
    }
  }

  for state in states.iter_mut() {
    let kernel = state.items[..state.kernel_len].to_vec();
    state.items = closure(grammar, ffn, &kernel, true);
  }
}

fn kernel_index(state: &State, key: u32) -> usize {
  state
    .kernel()
    .binary_search_by_key(&key, |item| item.key)
    .expect("advanced item missing from successor kernel")
}
