//! canonical collection construction, generic over the LR flavor.
//!
//! The subset-construction loop, closure computation, and transition
//! grouping are shared; what distinguishes LR(0) from canonical LR(1) is
//! only how a kernel is identified when deciding whether a successor state
//! already exists. That choice is the `LrComputation` strategy.

use std::collections::VecDeque;
use std::hash::Hash;
use bit_set::BitSet;
use cfg::{Ffn, Map, Symbol};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use log::debug;
use crate::flat::FlatGrammar;
use crate::item::{decode_item, encode_item};

/// An LR item with its lookahead set. LR(0) flavors leave the set empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
  pub key: u32,
  pub lookaheads: BitSet,
}

/// Kernel items of a state, sorted by key.
pub type KernelItemSet = Vec<Item>;

#[derive(Debug, Clone)]
pub struct State {
  /// Kernel items first, then closure items.
  pub items: Vec<Item>,
  pub kernel_len: usize,
  pub transitions: Map<Symbol, u32>,
}

impl State {
  pub fn kernel(&self) -> &[Item] {
    &self.items[..self.kernel_len]
  }
}

/// States stored by kernel identity; the map index is the state number.
pub type StateStore<K> = IndexMap<K, State, FnvBuildHasher>;

/// How one LR flavor identifies and stores states.
pub trait LrComputation {
  /// Whether closure items carry lookaheads.
  const LOOKAHEADS: bool;

  type StateKey: Eq + Hash;

  /// Stores a kernel, or finds the state that already owns it. Returns the
  /// state number and whether the state is new and has to be processed.
  fn store_state(states: &mut StateStore<Self::StateKey>, kernel: KernelItemSet) -> (u32, bool);
}

pub struct Builder<'a, T: LrComputation> {
  pub grammar: &'a FlatGrammar,
  pub ffn: &'a Ffn,
  pub states: StateStore<T::StateKey>,
}

impl<'a, T: LrComputation> Builder<'a, T> {
  pub fn new(grammar: &'a FlatGrammar, ffn: &'a Ffn) -> Builder<'a, T> {
    Builder {
      grammar,
      ffn,
      states: StateStore::default(),
    }
  }

  /// Runs the subset construction from the accept item. The start state is
  /// number 0.
  pub fn gen_states(&mut self) {
    let mut start_las = BitSet::new();
    start_las.insert(self.grammar.eof);
    let start_kernel = vec![Item {
      key: encode_item(self.grammar.accept_prod, 0, self.grammar.max_nsym_p1),
      lookaheads: if T::LOOKAHEADS { start_las } else { BitSet::new() },
    }];

    let mut queue = VecDeque::new();
    let (start, _) = T::store_state(&mut self.states, start_kernel);
    queue.push_back(start);

    while let Some(ix) = queue.pop_front() {
      let kernel = {
        let state = &self.states[ix as usize];
        state.items[..state.kernel_len].to_vec()
      };
      let items = closure(self.grammar, self.ffn, &kernel, T::LOOKAHEADS);

      let mut transitions = Map::default();
      for (sym, succ_kernel) in group_transitions(self.grammar, &items) {
        let (succ, new) = T::store_state(&mut self.states, succ_kernel);
        transitions.insert(sym, succ);
        if new {
          queue.push_back(succ);
        }
      }

      let state = &mut self.states[ix as usize];
      state.items = items;
      state.transitions = transitions;
    }

    debug!("generated {} states", self.states.len());
  }

  pub fn num_states(&self) -> usize {
    self.states.len()
  }

  /// Consumes the builder, yielding the states in state-number order.
  pub fn into_states(self) -> Vec<State> {
    self.states.into_iter().map(|(_, state)| state).collect()
  }
}

/// Closes a kernel: for every dot before a nonterminal, all of that
/// nonterminal's productions join with the dot at the start. With
/// lookaheads, an expanded item gets FIRST of the suffix after the
/// nonterminal, plus the expanding item's own lookaheads when the suffix is
/// nullable; lookahead growth re-propagates until the set is stable.
pub fn closure(
  grammar: &FlatGrammar,
  ffn: &Ffn,
  kernel: &[Item],
  with_lookaheads: bool,
) -> Vec<Item> {
  let mut items: Vec<Item> = kernel.to_vec();
  let mut index_of: Map<u32, usize> = items
    .iter()
    .enumerate()
    .map(|(i, item)| (item.key, i))
    .collect();

  let mut queue: VecDeque<usize> = (0..items.len()).collect();
  while let Some(i) = queue.pop_front() {
    let (prod_ix, dot) = decode_item(items[i].key, grammar.max_nsym_p1);
    let symbols = &grammar.prods[prod_ix].symbols;
    let nt = match symbols.get(dot as usize) {
      Some(Symbol::Nonterm(nt)) => *nt,
      _ => continue,
    };

    let mut las = BitSet::new();
    if with_lookaheads {
      ffn.sequence_first(
        &mut las,
        &symbols[dot as usize + 1..],
        Some(&items[i].lookaheads),
      );
    }

    for expanded in grammar.nt_ranges[&nt].clone() {
      let key = encode_item(expanded, 0, grammar.max_nsym_p1);
      match index_of.get(&key) {
        Some(&j) => {
          if with_lookaheads && !las.is_subset(&items[j].lookaheads) {
            items[j].lookaheads.union_with(&las);
            queue.push_back(j);
          }
        }
        None => {
          index_of.insert(key, items.len());
          queue.push_back(items.len());
          items.push(Item {
            key,
            lookaheads: las.clone(),
          });
        }
      }
    }
  }

  items
}

/// Groups the items of a closed state by the symbol after the dot, advancing
/// each over it. Kernels come out sorted by item key, so equal item sets
/// compare equal.
fn group_transitions(grammar: &FlatGrammar, items: &[Item]) -> Vec<(Symbol, KernelItemSet)> {
  let mut by_symbol: Map<Symbol, KernelItemSet> = Map::default();
  for item in items {
    let (prod_ix, dot) = decode_item(item.key, grammar.max_nsym_p1);
    let sym = match grammar.prods[prod_ix].symbols.get(dot as usize) {
      Some(sym) => *sym,
      None => continue,
    };
    by_symbol
      .entry(sym)
      .or_insert_with(Vec::new)
      .push(Item {
        key: item.key + 1,
        lookaheads: item.lookaheads.clone(),
      });
  }

  by_symbol
    .into_iter()
    .map(|(sym, mut kernel)| {
      kernel.sort_by_key(|item| item.key);
      (sym, kernel)
    })
    .collect()
}
