//! SLR(1): the LR(0) collection with FOLLOW-based reductions.

use cfg::Ffn;
use crate::builder::{Builder, KernelItemSet, LrComputation, StateStore};
use crate::error::LrConflict;
use crate::flat::FlatGrammar;
use crate::tables::{gen_tables, LrTables, ReduceLookaheads};

/// Identifies states by their kernel item keys alone; lookaheads play no
/// part in the automaton.
pub struct Lr0Computation;

impl LrComputation for Lr0Computation {
  const LOOKAHEADS: bool = false;

  type StateKey = Vec<u32>;

  fn store_state(states: &mut StateStore<Vec<u32>>, kernel: KernelItemSet) -> (u32, bool) {
    let key: Vec<u32> = kernel.iter().map(|item| item.key).collect();
    if let Some(ix) = states.get_index_of(&key) {
      return (ix as u32, false);
    }
    let state = crate::builder::State {
      kernel_len: kernel.len(),
      items: kernel,
      transitions: cfg::Map::default(),
    };
    let (ix, _) = states.insert_full(key, state);
    (ix as u32, true)
  }
}

pub(crate) fn build_tables(
  grammar: &FlatGrammar,
  ffn: &Ffn,
) -> Result<(LrTables, usize), LrConflict> {
  let mut builder = Builder::<Lr0Computation>::new(grammar, ffn);
  builder.gen_states();
  let states = builder.into_states();
  let tables = gen_tables(grammar, ffn, &states, ReduceLookaheads::Follow)?;
  Ok((tables, states.len()))
}
