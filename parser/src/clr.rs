//! canonical LR(1): states split by exact lookahead sets.

use cfg::Ffn;
use crate::builder::{Builder, KernelItemSet, LrComputation, State, StateStore};
use crate::error::LrConflict;
use crate::flat::FlatGrammar;
use crate::tables::{gen_tables, LrTables, ReduceLookaheads};

/// Identifies states by kernel item keys together with their lookahead
/// sets, so kernels that differ only in lookaheads become distinct states.
pub struct ClrComputation;

impl LrComputation for ClrComputation {
  const LOOKAHEADS: bool = true;

  type StateKey = Vec<(u32, Vec<usize>)>;

  fn store_state(
    states: &mut StateStore<Self::StateKey>,
    kernel: KernelItemSet,
  ) -> (u32, bool) {
    let key: Self::StateKey = kernel
      .iter()
      .map(|item| (item.key, item.lookaheads.iter().collect()))
      .collect();
    if let Some(ix) = states.get_index_of(&key) {
      return (ix as u32, false);
    }
    let state = State {
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
  let mut builder = Builder::<ClrComputation>::new(grammar, ffn);
  builder.gen_states();
  let states = builder.into_states();
  let tables = gen_tables(grammar, ffn, &states, ReduceLookaheads::PerItem)?;
  Ok((tables, states.len()))
}
