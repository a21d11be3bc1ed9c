//! ACTION/GOTO table generation with strict conflict rejection.

use bit_set::BitSet;
use cfg::Ffn;
use log::debug;
use crate::builder::State;
use crate::error::{ConflictActions, LrConflict};
use crate::flat::FlatGrammar;
use crate::item::{decode_item, fmt_item};

/// Packed LR tables.
///
/// ACTION cells: positive is shift to `cell - 1`, negative is reduce by
/// `!cell`, `i32::MIN` is accept, 0 is error. GOTO cells: `target + 1`,
/// with 0 meaning no transition.
#[derive(Debug, Clone)]
pub struct LrTables {
  pub action: Vec<Vec<i32>>,
  pub goto: Vec<Vec<u32>>,
}

pub const ACCEPT: i32 = i32::MIN;

/// Where reduce lookaheads come from: FOLLOW of the head (SLR) or the
/// completed item's own set (canonical LR(1) and LALR(1)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceLookaheads {
  Follow,
  PerItem,
}

pub(crate) fn gen_tables(
  grammar: &FlatGrammar,
  ffn: &Ffn,
  states: &[State],
  mode: ReduceLookaheads,
) -> Result<LrTables, LrConflict> {
  let ncols = grammar.eof + 1;
  let mut action = vec![vec![0i32; ncols]; states.len()];
  let mut goto = vec![vec![0u32; grammar.num_nt_slots]; states.len()];

  for (ix, state) in states.iter().enumerate() {
    for (sym, target) in &state.transitions {
      match sym {
        cfg::Symbol::Term(t) => action[ix][t.index()] = *target as i32 + 1,
        cfg::Symbol::Nonterm(nt) => goto[ix][nt.index()] = *target + 1,
      }
    }

    for item in &state.items {
      let (prod_ix, dot) = decode_item(item.key, grammar.max_nsym_p1);
      let prod = &grammar.prods[prod_ix];
      if (dot as usize) < prod.symbols.len() {
        continue;
      }

      if prod_ix == grammar.accept_prod {
        set_action(grammar, states, &mut action[ix], ix, grammar.eof, ACCEPT)?;
        continue;
      }

      let lookaheads: &BitSet = match mode {
        ReduceLookaheads::Follow => &ffn.follow[&prod.nt],
        ReduceLookaheads::PerItem => &item.lookaheads,
      };
      for la in lookaheads.iter().filter(|la| *la <= grammar.eof) {
        set_action(grammar, states, &mut action[ix], ix, la, !(prod_ix as i32))?;
      }
    }
  }

  debug!(
    "generated tables: {} states, {} terminal columns",
    states.len(),
    ncols
  );
  Ok(LrTables { action, goto })
}

fn set_action(
  grammar: &FlatGrammar,
  states: &[State],
  row: &mut [i32],
  state_ix: usize,
  col: usize,
  new: i32,
) -> Result<(), LrConflict> {
  let old = row[col];
  if old == 0 || old == new {
    row[col] = new;
    return Ok(());
  }
  Err(conflict(grammar, states, state_ix, col, old, new))
}

fn conflict(
  grammar: &FlatGrammar,
  states: &[State],
  state_ix: usize,
  col: usize,
  old: i32,
  new: i32,
) -> LrConflict {
  // shifts are placed before any reduce, so `new` is always a reduce
  let actions = if old > 0 {
    ConflictActions::ShiftReduce {
      reduce: reduce_string(grammar, new),
    }
  } else {
    ConflictActions::ReduceReduce {
      reduce1: reduce_string(grammar, old),
      reduce2: reduce_string(grammar, new),
    }
  };

  let state = &states[state_ix];
  let items = state
    .items
    .iter()
    .map(|item| {
      if item.lookaheads.is_empty() {
        fmt_item(grammar, item.key, None)
      } else {
        fmt_item(grammar, item.key, Some(&item.lookaheads))
      }
    })
    .collect();

  LrConflict {
    state: state_ix as u32,
    lookahead: grammar.term_col_name(col).to_owned(),
    items,
    actions,
  }
}

fn reduce_string(grammar: &FlatGrammar, action: i32) -> String {
  if action == ACCEPT {
    grammar.prod_string(grammar.accept_prod)
  } else {
    grammar.prod_string(!action as usize)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cfg::{Alphabet, Cfg};
  use crate::builder::Builder;
  use crate::slr::Lr0Computation;
  use pretty_assertions::assert_eq;

  fn tables_for(grammar: &mut Cfg, mode: ReduceLookaheads) -> Result<LrTables, LrConflict> {
    let ffn = grammar.ffn().clone();
    let flat = FlatGrammar::from_cfg(grammar);
    let mut builder = Builder::<Lr0Computation>::new(&flat, &ffn);
    builder.gen_states();
    gen_tables(&flat, &ffn, &builder.into_states(), mode)
  }

  #[test]
  fn accept_is_reachable_only_at_the_endmarker() {
    let mut grammar = Cfg::builder(Alphabet::new(vec!["a"]), "S")
      .rule("S", &[&["a"]])
      .build()
      .unwrap();

    let tables = tables_for(&mut grammar, ReduceLookaheads::Follow).unwrap();
    let eof = 1;

    let accepts: Vec<(usize, usize)> = tables
      .action
      .iter()
      .enumerate()
      .flat_map(|(s, row)| {
        row
          .iter()
          .enumerate()
          .filter(|(_, cell)| **cell == ACCEPT)
          .map(move |(c, _)| (s, c))
          .collect::<Vec<_>>()
      })
      .collect();

    assert_eq!(accepts.len(), 1);
    assert_eq!(accepts[0].1, eof);
  }

  #[test]
  fn ambiguous_grammar_reports_the_first_conflict() {
    // E -> E + E is ambiguous; the + column gets both a shift and a reduce
    let mut grammar = Cfg::builder(Alphabet::new(vec!["+", "id"]), "E")
      .rule("E", &[&["E", "+", "E"], &["id"]])
      .build()
      .unwrap();

    let conflict = tables_for(&mut grammar, ReduceLookaheads::Follow).unwrap_err();
    match &conflict.actions {
      ConflictActions::ShiftReduce { reduce } => {
        assert_eq!(reduce, "E -> E + E");
      }
      other => panic!("expected a shift-reduce conflict, got {:?}", other),
    }
    assert!(!conflict.items.is_empty());
  }
}
