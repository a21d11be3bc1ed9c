//! LR items, packed into integer keys.
//!
//! An item `(prod, dot)` is encoded as `prod * max_nsym_p1 + dot`, so items
//! order first by production and then by dot position, and advancing the dot
//! is `key + 1`.

use bit_set::BitSet;
use cfg::Symbol;
use crate::flat::FlatGrammar;

pub fn encode_item(prod_ix: usize, dot: u32, max_nsym_p1: u32) -> u32 {
  prod_ix as u32 * max_nsym_p1 + dot
}

pub fn decode_item(key: u32, max_nsym_p1: u32) -> (usize, u32) {
  ((key / max_nsym_p1) as usize, key % max_nsym_p1)
}

/// Renders an item like `E -> E . + T      +, $`.
pub fn fmt_item(grammar: &FlatGrammar, key: u32, lookaheads: Option<&BitSet>) -> String {
  use cfg::SymbolNames;

  let (prod_ix, dot) = decode_item(key, grammar.max_nsym_p1);
  let prod = &grammar.prods[prod_ix];

  let mut buf = format!("{} ->", grammar.nonterm_name(prod.nt));
  for (i, sym) in prod.symbols.iter().enumerate() {
    if i == dot as usize {
      buf.push_str(" .");
    }
    buf.push(' ');
    buf.push_str(grammar.symbol_name(*sym));
  }
  if dot as usize == prod.symbols.len() {
    buf.push_str(" .");
  }

  if let Some(lookaheads) = lookaheads {
    let names = lookaheads
      .iter()
      .filter(|col| *col <= grammar.eof)
      .map(|col| grammar.term_col_name(col))
      .collect::<Vec<_>>()
      .join(", ");
    buf = format!("{:40} {}", buf, names);
  }
  buf
}

/// The symbol right after the dot, if the item is not completed.
pub fn symbol_after_dot(grammar: &FlatGrammar, key: u32) -> Option<Symbol> {
  let (prod_ix, dot) = decode_item(key, grammar.max_nsym_p1);
  grammar.prods[prod_ix].symbols.get(dot as usize).copied()
}
