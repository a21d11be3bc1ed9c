//! LL(1) predictive table construction.

use bit_set::BitSet;
use cfg::{Ffn, Map, NontermId};
use crate::error::Ll1Conflict;
use crate::flat::FlatGrammar;

/// The predictive table: production to expand, by (head, lookahead column).
#[derive(Debug, Clone)]
pub struct LlTable {
  entries: Map<(NontermId, usize), usize>,
}

impl LlTable {
  pub fn entry(&self, nt: NontermId, col: usize) -> Option<usize> {
    self.entries.get(&(nt, col)).copied()
  }

  /// Lookahead names a head can make progress on; the expected set of a
  /// syntax error.
  pub fn expected(&self, grammar: &FlatGrammar, nt: NontermId) -> Vec<String> {
    (0..=grammar.eof)
      .filter(|col| self.entries.contains_key(&(nt, *col)))
      .map(|col| grammar.term_col_name(col).to_owned())
      .collect()
  }
}

/// A production claims every column in FIRST of its body, and every column
/// in FOLLOW of its head when the body is nullable. Two claims on one cell
/// mean the grammar is not LL(1).
pub(crate) fn gen_ll_table(grammar: &FlatGrammar, ffn: &Ffn) -> Result<LlTable, Ll1Conflict> {
  use cfg::SymbolNames;

  let mut entries: Map<(NontermId, usize), usize> = Map::default();

  for (prod_ix, prod) in grammar.prods.iter().enumerate() {
    if prod_ix == grammar.accept_prod {
      continue;
    }

    let mut las = BitSet::new();
    ffn.sequence_first(&mut las, &prod.symbols, Some(&ffn.follow[&prod.nt]));

    for col in las.iter() {
      match entries.get(&(prod.nt, col)) {
        Some(&other) if other != prod_ix => {
          return Err(Ll1Conflict {
            head: grammar.nonterm_name(prod.nt).to_owned(),
            lookahead: grammar.term_col_name(col).to_owned(),
            prod1: grammar.prod_string(other),
            prod2: grammar.prod_string(prod_ix),
          });
        }
        _ => {
          entries.insert((prod.nt, col), prod_ix);
        }
      }
    }
  }

  Ok(LlTable { entries })
}

#[cfg(test)]
mod tests {
  use super::*;
  use cfg::{Alphabet, Cfg};
  use pretty_assertions::assert_eq;

  fn table_for(grammar: &mut Cfg) -> Result<LlTable, Ll1Conflict> {
    let ffn = grammar.ffn().clone();
    let flat = FlatGrammar::from_cfg(grammar);
    gen_ll_table(&flat, &ffn)
  }

  #[test]
  fn factored_expression_grammar_is_ll1() {
    let mut grammar = Cfg::builder(Alphabet::new(vec!["+", "*", "(", ")", "id"]), "E")
      .rule("E", &[&["T", "E'"]])
      .rule("E'", &[&["+", "T", "E'"], &[]])
      .rule("T", &[&["F", "T'"]])
      .rule("T'", &[&["*", "F", "T'"], &[]])
      .rule("F", &[&["(", "E", ")"], &["id"]])
      .build()
      .unwrap();

    let ffn = grammar.ffn().clone();
    let flat = FlatGrammar::from_cfg(&grammar);
    let table = gen_ll_table(&flat, &ffn).unwrap();

    // the nullable E' expands to ε on ) and $, and to its + body on +
    let e1 = grammar.nonterm("E'").unwrap();
    let rparen = grammar.alphabet().term(")").unwrap();
    let plus = grammar.alphabet().term("+").unwrap();
    let empty = table.entry(e1, rparen.index()).unwrap();
    assert_eq!(flat.prod_string(empty), "E' -> ε");
    assert_eq!(table.entry(e1, flat.eof), Some(empty));
    let step = table.entry(e1, plus.index()).unwrap();
    assert_eq!(flat.prod_string(step), "E' -> + T E'");
  }

  #[test]
  fn left_recursion_is_never_ll1() {
    let mut grammar = Cfg::builder(Alphabet::new(vec!["+", "id"]), "E")
      .rule("E", &[&["E", "+", "id"], &["id"]])
      .build()
      .unwrap();

    let conflict = table_for(&mut grammar).unwrap_err();
    assert_eq!(conflict.head, "E");
    assert_eq!(conflict.lookahead, "id");
  }

  #[test]
  fn unfactored_alternatives_collide() {
    let mut grammar = Cfg::builder(Alphabet::new(vec!["i", "t", "e", "a", "b"]), "S")
      .rule("S", &[&["i", "E", "t", "S"], &["i", "E", "t", "S", "e", "S"], &["a"]])
      .rule("E", &[&["b"]])
      .build()
      .unwrap();

    let conflict = table_for(&mut grammar).unwrap_err();
    assert_eq!(conflict.head, "S");
    assert_eq!(conflict.lookahead, "i");
  }
}
