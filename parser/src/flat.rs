//! flattened grammar snapshot.
//!
//! Table construction wants numbered productions and dense lookups, not the
//! by-head map the grammar crate maintains. `FlatGrammar` freezes a grammar
//! into production and name vectors, and augments it with a synthetic accept
//! production `S' -> S` numbered last.

use std::ops::Range;
use cfg::{Cfg, Map, NontermId, NontermIdGen, Symbol, SymbolNames, TermId};

#[derive(Debug, Clone)]
pub struct Prod {
  pub nt: NontermId,
  pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct FlatGrammar {
  /// All productions in rule order; the accept production is last.
  pub prods: Vec<Prod>,
  /// Production index range of each head.
  pub nt_ranges: Map<NontermId, Range<usize>>,
  pub nt_names: Map<NontermId, String>,
  /// Terminal names by column, with `$` in the endmarker column.
  pub term_names: Vec<String>,
  pub num_terms: usize,
  /// Endmarker column, one past the last terminal.
  pub eof: usize,
  /// The synthetic accept nonterminal.
  pub start: NontermId,
  pub user_start: NontermId,
  pub accept_prod: usize,
  /// One past the longest body length; item keys are `prod * this + dot`.
  pub max_nsym_p1: u32,
  /// Row width of nonterminal-indexed tables.
  pub num_nt_slots: usize,
}

impl FlatGrammar {
  pub fn from_cfg(grammar: &Cfg) -> FlatGrammar {
    let mut prods = Vec::new();
    let mut nt_ranges = Map::default();
    let mut nt_names = Map::default();

    for (nt, bodies) in grammar.rules() {
      let begin = prods.len();
      for body in bodies {
        prods.push(Prod {
          nt,
          symbols: body.clone(),
        });
      }
      nt_ranges.insert(nt, begin..prods.len());
      nt_names.insert(nt, grammar.nonterm_name(nt).to_owned());
    }

    let user_start = grammar.start();
    let start = NontermIdGen::starting_at(grammar.nonterm_id_bound()).gen();
    let mut start_name = format!("{}'", grammar.nonterm_name(user_start));
    while nt_names.values().any(|name| *name == start_name) {
      start_name.push('\'');
    }
    nt_names.insert(start, start_name);

    let accept_prod = prods.len();
    prods.push(Prod {
      nt: start,
      symbols: vec![Symbol::Nonterm(user_start)],
    });
    nt_ranges.insert(start, accept_prod..prods.len());

    let num_terms = grammar.alphabet().len();
    let mut term_names: Vec<String> = grammar
      .alphabet()
      .terms()
      .map(|t| grammar.alphabet().name(t).to_owned())
      .collect();
    term_names.push("$".to_owned());

    let max_nsym = prods.iter().map(|prod| prod.symbols.len()).max().unwrap_or(0);

    FlatGrammar {
      max_nsym_p1: max_nsym as u32 + 1,
      num_nt_slots: start.index() + 1,
      prods,
      nt_ranges,
      nt_names,
      term_names,
      num_terms,
      eof: num_terms,
      start,
      user_start,
      accept_prod,
    }
  }

  pub fn term_col_name(&self, col: usize) -> &str {
    &self.term_names[col]
  }

  pub fn body_string(&self, symbols: &[Symbol]) -> String {
    if symbols.is_empty() {
      return "ε".to_owned();
    }
    symbols
      .iter()
      .map(|sym| self.symbol_name(*sym))
      .collect::<Vec<_>>()
      .join(" ")
  }

  pub fn prod_string(&self, prod_ix: usize) -> String {
    let prod = &self.prods[prod_ix];
    format!("{} -> {}", self.nonterm_name(prod.nt), self.body_string(&prod.symbols))
  }
}

impl SymbolNames for FlatGrammar {
  fn term_name(&self, term: TermId) -> &str {
    if term == TermId::EPSILON {
      "ε"
    } else {
      &self.term_names[term.index()]
    }
  }

  fn nonterm_name(&self, nt: NontermId) -> &str {
    self.nt_names.get(&nt).map(|s| s.as_str()).unwrap_or("<?>")
  }
}
