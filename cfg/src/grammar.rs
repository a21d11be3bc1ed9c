//! the grammar model: named rules lowered to interned ids at construction,
//! validated, and stripped of useless symbols.

use bimap::BiMap;
use bit_set::BitSet;
use log::debug;
use std::fmt::{self, Write};
use crate::alphabet::{Alphabet, TermId};
use crate::ffn::{self, Ffn};
use crate::symbol::{NontermId, NontermIdGen, Symbol, SymbolNames};
use crate::{GrammarError, Map, Set};

pub type Body = Vec<Symbol>;
pub type BodySet = Set<Body>;

/// A context-free grammar over a fixed alphabet. Productions are grouped by
/// head; bodies are deduplicated. Every grammar holds only reachable,
/// generating symbols, and every transform re-establishes that on exit.
#[derive(Debug, Clone)]
pub struct Cfg {
  pub(crate) alphabet: Alphabet,
  pub(crate) start: NontermId,
  pub(crate) nts: BiMap<NontermId, String>,
  pub(crate) prods: Map<NontermId, BodySet>,
  pub(crate) nt_id_gen: NontermIdGen,
  pub(crate) ffn: Option<Ffn>,
}

impl Cfg {
  pub fn builder(alphabet: Alphabet, start: &str) -> CfgBuilder {
    CfgBuilder {
      alphabet,
      start: start.to_owned(),
      rules: Vec::new(),
    }
  }

  pub fn alphabet(&self) -> &Alphabet {
    &self.alphabet
  }

  pub fn start(&self) -> NontermId {
    self.start
  }

  pub fn nonterm(&self, name: &str) -> Option<NontermId> {
    let id = *self.nts.get_by_right(&name.to_owned())?;
    if self.prods.contains_key(&id) {
      Some(id)
    } else {
      None
    }
  }

  pub fn nonterms(&self) -> impl Iterator<Item = NontermId> + '_ {
    self.prods.keys().copied()
  }

  pub fn num_nonterms(&self) -> usize {
    self.prods.len()
  }

  pub fn bodies(&self, nt: NontermId) -> &BodySet {
    &self.prods[&nt]
  }

  pub fn rules(&self) -> impl Iterator<Item = (NontermId, &BodySet)> {
    self.prods.iter().map(|(nt, bodies)| (*nt, bodies))
  }

  /// All productions, flattened in rule order.
  pub fn productions(&self) -> impl Iterator<Item = (NontermId, &Body)> {
    self
      .prods
      .iter()
      .flat_map(|(nt, bodies)| bodies.iter().map(move |body| (*nt, body)))
  }

  /// One past the largest nonterminal id ever minted, including ids of
  /// nonterminals later removed as useless.
  pub fn nonterm_id_bound(&self) -> u32 {
    self.nt_id_gen.next_id()
  }

  /// Mints a fresh nonterminal whose name is `base` with primes appended
  /// until it clashes with nothing. The caller still has to give it bodies.
  pub(crate) fn mint_nonterm(&mut self, base: &str) -> NontermId {
    let mut name = base.to_owned();
    while self.nts.contains_right(&name) {
      name.push('\'');
    }
    let id = self.nt_id_gen.gen();
    self.nts.insert(id, name);
    id
  }

  pub(crate) fn nonterm_name_owned(&self, nt: NontermId) -> String {
    self.nonterm_name(nt).to_owned()
  }

  /// Drops cached FIRST/FOLLOW data; every mutation goes through here.
  pub(crate) fn touch(&mut self) {
    self.ffn = None;
  }

  /// FIRST/FOLLOW/NULLABLE sets, computed on first use and cached until the
  /// grammar is transformed again.
  pub fn ffn(&mut self) -> &Ffn {
    if self.ffn.is_none() {
      self.ffn = Some(ffn::compute(self));
    }
    self.ffn.as_ref().unwrap()
  }

  pub fn first(&mut self, nt: NontermId) -> &BitSet {
    &self.ffn().first[&nt]
  }

  pub fn follow(&mut self, nt: NontermId) -> &BitSet {
    &self.ffn().follow[&nt]
  }

  pub fn nullable(&mut self, nt: NontermId) -> bool {
    self.ffn().nullable.contains(nt.index())
  }

  /// Renders a terminal bit set, in column order; useful in diagnostics.
  pub fn term_set_names(&self, set: &BitSet) -> Vec<String> {
    set
      .iter()
      .map(|i| self.alphabet.name(TermId::new(i as u32)).to_owned())
      .collect()
  }

  pub fn body_string(&self, body: &[Symbol]) -> String {
    if body.is_empty() {
      return "ε".to_owned();
    }
    let mut buf = String::new();
    for (i, sym) in body.iter().enumerate() {
      if i > 0 {
        buf.push(' ');
      }
      buf.push_str(self.symbol_name(*sym));
    }
    buf
  }

  pub fn prod_string(&self, head: NontermId, body: &[Symbol]) -> String {
    format!("{} -> {}", self.nonterm_name(head), self.body_string(body))
  }

  /// Removes unreachable and non-generating symbols, alternating the two
  /// passes until neither removes anything.
  pub fn eliminate_useless_symbols(&mut self) {
    self.touch();
    self.remove_useless();
    debug_assert!(self.prods.contains_key(&self.start));
  }

  pub(crate) fn remove_useless(&mut self) {
    loop {
      let dropped_unreachable = self.drop_unreachable();
      let dropped_nongenerating = self.drop_nongenerating();
      if !dropped_unreachable && !dropped_nongenerating {
        break;
      }
    }
  }

  fn drop_unreachable(&mut self) -> bool {
    let mut reached = BitSet::new();
    reached.insert(self.start.index());
    let mut stack = vec![self.start];

    while let Some(nt) = stack.pop() {
      let bodies = match self.prods.get(&nt) {
        Some(bodies) => bodies,
        None => continue,
      };
      for body in bodies {
        for sym in body {
          if let Symbol::Nonterm(other) = sym {
            if reached.insert(other.index()) {
              stack.push(*other);
            }
          }
        }
      }
    }

    let before = self.prods.len();
    self.prods.retain(|nt, _| reached.contains(nt.index()));
    let removed = before - self.prods.len();
    if removed > 0 {
      debug!("dropped {} unreachable nonterminals", removed);
    }
    removed > 0
  }

  fn drop_nongenerating(&mut self) -> bool {
    let mut generating = BitSet::new();
    loop {
      let mut changed = false;
      for (nt, bodies) in &self.prods {
        if generating.contains(nt.index()) {
          continue;
        }
        let ok = bodies.iter().any(|body| {
          body.iter().all(|sym| {
            match sym {
              Symbol::Term(_) => true,
              Symbol::Nonterm(other) => generating.contains(other.index()),
            }
          })
        });
        if ok {
          generating.insert(nt.index());
          changed = true;
        }
      }
      if !changed {
        break;
      }
    }

    let mut removed = 0usize;
    for bodies in self.prods.values_mut() {
      let before = bodies.len();
      bodies.retain(|body| {
        body.iter().all(|sym| {
          match sym {
            Symbol::Term(_) => true,
            Symbol::Nonterm(other) => generating.contains(other.index()),
          }
        })
      });
      removed += before - bodies.len();
    }
    self.prods.retain(|_, bodies| !bodies.is_empty());

    if removed > 0 {
      debug!("dropped {} bodies with non-generating symbols", removed);
    }
    removed > 0
  }
}

impl SymbolNames for Cfg {
  fn term_name(&self, term: TermId) -> &str {
    self.alphabet.name(term)
  }

  fn nonterm_name(&self, nt: NontermId) -> &str {
    self.nts.get_by_left(&nt).map(|s| s.as_str()).unwrap_or("<?>")
  }
}

impl fmt::Display for Cfg {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (nt, bodies) in &self.prods {
      write!(f, "{} ->", self.nonterm_name(*nt))?;
      for (i, body) in bodies.iter().enumerate() {
        if i > 0 {
          f.write_str(" |")?;
        }
        if body.is_empty() {
          f.write_str(" ε")?;
        } else {
          for sym in body {
            f.write_char(' ')?;
            f.write_str(self.symbol_name(*sym))?;
          }
        }
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

/// Collects named rules, then lowers and validates them in `build`.
#[derive(Debug)]
pub struct CfgBuilder {
  alphabet: Alphabet,
  start: String,
  rules: Vec<(String, Vec<Vec<String>>)>,
}

impl CfgBuilder {
  /// Adds bodies for `head`. May be called more than once per head; bodies
  /// accumulate. A symbol name in quotes, like `"'x'"`, always denotes a
  /// terminal; otherwise alphabet members win over nonterminals.
  pub fn rule(mut self, head: &str, bodies: &[&[&str]]) -> CfgBuilder {
    let bodies = bodies
      .iter()
      .map(|body| body.iter().map(|s| (*s).to_owned()).collect())
      .collect::<Vec<_>>();

    match self.rules.iter_mut().find(|(h, _)| h == head) {
      Some((_, existing)) => existing.extend(bodies),
      None => self.rules.push((head.to_owned(), bodies)),
    }
    self
  }

  pub fn build(self) -> Result<Cfg, GrammarError> {
    let CfgBuilder {
      alphabet,
      start,
      rules,
    } = self;

    let mut nt_id_gen = NontermIdGen::default();
    let mut nts = BiMap::new();
    for (head, bodies) in &rules {
      if bodies.is_empty() {
        return Err(GrammarError::EmptyBody { head: head.clone() });
      }
      if !nts.contains_right(head) {
        nts.insert(nt_id_gen.gen(), head.clone());
      }
    }

    let mut prods = Map::default();
    for (head, bodies) in &rules {
      let head_id = *nts.get_by_right(head).unwrap();
      let set: &mut BodySet = prods.entry(head_id).or_insert_with(BodySet::default);
      for body in bodies {
        let mut symbols = Vec::with_capacity(body.len());
        for name in body {
          symbols.push(resolve_symbol(&alphabet, &nts, head, name)?);
        }
        set.insert(symbols);
      }
    }

    let start_id = match nts.get_by_right(&start) {
      Some(id) => *id,
      None => return Err(GrammarError::NoProductionForStartSymbol { start }),
    };

    let mut grammar = Cfg {
      alphabet,
      start: start_id,
      nts,
      prods,
      nt_id_gen,
      ffn: None,
    };
    grammar.remove_useless();

    if !grammar.prods.contains_key(&start_id) {
      return Err(GrammarError::NoProductionForStartSymbol { start });
    }
    Ok(grammar)
  }
}

fn resolve_symbol(
  alphabet: &Alphabet,
  nts: &BiMap<NontermId, String>,
  head: &str,
  name: &str,
) -> Result<Symbol, GrammarError> {
  if name.len() >= 2 && name.starts_with('\'') && name.ends_with('\'') {
    let term = &name[1..name.len() - 1];
    return match alphabet.term(term) {
      Some(t) => Ok(Symbol::Term(t)),
      None => {
        Err(GrammarError::UndeclaredTerminal {
          head: head.to_owned(),
          term: term.to_owned(),
        })
      }
    };
  }

  if let Some(t) = alphabet.term(name) {
    return Ok(Symbol::Term(t));
  }

  match nts.get_by_right(&name.to_owned()) {
    Some(id) => Ok(Symbol::Nonterm(*id)),
    None => {
      Err(GrammarError::NoProductionForHead {
        referrer: head.to_owned(),
        head: name.to_owned(),
      })
    }
  }
}
