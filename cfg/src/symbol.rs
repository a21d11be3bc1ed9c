use crate::alphabet::TermId;

/// Id of a nonterminal, interned per grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NontermId(u32);

impl NontermId {
  pub fn id(self) -> u32 {
    self.0
  }

  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Default, Clone)]
pub struct NontermIdGen(u32);

impl NontermIdGen {
  pub fn gen(&mut self) -> NontermId {
    let i = self.0;
    self.0 += 1;
    NontermId(i)
  }

  /// Continues minting from the given id onward.
  pub fn starting_at(first: u32) -> NontermIdGen {
    NontermIdGen(first)
  }

  pub fn next_id(&self) -> u32 {
    self.0
  }
}

/// A grammar symbol: either a terminal of the alphabet or a nonterminal of
/// the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
  Term(TermId),
  Nonterm(NontermId),
}

/// Name lookup seam shared by everything that renders symbols: the grammar
/// itself and the parser crate's grammar snapshot.
pub trait SymbolNames {
  fn term_name(&self, term: TermId) -> &str;
  fn nonterm_name(&self, nt: NontermId) -> &str;

  fn symbol_name(&self, sym: Symbol) -> &str {
    match sym {
      Symbol::Term(t) => self.term_name(t),
      Symbol::Nonterm(nt) => self.nonterm_name(nt),
    }
  }
}
