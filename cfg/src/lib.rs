//! context-free grammar model: validated construction, normalization
//! transforms, FIRST/FOLLOW computation and a backtracking reference parser.

use thiserror::Error;

mod alphabet;
mod descent;
mod ffn;
mod grammar;
mod symbol;
mod transform;
mod tree;

pub use alphabet::{Alphabet, TermId};
pub use ffn::Ffn;
pub use grammar::{Body, BodySet, Cfg, CfgBuilder};
pub use symbol::{NontermId, NontermIdGen, Symbol, SymbolNames};
pub use tree::ParseTree;

pub type Map<K, V> = indexmap::IndexMap<K, V, fnv::FnvBuildHasher>;
pub type Set<T> = indexmap::IndexSet<T, fnv::FnvBuildHasher>;

/// Grammar construction failed; the grammar itself has to be fixed before
/// retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("a body of `{head}` references terminal `{term}` which is not in the alphabet")]
  UndeclaredTerminal { head: String, term: String },
  #[error("nonterminal `{head}` is declared with no production bodies")]
  EmptyBody { head: String },
  #[error("a body of `{referrer}` references nonterminal `{head}` which has no productions")]
  NoProductionForHead { referrer: String, head: String },
  #[error("start symbol `{start}` has no productions after useless-symbol elimination")]
  NoProductionForStartSymbol { start: String },
}
