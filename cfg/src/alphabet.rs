//! terminal alphabet, with the epsilon and endmarker sentinels.

use bimap::BiMap;

/// Id of a terminal symbol. Plain alphabet members get dense ids starting
/// from 0; the two sentinels live outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
  /// Marker for the empty string. Never a member of any alphabet and never
  /// occurs in a production body; parse trees use it to label epsilon
  /// leaves.
  pub const EPSILON: TermId = TermId(std::u32::MAX);

  pub(crate) fn new(id: u32) -> TermId {
    TermId(id)
  }

  pub fn id(self) -> u32 {
    self.0
  }

  /// Column index in terminal-indexed tables and bit sets.
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// The set of terminals a grammar may use. Built once and injected into
/// grammar construction; grammars never look terminals up from global state.
#[derive(Debug, Clone)]
pub struct Alphabet {
  names: BiMap<TermId, String>,
}

impl Alphabet {
  /// Builds an alphabet from terminal names, assigning ids in order.
  /// Duplicate names collapse to the first occurrence.
  pub fn new<I, S>(names: I) -> Alphabet
    where I: IntoIterator<Item = S>, S: Into<String>
  {
    let mut map = BiMap::new();
    for name in names {
      let name = name.into();
      if !map.contains_right(&name) {
        let id = TermId::new(map.len() as u32);
        map.insert(id, name);
      }
    }
    Alphabet { names: map }
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// The end-of-input sentinel. Its index is one past the last plain
  /// terminal, so terminal-indexed tables reserve `len() + 1` columns.
  pub fn endmarker(&self) -> TermId {
    TermId::new(self.names.len() as u32)
  }

  /// Whether `term` is a plain member of this alphabet. False for both
  /// sentinels.
  pub fn contains(&self, term: TermId) -> bool {
    (term.0 as usize) < self.names.len()
  }

  pub fn term(&self, name: &str) -> Option<TermId> {
    // bimap 0.5 lookups want the exact right type.
    self.names.get_by_right(&name.to_owned()).copied()
  }

  pub fn terms(&self) -> impl Iterator<Item = TermId> {
    (0..self.names.len() as u32).map(TermId::new)
  }

  pub fn name(&self, term: TermId) -> &str {
    if term == TermId::EPSILON {
      "ε"
    } else if term == self.endmarker() {
      "$"
    } else {
      self.names.get_by_left(&term).map(|s| s.as_str()).unwrap_or("<?>")
    }
  }
}
