use cfg::{Alphabet, Cfg, NontermId, TermId};
use parser::{
  build, lr0_state_count, ConflictActions, Error, ParseError, ParseEvents, ParserKind,
};
use pretty_assertions::assert_eq;

fn expr_grammar() -> Cfg {
  Cfg::builder(Alphabet::new(vec!["+", "*", "(", ")", "id"]), "E")
    .rule("E", &[&["E", "+", "T"], &["T"]])
    .rule("T", &[&["T", "*", "F"], &["F"]])
    .rule("F", &[&["(", "E", ")"], &["id"]])
    .build()
    .unwrap()
}

fn terms(grammar: &Cfg, input: &str) -> Vec<TermId> {
  input
    .split_whitespace()
    .map(|name| grammar.alphabet().term(name).unwrap())
    .collect()
}

struct Recorder<'a> {
  grammar: &'a parser::FlatGrammar,
  log: Vec<String>,
}

impl<'a> Recorder<'a> {
  fn new(grammar: &'a parser::FlatGrammar) -> Recorder<'a> {
    Recorder {
      grammar,
      log: Vec::new(),
    }
  }
}

impl ParseEvents for Recorder<'_> {
  fn expand(&mut self, _head: NontermId, prod: usize, _len: usize) {
    self.log.push(format!("expand {}", self.grammar.prod_string(prod)));
  }

  fn terminal(&mut self, term: TermId) {
    use cfg::SymbolNames;
    self.log.push(format!("match {}", self.grammar.term_name(term)));
  }

  fn reduce(&mut self, _head: NontermId, prod: usize, _len: usize) {
    self.log.push(format!("reduce {}", self.grammar.prod_string(prod)));
  }
}

#[test]
fn expression_grammar_parses_under_every_lr_flavor() {
  for kind in &[ParserKind::Slr1, ParserKind::Lr1, ParserKind::Lalr1] {
    let mut grammar = expr_grammar();
    let parser = build(&mut grammar, *kind).unwrap();

    assert_eq!(parser.kind(), *kind);
    assert!(parser.num_states() > 0);

    let input = terms(&grammar, "id + id * id");
    let tree = parser.parse(&input).unwrap();
    assert_eq!(
      tree.to_sexpr(parser.grammar()),
      "(E (E (T (F id))) + (T (T (F id)) * (F id)))"
    );
    assert_eq!(tree.fringe(), input);

    assert!(parser.accepts(&terms(&grammar, "( id + id ) * id")));
    assert!(!parser.accepts(&terms(&grammar, "id +")));
    assert!(!parser.accepts(&terms(&grammar, "id id")));
    assert!(!parser.accepts(&terms(&grammar, ")")));
  }
}

#[test]
fn left_recursion_elimination_unlocks_ll1() {
  let mut grammar = expr_grammar();
  assert!(matches!(build(&mut grammar, ParserKind::Ll1), Err(Error::NotLl1(_))));

  grammar.eliminate_left_recursion();
  let parser = build(&mut grammar, ParserKind::Ll1).unwrap();
  assert_eq!(parser.num_states(), 0);

  let input = terms(&grammar, "id + id");
  let tree = parser.parse(&input).unwrap();
  assert_eq!(
    tree.to_sexpr(parser.grammar()),
    "(E (T (F id) (T' ε)) (E' + (T (F id) (T' ε)) (E' ε)))"
  );
  assert_eq!(tree.fringe(), input);

  assert!(parser.accepts(&terms(&grammar, "( id ) * id")));
  assert!(!parser.accepts(&terms(&grammar, "id + + id")));
}

#[test]
fn dangling_else_stays_outside_ll1_even_after_factoring() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["i", "t", "e", "a", "b"]), "S")
    .rule("S", &[&["i", "E", "t", "S"], &["i", "E", "t", "S", "e", "S"], &["a"]])
    .rule("E", &[&["b"]])
    .build()
    .unwrap();

  match build(&mut grammar, ParserKind::Ll1) {
    Err(Error::NotLl1(conflict)) => {
      assert_eq!(conflict.head, "S");
      assert_eq!(conflict.lookahead, "i");
    }
    other => panic!("expected an LL(1) conflict, got {:?}", other.map(|_| ())),
  }

  // factoring moves the ambiguity into the tail nonterminal; the optional
  // else branch still collides with ε on lookahead `e`
  grammar.left_factoring();
  match build(&mut grammar, ParserKind::Ll1) {
    Err(Error::NotLl1(conflict)) => {
      assert_eq!(conflict.head, "S'");
      assert_eq!(conflict.lookahead, "e");
    }
    other => panic!("expected an LL(1) conflict, got {:?}", other.map(|_| ())),
  }
}

#[test]
fn lr1_beats_slr_on_the_textbook_grammar() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["a", "b", "c", "d"]), "S")
    .rule("S", &[&["A", "a"], &["b", "A", "c"], &["d", "c"], &["b", "d", "a"]])
    .rule("A", &[&["d"]])
    .build()
    .unwrap();

  match build(&mut grammar, ParserKind::Slr1) {
    Err(Error::NotSlr1(conflict)) => {
      assert_eq!(conflict.lookahead, "c");
      match &conflict.actions {
        ConflictActions::ShiftReduce { reduce } => assert_eq!(reduce, "A -> d"),
        other => panic!("expected shift-reduce, got {:?}", other),
      }
    }
    other => panic!("expected an SLR conflict, got {:?}", other.map(|_| ())),
  }

  for kind in &[ParserKind::Lr1, ParserKind::Lalr1] {
    let parser = build(&mut grammar, *kind).unwrap();
    assert!(parser.accepts(&terms(&grammar, "d a")));
    assert!(parser.accepts(&terms(&grammar, "b d c")));
    assert!(parser.accepts(&terms(&grammar, "d c")));
    assert!(parser.accepts(&terms(&grammar, "b d a")));
    assert!(!parser.accepts(&terms(&grammar, "d")));
    assert!(!parser.accepts(&terms(&grammar, "b d")));
  }

  let lalr = build(&mut grammar, ParserKind::Lalr1).unwrap();
  assert_eq!(lalr.num_states(), lr0_state_count(&mut grammar));
}

#[test]
fn lalr_merging_rejects_what_lr1_accepts() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["a", "b", "c", "d", "e"]), "S")
    .rule("S", &[&["a", "A", "d"], &["b", "B", "d"], &["a", "B", "e"], &["b", "A", "e"]])
    .rule("A", &[&["c"]])
    .rule("B", &[&["c"]])
    .build()
    .unwrap();

  let lr1 = build(&mut grammar, ParserKind::Lr1).unwrap();
  assert!(lr1.accepts(&terms(&grammar, "a c d")));
  assert!(lr1.accepts(&terms(&grammar, "b c e")));
  assert!(!lr1.accepts(&terms(&grammar, "a c")));

  match build(&mut grammar, ParserKind::Lalr1) {
    Err(Error::NotLalr1(conflict)) => {
      assert!(matches!(conflict.actions, ConflictActions::ReduceReduce { .. }));
    }
    other => panic!("expected a LALR conflict, got {:?}", other.map(|_| ())),
  }
}

#[test]
fn lalr_state_count_matches_lr0_and_undercuts_lr1() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["c", "d"]), "S")
    .rule("S", &[&["C", "C"]])
    .rule("C", &[&["c", "C"], &["d"]])
    .build()
    .unwrap();

  let lalr = build(&mut grammar, ParserKind::Lalr1).unwrap();
  let lr1 = build(&mut grammar, ParserKind::Lr1).unwrap();
  assert_eq!(lalr.num_states(), lr0_state_count(&mut grammar));
  assert!(lalr.num_states() < lr1.num_states());
}

#[test]
fn table_parsers_agree_with_the_descent_oracle() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["c", "d"]), "S")
    .rule("S", &[&["C", "C"]])
    .rule("C", &[&["c", "C"], &["d"]])
    .build()
    .unwrap();

  let slr = build(&mut grammar, ParserKind::Slr1).unwrap();
  let lalr = build(&mut grammar, ParserKind::Lalr1).unwrap();
  let c = grammar.alphabet().term("c").unwrap();
  let d = grammar.alphabet().term("d").unwrap();

  for len in 0..=6usize {
    for bits in 0..(1u32 << len) {
      let word: Vec<TermId> = (0..len)
        .map(|i| if bits & (1 << i) != 0 { c } else { d })
        .collect();
      let expected = grammar.recursive_descent_parse(&word);
      assert_eq!(slr.accepts(&word), expected, "slr on {:?}", word);
      assert_eq!(lalr.accepts(&word), expected, "lalr on {:?}", word);
    }
  }
}

#[test]
fn ll_parser_agrees_with_the_descent_oracle() {
  let mut grammar = expr_grammar();
  grammar.eliminate_left_recursion();
  let parser = build(&mut grammar, ParserKind::Ll1).unwrap();

  let alphabet: Vec<TermId> = grammar.alphabet().terms().collect();
  let mut words: Vec<Vec<TermId>> = vec![vec![]];
  for _ in 0..3 {
    let mut next = Vec::new();
    for word in &words {
      for t in &alphabet {
        let mut longer = word.clone();
        longer.push(*t);
        next.push(longer);
      }
    }
    words.extend(next);
  }

  for word in &words {
    assert_eq!(
      parser.accepts(word),
      grammar.recursive_descent_parse(word),
      "input {:?}",
      word
    );
  }
}

#[test]
fn lr_event_stream_is_a_post_order_derivation() {
  let mut grammar = expr_grammar();
  let parser = build(&mut grammar, ParserKind::Slr1).unwrap();

  let mut recorder = Recorder::new(parser.grammar());
  parser
    .parse_with(&terms(&grammar, "id + id"), &mut recorder)
    .unwrap();

  assert_eq!(
    recorder.log,
    vec![
      "match id",
      "reduce F -> id",
      "reduce T -> F",
      "reduce E -> T",
      "match +",
      "match id",
      "reduce F -> id",
      "reduce T -> F",
      "reduce E -> E + T",
    ]
  );
}

#[test]
fn ll_event_stream_is_a_pre_order_derivation() {
  let mut grammar = expr_grammar();
  grammar.eliminate_left_recursion();
  let parser = build(&mut grammar, ParserKind::Ll1).unwrap();

  let mut recorder = Recorder::new(parser.grammar());
  parser
    .parse_with(&terms(&grammar, "id + id"), &mut recorder)
    .unwrap();

  assert_eq!(
    recorder.log,
    vec![
      "expand E -> T E'",
      "expand T -> F T'",
      "expand F -> id",
      "match id",
      "expand T' -> ε",
      "expand E' -> + T E'",
      "match +",
      "expand T -> F T'",
      "expand F -> id",
      "match id",
      "expand T' -> ε",
      "expand E' -> ε",
    ]
  );
}

#[test]
fn syntax_errors_carry_position_and_expectations() {
  let mut grammar = expr_grammar();
  let parser = build(&mut grammar, ParserKind::Slr1).unwrap();

  match parser.parse(&terms(&grammar, "id id")) {
    Err(ParseError::Syntax(err)) => {
      assert_eq!(err.pos, 1);
      assert_eq!(err.found, "id");
      assert_eq!(err.expected, vec!["+", "*", ")", "$"]);
    }
    other => panic!("expected a syntax error, got {:?}", other),
  }

  match parser.parse(&[]) {
    Err(ParseError::Syntax(err)) => {
      assert_eq!(err.pos, 0);
      assert_eq!(err.found, "$");
      assert_eq!(err.expected, vec!["(", "id"]);
    }
    other => panic!("expected a syntax error, got {:?}", other),
  }

  match parser.parse(&terms(&grammar, "id +")) {
    Err(ParseError::Syntax(err)) => {
      assert_eq!(err.pos, 2);
      assert_eq!(err.found, "$");
      assert_eq!(err.expected, vec!["(", "id"]);
    }
    other => panic!("expected a syntax error, got {:?}", other),
  }
}

#[test]
fn terminals_outside_the_alphabet_are_rejected() {
  let mut grammar = expr_grammar();
  let parser = build(&mut grammar, ParserKind::Slr1).unwrap();

  assert!(!parser.accepts(&[grammar.alphabet().endmarker()]));
}

#[test]
fn epsilon_expansions_show_up_as_epsilon_leaves() {
  let mut grammar = Cfg::builder(Alphabet::new(vec!["a"]), "S")
    .rule("S", &[&["a", "S"], &[]])
    .build()
    .unwrap();
  let parser = build(&mut grammar, ParserKind::Slr1).unwrap();

  let input = terms(&grammar, "a a");
  let tree = parser.parse(&input).unwrap();
  assert_eq!(tree.to_sexpr(parser.grammar()), "(S a (S a (S ε)))");
  assert_eq!(tree.fringe(), input);

  assert!(parser.accepts(&[]));
}

#[test]
fn lr0_state_count_of_the_expression_grammar() {
  let mut grammar = expr_grammar();
  assert_eq!(lr0_state_count(&mut grammar), 12);
}
