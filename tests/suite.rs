use gc::Gc;

use patter::{
    matches, step, Fault, Item, Matcher, Matches, Rule, Scan, State, Transition, UNBOUNDED,
};

/// Every solution the rule has on this text, in order. Panics on faults,
/// which no test here expects outside the fault tests.
fn solutions(rule: &Rule, text: &str) -> Vec<Vec<Item>> {
    matches(rule, text).collect::<Result<Vec<_>, _>>().unwrap()
}

fn one_solution(rule: &Rule, text: &str) -> Vec<Item> {
    let mut all = solutions(rule, text);
    assert_eq!(all.len(), 1, "expected exactly one solution");
    all.pop().unwrap()
}

fn chars(s: &str) -> Vec<Item> {
    s.chars().map(Item::Char).collect()
}

fn texts(ss: &[&str]) -> Vec<Item> {
    ss.iter().map(|s| Item::text(*s)).collect()
}

// ===== atoms =====

#[test]
fn epsilon_matches_nothing_once() {
    let rule = Matcher::epsilon();
    assert_eq!(solutions(&rule, "x"), vec![vec![]]);

    let mut m = Matches::new(rule, Scan::new("x"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 0);
    assert!(value.is_empty());
}

#[test]
fn insert_injects_without_consuming() {
    let rule = Matcher::seq(vec![
        Matcher::insert(Item::text("marker")),
        Matcher::dot(),
        Matcher::eos(),
    ]);
    assert_eq!(
        one_solution(&rule, "z"),
        vec![Item::text("marker"), Item::Char('z')]
    );
}

#[test]
fn seq_of_insert_over_empty_source() {
    let rule = Matcher::seq(vec![Matcher::insert(Item::text("x"))]);
    assert_eq!(solutions(&rule, ""), vec![texts(&["x"])]);
}

#[test]
fn dot_takes_one_token() {
    let rule = Matcher::dot();
    let mut m = Matches::new(rule.clone(), Scan::new("ab"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 1);
    assert_eq!(value, chars("a"));
    // One-shot: no second solution.
    assert!(m.next_match().unwrap().is_none());

    assert!(solutions(&rule, "").is_empty());
}

#[test]
fn fail_never_matches() {
    assert!(solutions(&Matcher::fail(), "anything").is_empty());
}

#[test]
fn equal_takes_its_text_as_one_element() {
    let rule = Matcher::equal("ab");
    let mut m = Matches::new(rule.clone(), Scan::new("abc"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 2);
    assert_eq!(value, texts(&["ab"]));

    // Mismatch, and input running out early.
    assert!(solutions(&rule, "ax").is_empty());
    assert!(solutions(&Matcher::equal("abcd"), "abc").is_empty());
}

#[test]
fn eos_only_at_the_end() {
    assert_eq!(solutions(&Matcher::eos(), ""), vec![vec![]]);
    assert!(solutions(&Matcher::eos(), "a").is_empty());
}

#[test]
fn pattern_is_anchored_and_exact() {
    let digits = Matcher::pattern("[0-9]+").unwrap();
    let mut m = Matches::new(digits.clone(), Scan::new("123a"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 3);
    assert_eq!(value, texts(&["123"]));

    // Anchored: a match further in does not count.
    assert!(solutions(&digits, "a123").is_empty());

    // A zero-width match is a match.
    let star = Matcher::pattern("a*").unwrap();
    assert_eq!(one_solution(&star, "bbb"), texts(&[""]));
}

#[test]
fn bad_pattern_is_a_fault() {
    assert!(matches!(Matcher::pattern("("), Err(Fault::BadPattern(_))));
}

#[test]
fn precompiled_patterns_behave_the_same() {
    let compiled = regex::Regex::new("[a-z]+").unwrap();
    let rule = Matcher::pattern_from(&compiled).unwrap();
    assert_eq!(one_solution(&rule, "abc1"), texts(&["abc"]));
}

// ===== wrappers =====

#[test]
fn drop_advances_but_yields_nothing() {
    let rule = Matcher::drop(Matcher::equal("ab"));
    let mut m = Matches::new(rule, Scan::new("abc"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 2);
    assert!(value.is_empty());
}

#[test]
fn lookahead_peeks_without_moving() {
    let rule = Matcher::lookahead(Matcher::equal("s"));
    let mut m = Matches::new(rule.clone(), Scan::new("sx"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 0);
    assert!(value.is_empty());

    assert!(solutions(&rule, "x").is_empty());
}

#[test]
fn lookahead_then_consume() {
    let rule = Matcher::seq(vec![
        Matcher::lookahead(Matcher::equal("x")),
        Matcher::dot(),
    ]);
    let mut m = Matches::new(rule, Scan::new("x"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(value, chars("x"));
    assert_eq!(at.offset(), 1);
}

#[test]
fn lookahead_re_enters_its_child() {
    // The child has two solutions; the lookahead reports both, both from
    // the cursor it started at.
    let rule = Matcher::lookahead(Matcher::depth(Matcher::dot(), 1, 2, true));
    let mut m = Matches::new(rule, Scan::new("ab"));
    let (first, value) = m.next_match().unwrap().unwrap();
    assert_eq!((first.offset(), value), (0, vec![]));
    let (second, value) = m.next_match().unwrap().unwrap();
    assert_eq!((second.offset(), value), (0, vec![]));
    assert!(m.next_match().unwrap().is_none());
}

#[test]
fn not_inverts_exactly_once() {
    assert_eq!(solutions(&Matcher::not(Matcher::fail()), "abc"), vec![vec![]]);
    assert!(solutions(&Matcher::not(Matcher::epsilon()), "abc").is_empty());

    // It stays where it started.
    let mut m = Matches::new(Matcher::not(Matcher::equal("z")), Scan::new("abc"));
    let (at, _) = m.next_match().unwrap().unwrap();
    assert_eq!(at.offset(), 0);
}

// ===== ordered choice =====

#[test]
fn alt_prefers_the_left() {
    let rule = Matcher::alt(vec![Matcher::equal("ac"), Matcher::equal("ab")]);
    assert_eq!(solutions(&rule, "ab"), vec![texts(&["ab"])]);
}

#[test]
fn alt_yields_left_solutions_then_right() {
    // The left arm alone has two solutions ('x' then nothing); the right
    // arm has one more.
    let rule = Matcher::alt(vec![
        Matcher::depth(Matcher::dot(), 0, UNBOUNDED, true),
        Matcher::equal("x"),
    ]);
    assert_eq!(
        solutions(&rule, "x"),
        vec![chars("x"), vec![], texts(&["x"])]
    );
}

#[test]
fn empty_alt_fails() {
    assert!(solutions(&Matcher::alt(vec![]), "x").is_empty());
}

// ===== sequencing =====

#[test]
fn seq_concatenates_in_order() {
    let rule = Matcher::seq(vec![
        Matcher::equal("a"),
        Matcher::equal("b"),
        Matcher::equal("c"),
        Matcher::eos(),
    ]);
    let mut m = Matches::new(rule, Scan::new("abc"));
    let (at, value) = m.next_match().unwrap().unwrap();
    assert_eq!(value, texts(&["a", "b", "c"]));
    assert_eq!(at.offset(), 3);
    assert!(m.next_match().unwrap().is_none());
}

#[test]
fn and_nests_each_slot() {
    let rule = Matcher::and(vec![Matcher::equal("a"), Matcher::equal("b")]);
    assert_eq!(
        one_solution(&rule, "ab"),
        vec![
            Item::List(texts(&["a"])),
            Item::List(texts(&["b"])),
        ]
    );
}

#[test]
fn empty_seq_is_one_empty_match() {
    assert_eq!(solutions(&Matcher::seq(vec![]), "x"), vec![vec![]]);
}

#[test]
fn series_enumerates_the_last_slot_fastest() {
    let first = Matcher::alt(vec![Matcher::equal("a"), Matcher::epsilon()]);
    let second = Matcher::alt(vec![Matcher::equal("b"), Matcher::epsilon()]);
    let rule = Matcher::seq(vec![first, second]);
    // Cartesian product of the two slots' solutions; the second varies
    // fastest. With the first slot empty, "b" cannot match at the start.
    assert_eq!(
        solutions(&rule, "ab"),
        vec![texts(&["a", "b"]), texts(&["a"]), vec![]]
    );
}

#[test]
fn seq_backtracks_into_a_greedy_slot() {
    let rule = Matcher::seq(vec![
        Matcher::repeat(Matcher::dot(), 0, UNBOUNDED),
        Matcher::equal("b"),
        Matcher::eos(),
    ]);
    assert_eq!(
        one_solution(&rule, "aab"),
        vec![Item::Char('a'), Item::Char('a'), Item::text("b")]
    );
}

// ===== repetition =====

#[test]
fn depth_yields_deepest_first() {
    let rule = Matcher::depth(Matcher::dot(), 2, 3, true);
    assert_eq!(solutions(&rule, "aaaa"), vec![chars("aaa"), chars("aa")]);
}

#[test]
fn breadth_yields_shallowest_first() {
    let rule = Matcher::breadth(Matcher::dot(), 2, 3, true);
    assert_eq!(solutions(&rule, "aaaa"), vec![chars("aa"), chars("aaa")]);
}

#[test]
fn depth_counts_never_increase() {
    let rule = Matcher::depth(Matcher::dot(), 0, UNBOUNDED, true);
    let counts: Vec<usize> = solutions(&rule, "aaa").iter().map(Vec::len).collect();
    assert_eq!(counts, vec![3, 2, 1, 0]);
}

#[test]
fn breadth_counts_never_decrease() {
    let rule = Matcher::breadth(Matcher::dot(), 0, UNBOUNDED, true);
    let counts: Vec<usize> = solutions(&rule, "aaa").iter().map(Vec::len).collect();
    assert_eq!(counts, vec![0, 1, 2, 3]);
}

#[test]
fn bounded_repetition_has_one_solution_per_count() {
    // A deterministic child: one solution per count in [lo, hi].
    let greedy = Matcher::depth(Matcher::dot(), 1, 3, true);
    assert_eq!(solutions(&greedy, "aaaa").len(), 3);

    let lazy = Matcher::breadth(Matcher::dot(), 1, 3, true);
    assert_eq!(solutions(&lazy, "aaaa").len(), 3);
}

#[test]
fn repetition_backtracks_into_its_child() {
    // The child itself has two solutions at the start; both shapes of the
    // repetition walk through them.
    let child = Matcher::alt(vec![Matcher::equal("ab"), Matcher::equal("a")]);
    let greedy = Matcher::depth(child.clone(), 1, UNBOUNDED, true);
    assert_eq!(
        solutions(&greedy, "ab"),
        vec![texts(&["ab"]), texts(&["a"])]
    );

    let lazy = Matcher::breadth(child, 1, UNBOUNDED, true);
    assert_eq!(solutions(&lazy, "ab"), vec![texts(&["ab"]), texts(&["a"])]);
}

#[test]
fn zero_repetitions_is_a_real_solution() {
    let rule = Matcher::depth(Matcher::equal("a"), 0, UNBOUNDED, true);
    // On input with no 'a' at all, the empty match is the only solution.
    assert_eq!(solutions(&rule, "b"), vec![vec![]]);

    // Bounds pinched to zero: the empty match, once.
    let pinched = Matcher::breadth(Matcher::equal("a"), 0, 0, true);
    assert_eq!(solutions(&pinched, "aaa"), vec![vec![]]);
}

#[test]
fn flattened_and_nested_repetition_output() {
    let flat = Matcher::depth(Matcher::equal("a"), 0, UNBOUNDED, true);
    assert_eq!(first_solution(&flat, "aa"), texts(&["a", "a"]));

    let nested = Matcher::depth(Matcher::equal("a"), 0, UNBOUNDED, false);
    assert_eq!(
        first_solution(&nested, "aa"),
        vec![
            Item::List(texts(&["a"])),
            Item::List(texts(&["a"])),
        ]
    );
}

/// First solution only; repetitions keep enumerating shallower ones after.
fn first_solution(rule: &Rule, text: &str) -> Vec<Item> {
    matches(rule, text).next().unwrap().unwrap()
}

#[test]
fn repeat_picks_the_traversal() {
    let greedy = Matcher::repeat(Matcher::dot(), 0, UNBOUNDED);
    assert_eq!(first_solution(&greedy, "aa"), chars("aa"));

    let lazy = Matcher::repeat_with(Matcher::dot(), 0, UNBOUNDED, true, false);
    assert_eq!(first_solution(&lazy, "aa"), vec![]);
}

// ===== recursion =====

#[test]
fn delayed_ties_a_recursive_grammar() {
    // expr := "1" "+" expr | "1"
    let expr = Matcher::delayed();
    expr.bind(Matcher::alt(vec![
        Matcher::seq(vec![
            Matcher::equal("1"),
            Matcher::equal("+"),
            expr.clone(),
        ]),
        Matcher::equal("1"),
    ]))
    .unwrap();

    let whole = Matcher::seq(vec![expr, Matcher::eos()]);
    assert_eq!(
        one_solution(&whole, "1+1+1"),
        texts(&["1", "+", "1", "+", "1"])
    );
    assert!(solutions(&whole, "1+").is_empty());
}

#[test]
fn left_recursion_fails_fast() {
    // expr := expr "+" "1" | "1" keeps suspending itself without consuming.
    let expr = Matcher::delayed();
    expr.bind(Matcher::alt(vec![
        Matcher::seq(vec![
            expr.clone(),
            Matcher::equal("+"),
            Matcher::equal("1"),
        ]),
        Matcher::equal("1"),
    ]))
    .unwrap();

    let mut m = Matches::new(expr, Scan::new("1+1")).frame_limit(64);
    assert!(matches!(m.next_match(), Err(Fault::TooDeep(64))));
    // A fault ends the enumeration.
    assert!(m.next_match().unwrap().is_none());
}

#[test]
fn unbound_delayed_is_a_fault() {
    let hole = Matcher::delayed();
    let mut m = Matches::new(hole, Scan::new("x"));
    assert!(matches!(m.next_match(), Err(Fault::Unbound)));
}

// ===== the protocol itself =====

#[test]
fn dirty_always_fails() {
    let scan = Scan::new("abc");
    let dirty = Gc::new(State::Dirty);
    for rule in [
        Matcher::dot(),
        Matcher::equal("a"),
        Matcher::not(Matcher::dot()),
        Matcher::alt(vec![Matcher::dot()]),
        Matcher::seq(vec![Matcher::dot()]),
        Matcher::depth(Matcher::dot(), 0, UNBOUNDED, true),
        Matcher::breadth(Matcher::dot(), 0, UNBOUNDED, true),
    ] {
        let out = step::execute(&rule, &dirty, scan.start(), &scan).unwrap();
        assert!(matches!(out, Transition::Failure), "{} leaked", rule.kind());
    }
}

#[test]
fn dirty_delayed_answers_with_a_failure_response() {
    let scan = Scan::new("abc");
    let hole = Matcher::delayed();
    hole.bind(Matcher::dot()).unwrap();
    let out = step::execute(&hole, &Gc::new(State::Dirty), scan.start(), &scan).unwrap();
    assert!(matches!(out, Transition::Response { value: None, .. }));
}

#[test]
fn foreign_state_is_a_contract_fault() {
    let scan = Scan::new("abc");
    let alien = Gc::new(State::Not { saved: scan.start() });
    let out = step::execute(&Matcher::dot(), &alien, scan.start(), &scan);
    assert!(matches!(
        out,
        Err(Fault::StateMismatch {
            matcher: "dot",
            state: "not",
        })
    ));
}

#[test]
fn yielded_states_resume_enumeration() {
    // Resuming from a yielded state is the whole backtracking story: pull
    // the solutions out by hand through the raw protocol.
    let scan = Scan::new("aa");
    let rule = Matcher::depth(Matcher::dot(), 0, UNBOUNDED, true);

    let mut state = Gc::new(State::Clean);
    let mut seen = Vec::new();
    for _ in 0..3 {
        // A tiny driver: run until the root resolves.
        let mut frames: Vec<(Rule, Gc<State>)> = Vec::new();
        let mut t = step::execute(&rule, &state, scan.start(), &scan).unwrap();
        loop {
            match t {
                Transition::Execute {
                    parent,
                    parent_state,
                    child,
                    child_state,
                    at,
                } => {
                    frames.push((parent, parent_state));
                    t = step::execute(&child, &child_state, at, &scan).unwrap();
                }
                Transition::Success { state: s, at, value }
                | Transition::Response {
                    state: s,
                    at,
                    value: Some(value),
                } => match frames.pop() {
                    None => {
                        state = s;
                        seen.push(value);
                        break;
                    }
                    Some((p, ps)) => t = step::success(&p, &ps, s, at, value).unwrap(),
                },
                Transition::Failure | Transition::Response { value: None, .. } => {
                    match frames.pop() {
                        None => break,
                        Some((p, ps)) => t = step::failure(&p, &ps).unwrap(),
                    }
                }
            }
        }
    }
    assert_eq!(seen, vec![chars("aa"), chars("a"), vec![]]);
}
