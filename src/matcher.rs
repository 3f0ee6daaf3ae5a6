//! The matcher algebra: every rule the engine knows how to run.
//!
//! Matchers are immutable descriptions. Building one does no matching at
//! all; the state machines in [`crate::step`] give each constructor its
//! runtime meaning. Children are shared through [`Gc`] because `Delayed`
//! can tie genuine cycles for recursive grammars, which plain refcounting
//! would leak.

use derivative::Derivative;
use gc::{Finalize, Gc, GcCell, Trace};
use regex::Regex;

use crate::{value::Item, Fault};

/// A shared handle to a matcher. All constructors hand these out.
pub type Rule = Gc<Matcher>;

/// Upper repetition bound meaning "no upper bound".
pub const UNBOUNDED: usize = usize::MAX;

/// The late-bound slot inside a `Delayed` matcher.
pub type DelayedCell = GcCell<Option<Rule>>;

/// Bounds and options shared by the two repetition matchers.
#[derive(Derivative, Trace, Finalize, PartialEq, Eq)]
#[derivative(Debug)]
pub struct Repetition {
    pub child: Rule,
    pub lo: usize,
    pub hi: usize,
    pub flatten: bool,
}

/// One parsing rule.
///
/// Structural things (same constructor, same fields) are the same matcher;
/// only `Delayed` is compared by identity, which is also what lets equality
/// and hashing terminate on cyclic grammars.
#[derive(Derivative, Trace, Finalize)]
#[derivative(Debug)]
pub enum Matcher {
    /// Match nothing, produce nothing.
    Epsilon,
    /// Match nothing, produce the given element out of thin air.
    Insert(Item),
    /// Match any one token.
    Dot,
    /// Never match.
    Fail,
    /// Match this exact text, producing it as a single element.
    Equal(String),
    /// Match only at the end of the input.
    Eos,
    /// Match a regex anchored at the cursor.
    Pattern {
        /// The pattern as the caller wrote it.
        source: String,
        #[derivative(Debug = "ignore")]
        #[unsafe_ignore_trace]
        regex: Regex,
    },
    /// Run the child, throw its output away.
    Drop(Rule),
    /// Run the child, then pretend no input was consumed.
    Lookahead(Rule),
    /// Succeed with nothing exactly when the child cannot match.
    Not(Rule),
    /// Ordered choice, first to last.
    Alt(Vec<Rule>),
    /// Children in order; `flatten` picks concatenated or nested output.
    Series { items: Vec<Rule>, flatten: bool },
    /// Bounded repetition, deepest count first.
    Depth(Repetition),
    /// Bounded repetition, shallowest count first.
    Breadth(Repetition),
    /// Forward reference, bound to its child exactly once.
    Delayed(#[derivative(Debug = "ignore")] DelayedCell),
}

impl Matcher {
    pub fn epsilon() -> Rule {
        Gc::new(Matcher::Epsilon)
    }

    pub fn insert(item: Item) -> Rule {
        Gc::new(Matcher::Insert(item))
    }

    pub fn dot() -> Rule {
        Gc::new(Matcher::Dot)
    }

    pub fn fail() -> Rule {
        Gc::new(Matcher::Fail)
    }

    pub fn equal<S: Into<String>>(text: S) -> Rule {
        Gc::new(Matcher::Equal(text.into()))
    }

    pub fn eos() -> Rule {
        Gc::new(Matcher::Eos)
    }

    /// Compile a regex pattern, anchored at the cursor so the matched
    /// length is always exact.
    pub fn pattern(source: &str) -> Result<Rule, Fault> {
        let regex = Regex::new(&format!(r"\A(?:{})", source))?;
        Ok(Gc::new(Matcher::Pattern {
            source: source.to_owned(),
            regex,
        }))
    }

    /// Same as [`Matcher::pattern`] but starting from an already compiled
    /// regex. The pattern is re-anchored.
    pub fn pattern_from(regex: &Regex) -> Result<Rule, Fault> {
        Matcher::pattern(regex.as_str())
    }

    // Named for the combinator, not the destructor.
    #[allow(clippy::should_implement_trait)]
    pub fn drop(child: Rule) -> Rule {
        Gc::new(Matcher::Drop(child))
    }

    pub fn lookahead(child: Rule) -> Rule {
        Gc::new(Matcher::Lookahead(child))
    }

    pub fn not(child: Rule) -> Rule {
        Gc::new(Matcher::Not(child))
    }

    pub fn alt(items: Vec<Rule>) -> Rule {
        Gc::new(Matcher::Alt(items))
    }

    /// Sequence with concatenated output.
    pub fn seq(items: Vec<Rule>) -> Rule {
        Matcher::series(items, true)
    }

    /// Sequence keeping each child's output as one nested element.
    pub fn and(items: Vec<Rule>) -> Rule {
        Matcher::series(items, false)
    }

    pub fn series(items: Vec<Rule>, flatten: bool) -> Rule {
        Gc::new(Matcher::Series { items, flatten })
    }

    pub fn depth(child: Rule, lo: usize, hi: usize, flatten: bool) -> Rule {
        Gc::new(Matcher::Depth(Repetition {
            child,
            lo,
            hi,
            flatten,
        }))
    }

    pub fn breadth(child: Rule, lo: usize, hi: usize, flatten: bool) -> Rule {
        Gc::new(Matcher::Breadth(Repetition {
            child,
            lo,
            hi,
            flatten,
        }))
    }

    /// Greedy flattening repetition, the common case.
    /// Use [`Matcher::repeat_with`] to pick the other behaviors.
    pub fn repeat(child: Rule, lo: usize, hi: usize) -> Rule {
        Matcher::repeat_with(child, lo, hi, true, true)
    }

    pub fn repeat_with(child: Rule, lo: usize, hi: usize, flatten: bool, greedy: bool) -> Rule {
        if greedy {
            Matcher::depth(child, lo, hi, flatten)
        } else {
            Matcher::breadth(child, lo, hi, flatten)
        }
    }

    /// An unbound forward reference. Point it at a real matcher with
    /// [`Matcher::bind`] before parsing; recursive grammars bind it to
    /// something that mentions it.
    pub fn delayed() -> Rule {
        Gc::new(Matcher::Delayed(GcCell::new(None)))
    }

    /// Bind a `Delayed` matcher to its child. Exactly once.
    pub fn bind(&self, child: Rule) -> Result<(), Fault> {
        match self {
            Matcher::Delayed(cell) => {
                let mut slot = cell.borrow_mut();
                if slot.is_some() {
                    return Err(Fault::Rebound);
                }
                *slot = Some(child);
                Ok(())
            }
            other => Err(Fault::BindTarget(other.kind())),
        }
    }

    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Matcher::Epsilon => "epsilon",
            Matcher::Insert(_) => "insert",
            Matcher::Dot => "dot",
            Matcher::Fail => "fail",
            Matcher::Equal(_) => "equal",
            Matcher::Eos => "eos",
            Matcher::Pattern { .. } => "pattern",
            Matcher::Drop(_) => "drop",
            Matcher::Lookahead(_) => "lookahead",
            Matcher::Not(_) => "not",
            Matcher::Alt(_) => "alt",
            Matcher::Series { .. } => "series",
            Matcher::Depth(_) => "depth",
            Matcher::Breadth(_) => "breadth",
            Matcher::Delayed(_) => "delayed",
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        use Matcher::*;
        match (self, other) {
            (Epsilon, Epsilon) | (Dot, Dot) | (Fail, Fail) | (Eos, Eos) => true,
            (Insert(a), Insert(b)) => a == b,
            (Equal(a), Equal(b)) => a == b,
            // A pattern is its source text; the compiled side is derived.
            (Pattern { source: a, .. }, Pattern { source: b, .. }) => a == b,
            (Drop(a), Drop(b)) => a == b,
            (Lookahead(a), Lookahead(b)) => a == b,
            (Not(a), Not(b)) => a == b,
            (Alt(a), Alt(b)) => a == b,
            (
                Series {
                    items: a,
                    flatten: fa,
                },
                Series {
                    items: b,
                    flatten: fb,
                },
            ) => fa == fb && a == b,
            (Depth(a), Depth(b)) => a == b,
            (Breadth(a), Breadth(b)) => a == b,
            // Identity, not structure: walking into the cell would chase
            // the cycle forever on recursive grammars.
            (Delayed(..), Delayed(..)) => std::ptr::eq(self, other),
            _ => false,
        }
    }
}

impl Eq for Matcher {}

impl std::hash::Hash for Matcher {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        use Matcher::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Epsilon | Dot | Fail | Eos => {}
            Insert(item) => item.hash(state),
            Equal(text) => text.hash(state),
            Pattern { source, .. } => source.hash(state),
            Drop(child) | Lookahead(child) | Not(child) => child.hash(state),
            Alt(items) => items.hash(state),
            Series { items, flatten } => {
                items.hash(state);
                flatten.hash(state);
            }
            Depth(rep) | Breadth(rep) => {
                rep.child.hash(state);
                rep.lo.hash(state);
                rep.hi.hash(state);
                rep.flatten.hash(state);
            }
            Delayed(..) => std::ptr::hash(self, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(m: &Rule) -> u64 {
        let mut h = DefaultHasher::new();
        m.hash(&mut h);
        h.finish()
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Matcher::equal("ab"), Matcher::equal("ab"));
        assert_ne!(Matcher::equal("ab"), Matcher::equal("ba"));
        assert_eq!(
            Matcher::seq(vec![Matcher::dot(), Matcher::eos()]),
            Matcher::seq(vec![Matcher::dot(), Matcher::eos()]),
        );
        // Same items, different assembly.
        assert_ne!(
            Matcher::seq(vec![Matcher::dot()]),
            Matcher::and(vec![Matcher::dot()]),
        );
    }

    #[test]
    fn patterns_compare_by_source() {
        let a = Matcher::pattern("[0-9]+").unwrap();
        let b = Matcher::pattern("[0-9]+").unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn delayed_is_identity() {
        let a = Matcher::delayed();
        let b = Matcher::delayed();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn cyclic_grammar_equality_terminates() {
        let hole = Matcher::delayed();
        let grammar = Matcher::alt(vec![
            Matcher::seq(vec![Matcher::equal("1"), hole.clone()]),
            Matcher::equal("1"),
        ]);
        hole.bind(grammar.clone()).unwrap();

        // Two handles to the same cyclic graph: must terminate, and agree.
        assert_eq!(grammar, grammar.clone());
        assert_eq!(hash_of(&grammar), hash_of(&grammar.clone()));
    }

    #[test]
    fn binding_twice_is_refused() {
        let hole = Matcher::delayed();
        hole.bind(Matcher::dot()).unwrap();
        assert!(matches!(hole.bind(Matcher::dot()), Err(Fault::Rebound)));
    }

    #[test]
    fn binding_non_delayed_is_refused() {
        let not_a_hole = Matcher::dot();
        assert!(matches!(
            not_a_hole.bind(Matcher::dot()),
            Err(Fault::BindTarget("dot"))
        ));
    }
}
