//! What a match produces: flat or nested sequences of output elements.

use std::fmt;

use gc::{Finalize, Trace};
use itertools::Itertools;

/// One element of a match's output.
///
/// `Char` comes out of the any-token atom, `Text` out of the literal and
/// regex atoms (a matched string stays one element, it does not shatter into
/// chars), and `List` out of the non-flattening combinators, which wrap each
/// child's whole output as a single element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Trace, Finalize)]
pub enum Item {
    Char(char),
    Text(String),
    List(Vec<Item>),
}

impl Item {
    pub fn text<S: Into<String>>(s: S) -> Item {
        Item::Text(s.into())
    }
}

/// The output of one successful match. The empty vector is the empty value;
/// it vanishes under concatenation, which is exactly what silent matchers
/// like lookahead rely on.
pub type Value = Vec<Item>;

/// Combine child outputs into one Value.
///
/// Flattening concatenates everything into a single sequence (empty child
/// outputs disappear); otherwise each child output becomes one nested
/// element, so the caller gets a sequence-of-sequences.
pub(crate) fn assemble(results: &[Value], flatten: bool) -> Value {
    if flatten {
        results.iter().flatten().cloned().collect()
    } else {
        results.iter().cloned().map(Item::List).collect()
    }
}

/// Adapter to print a Value; `Vec<Item>` can't carry a Display of its own.
pub struct ValueFmt<'a>(pub &'a [Item]);

impl fmt::Display for ValueFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Char(c) => write!(f, "{:?}", c),
            Item::Text(s) => write!(f, "{:?}", s),
            Item::List(items) => write!(f, "{}", ValueFmt(items)),
        }
    }
}
