//! # patter
//!
//! A backtracking matcher engine that talks to its driver in messages.
//!
//! A grammar is a graph of immutable [`Matcher`]s: a handful of one-shot
//! atoms (literal text, any token, a regex, end of input) and the
//! combinators that arrange them (ordered choice, sequencing, bounded
//! repetition both greedy and non-greedy, lookahead, negation, and a
//! late-bound hole for recursion). None of them ever call each other.
//! Instead, each is a little reentrant state machine: poke it with
//! [`step::execute`] and it answers with one [`step::Transition`], either
//! resolving on the spot or naming a child to run and the state to wake it
//! back up in. A driver loops over those messages with an explicit frame
//! stack; [`drive::Matches`] is the one that ships.
//!
//! The payoff of all this indirection is backtracking as data. Every
//! success carries a [`state::State`] that completely describes how to
//! resume enumeration from that point, so "give me the next parse" is just
//! re-executing a matcher in the state it last handed out. Choice points
//! never hold stack frames hostage, deep grammars never overflow the call
//! stack, and a driver is free to pause, interleave, or cache between any
//! two messages.
//!
//! ```
//! use patter::{first_match, Item, Matcher};
//!
//! let greeting = Matcher::seq(vec![
//!     Matcher::equal("hello"),
//!     Matcher::drop(Matcher::pattern(r"\s+")?),
//!     Matcher::equal("world"),
//!     Matcher::eos(),
//! ]);
//! let value = first_match(&greeting, "hello  world")?.unwrap();
//! assert_eq!(value, vec![Item::text("hello"), Item::text("world")]);
//! # Ok::<(), patter::Fault>(())
//! ```

pub mod drive;
pub mod matcher;
pub mod scan;
pub mod state;
pub mod step;
pub mod value;

use thiserror::Error;

pub use drive::{first_match, matches, Matches};
pub use matcher::{Matcher, Rule, UNBOUNDED};
pub use scan::{Cursor, Scan};
pub use state::State;
pub use step::Transition;
pub use value::{Item, Value, ValueFmt};

/// Something went wrong with the engine itself, as opposed to input that
/// merely does not match. A mere mismatch is the `Failure` transition and
/// never an error; a `Fault` aborts the parse.
#[derive(Error, Debug)]
pub enum Fault {
    /// A pattern that does not compile as a regex.
    #[error("pattern does not compile: {0}")]
    BadPattern(#[from] regex::Error),
    /// A delayed matcher was executed before anything was bound to it.
    #[error("delayed matcher was never bound")]
    Unbound,
    /// A delayed matcher can only be bound once.
    #[error("delayed matcher bound twice")]
    Rebound,
    /// Only a delayed matcher can be bound.
    #[error("bind target is {0}, not a delayed matcher")]
    BindTarget(&'static str),
    /// A matcher was handed a state kind it does not recognise; that is a
    /// driver bug, not bad input.
    #[error("{matcher} matcher cannot continue from a {state} state")]
    StateMismatch {
        matcher: &'static str,
        state: &'static str,
    },
    /// The driver's suspended-frame stack hit its cap, which is how
    /// unguarded left recursion surfaces.
    #[error("more than {0} suspended matchers; grammar is likely left-recursive")]
    TooDeep(usize),
}
