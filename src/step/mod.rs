//! The transition machines behind every matcher.
//!
//! Matchers never call each other. Each entry point here does a bounded
//! amount of work and hands back exactly one [`Transition`] for the driver
//! to interpret:
//!
//! - [`execute`] starts a matcher at a cursor, or resumes one in a state it
//!   handed out earlier to enumerate its next solution.
//! - [`success`] delivers a child's success back to the parent that asked
//!   for it, along with the child's resume state.
//! - [`failure`] delivers a child's failure.
//!
//! The `Execute` transition is the suspension point: it names a child to
//! run and the parent (with its state) to wake up once the child resolves.
//! This is what turns the naturally recursive matching process into a flat
//! loop with explicit frames, so backtracking can wander arbitrarily deep
//! without touching the call stack.

mod alt;
mod atom;
mod breadth;
mod depth;
mod series;
mod wrap;

use gc::Gc;

use crate::{
    matcher::{Matcher, Rule},
    scan::{Cursor, Scan},
    state::State,
    value::Value,
    Fault,
};

/// What a matcher tells the driver to do next.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Run `child` at `at` in `child_state`; when it resolves, deliver the
    /// outcome to `parent` in `parent_state`.
    Execute {
        parent: Rule,
        parent_state: Gc<State>,
        child: Rule,
        child_state: Gc<State>,
        at: Cursor,
    },
    /// One solution: its value, the cursor after it, and the state to
    /// resume from for the next solution.
    Success {
        state: Gc<State>,
        at: Cursor,
        value: Value,
    },
    /// An already-resolved outcome threaded through the driver without
    /// dispatching a child: `Some` behaves as a success, `None` as a
    /// failure.
    Response {
        state: Gc<State>,
        at: Cursor,
        value: Option<Value>,
    },
    /// No (further) match here. Ordinary, and what drives backtracking.
    Failure,
}

/// Start or resume `matcher` at `at`.
pub fn execute(
    matcher: &Rule,
    state: &Gc<State>,
    at: Cursor,
    scan: &Scan,
) -> Result<Transition, Fault> {
    // Delayed passes everything through, including Dirty, which it answers
    // with a failure Response of its own rather than the bare sentinel.
    if let Matcher::Delayed(cell) = &**matcher {
        return wrap::delegate(cell, state, at, scan);
    }
    if matches!(**state, State::Dirty) {
        // Universal: an exhausted branch only ever fails again.
        return Ok(Transition::Failure);
    }
    match &**matcher {
        Matcher::Epsilon
        | Matcher::Insert(_)
        | Matcher::Dot
        | Matcher::Fail
        | Matcher::Equal(_)
        | Matcher::Eos
        | Matcher::Pattern { .. } => atom::execute(matcher, state, at, scan),
        Matcher::Drop(_) | Matcher::Lookahead(_) | Matcher::Not(_) => {
            wrap::execute(matcher, state, at)
        }
        Matcher::Alt(_) => alt::execute(matcher, state, at),
        Matcher::Series { .. } => series::execute(matcher, state, at),
        Matcher::Depth(_) => depth::execute(matcher, state, at),
        Matcher::Breadth(_) => breadth::execute(matcher, state, at),
        Matcher::Delayed(_) => unreachable!("delegated above"),
    }
}

/// Deliver a child's success to the parent that requested it. `resume` is
/// the child's own resume state, `at` the cursor after the child's match.
pub fn success(
    matcher: &Rule,
    state: &Gc<State>,
    resume: Gc<State>,
    at: Cursor,
    value: Value,
) -> Result<Transition, Fault> {
    match &**matcher {
        Matcher::Drop(_) | Matcher::Lookahead(_) | Matcher::Not(_) => {
            wrap::success(matcher, state, resume, at, value)
        }
        Matcher::Alt(_) => alt::success(matcher, state, resume, at, value),
        Matcher::Series { .. } => series::success(matcher, state, resume, at, value),
        Matcher::Depth(_) => depth::success(matcher, state, resume, at, value),
        Matcher::Breadth(_) => breadth::success(matcher, state, resume, at, value),
        // Atoms and Delayed never dispatch children, so they have no
        // business receiving an outcome.
        _ => Err(mismatch(matcher, state)),
    }
}

/// Deliver a child's failure to the parent that requested it.
pub fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    match &**matcher {
        Matcher::Drop(_) | Matcher::Lookahead(_) | Matcher::Not(_) => {
            wrap::failure(matcher, state)
        }
        Matcher::Alt(_) => alt::failure(matcher, state),
        Matcher::Series { .. } => series::failure(matcher, state),
        Matcher::Depth(_) => depth::failure(matcher, state),
        Matcher::Breadth(_) => breadth::failure(matcher, state),
        _ => Err(mismatch(matcher, state)),
    }
}

/// A matcher met a state kind it does not recognise. That is a driver bug,
/// not a match failure, and it names both parties.
pub(crate) fn mismatch(matcher: &Matcher, state: &State) -> Fault {
    Fault::StateMismatch {
        matcher: matcher.kind(),
        state: state.kind(),
    }
}
