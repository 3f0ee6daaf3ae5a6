//! The single-child wrappers: Drop, Lookahead, Not, and the Delayed
//! forward reference.

use gc::Gc;

use crate::{
    matcher::{DelayedCell, Matcher, Rule},
    scan::{Cursor, Scan},
    state::{self, State},
    value::Value,
    Fault,
};

use super::{mismatch, Transition};

pub(super) fn execute(matcher: &Rule, state: &Gc<State>, at: Cursor) -> Result<Transition, Fault> {
    match (&**matcher, &**state) {
        // Drop: run the child, first time or for its next solution. The
        // wrapper itself consumes nothing before the child, so the cursor
        // the parent re-enters with is the one the child started at.
        (Matcher::Drop(child), State::Clean) => Ok(drive(matcher, state, child, state::clean(), at)),
        (Matcher::Drop(child), State::Drop(resume)) => {
            Ok(drive(matcher, state, child, resume.clone(), at))
        }

        // Lookahead: remember where we are so every success can put the
        // cursor back.
        (Matcher::Lookahead(child), State::Clean) => {
            let watching = Gc::new(State::Look {
                resume: state::clean(),
                saved: at.clone(),
            });
            Ok(drive(matcher, &watching, child, state::clean(), at))
        }
        (Matcher::Lookahead(child), State::Look { resume, saved }) => {
            Ok(drive(matcher, state, child, resume.clone(), saved.clone()))
        }

        (Matcher::Not(child), State::Clean) => {
            let negating = Gc::new(State::Not { saved: at.clone() });
            Ok(drive(matcher, &negating, child, state::clean(), at))
        }
        // Negation has its one solution already; there is no second.
        (Matcher::Not(_), State::Not { .. }) => Ok(Transition::Failure),

        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn success(
    matcher: &Rule,
    state: &Gc<State>,
    resume: Gc<State>,
    at: Cursor,
    _value: Value,
) -> Result<Transition, Fault> {
    match (&**matcher, &**state) {
        // The child matched; keep its progress, lose its output.
        (Matcher::Drop(_), State::Clean | State::Drop(_)) => Ok(Transition::Success {
            state: Gc::new(State::Drop(resume)),
            at,
            value: Vec::new(),
        }),
        // The child matched somewhere ahead; report the saved cursor as if
        // nothing was consumed.
        (Matcher::Lookahead(_), State::Look { saved, .. }) => Ok(Transition::Response {
            state: Gc::new(State::Look {
                resume,
                saved: saved.clone(),
            }),
            at: saved.clone(),
            value: Some(Vec::new()),
        }),
        // One child success is enough to sink the negation; its other
        // solutions are not consulted.
        (Matcher::Not(_), State::Not { .. }) => Ok(Transition::Failure),
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    match (&**matcher, &**state) {
        (Matcher::Drop(_), State::Clean | State::Drop(_)) => Ok(Transition::Failure),
        (Matcher::Lookahead(_), State::Look { .. }) => Ok(Transition::Failure),
        (Matcher::Not(_), State::Not { saved }) => Ok(Transition::Success {
            state: state.clone(),
            at: saved.clone(),
            value: Vec::new(),
        }),
        _ => Err(mismatch(matcher, state)),
    }
}

/// Delayed hands everything to its child untouched, so the child's states
/// flow through the parent as if the indirection were not there.
pub(super) fn delegate(
    cell: &DelayedCell,
    state: &Gc<State>,
    at: Cursor,
    scan: &Scan,
) -> Result<Transition, Fault> {
    if matches!(**state, State::Dirty) {
        return Ok(Transition::Response {
            state: state.clone(),
            at,
            value: None,
        });
    }
    let child = match &*cell.borrow() {
        Some(child) => child.clone(),
        None => return Err(Fault::Unbound),
    };
    super::execute(&child, state, at, scan)
}

fn drive(
    matcher: &Rule,
    parent_state: &Gc<State>,
    child: &Rule,
    child_state: Gc<State>,
    at: Cursor,
) -> Transition {
    Transition::Execute {
        parent: matcher.clone(),
        parent_state: parent_state.clone(),
        child: child.clone(),
        child_state,
        at,
    }
}
