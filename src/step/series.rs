//! Sequencing. Children match left to right; asking the whole series for
//! another solution re-enters the rightmost child first, so the last slot
//! varies fastest, and a failed slot backtracks one slot left. The same
//! machine serves both assembly modes; only the final value differs.

use gc::Gc;

use crate::{
    matcher::{Matcher, Rule},
    scan::Cursor,
    state::{self, Stacks, State},
    value::{assemble, Value},
    Fault,
};

use super::{mismatch, Transition};

fn parts(matcher: &Rule) -> (&[Rule], bool) {
    match &**matcher {
        Matcher::Series { items, flatten } => (items, *flatten),
        _ => unreachable!("dispatched as series"),
    }
}

pub(super) fn execute(matcher: &Rule, state: &Gc<State>, at: Cursor) -> Result<Transition, Fault> {
    let (items, _) = parts(matcher);
    match &**state {
        State::Clean => {
            if items.is_empty() {
                // An empty series is one empty match, once.
                return Ok(Transition::Success {
                    state: state::dirty(),
                    at,
                    value: Vec::new(),
                });
            }
            Ok(drive_slot(matcher, Stacks::seed(at), state::clean()))
        }
        // Next solution: re-open the newest slot.
        State::Series(stacks) => step_back(matcher, stacks),
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn success(
    matcher: &Rule,
    state: &Gc<State>,
    resume: Gc<State>,
    at: Cursor,
    value: Value,
) -> Result<Transition, Fault> {
    let (items, flatten) = parts(matcher);
    match &**state {
        State::Series(stacks) => {
            let filled = stacks.pushed(value, at.clone(), resume);
            if filled.depth() == items.len() {
                let value = assemble(&filled.results, flatten);
                Ok(Transition::Success {
                    state: Gc::new(State::Series(filled)),
                    at,
                    value,
                })
            } else {
                Ok(drive_slot(matcher, filled, state::clean()))
            }
        }
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    match &**state {
        State::Series(stacks) => step_back(matcher, stacks),
        _ => Err(mismatch(matcher, state)),
    }
}

/// Re-enter the newest filled slot for its next solution. With no filled
/// slots left there is nothing to vary, so the series is out of solutions.
fn step_back(matcher: &Rule, stacks: &Stacks) -> Result<Transition, Fault> {
    match stacks.popped() {
        None => Ok(Transition::Failure),
        Some((shorter, resume)) => Ok(drive_slot(matcher, shorter, resume)),
    }
}

/// Drive the first unfilled slot: child number `depth`, starting at the
/// cursor the previous slot ended on.
fn drive_slot(matcher: &Rule, stacks: Stacks, child_state: Gc<State>) -> Transition {
    let (items, _) = parts(matcher);
    let at = stacks.top();
    let child = items[stacks.depth()].clone();
    Transition::Execute {
        parent: matcher.clone(),
        parent_state: Gc::new(State::Series(stacks)),
        child,
        child_state,
        at,
    }
}
