//! Ordered choice. Alternatives are tried strictly left to right, each one
//! exhausted (across backtracking re-entries) before the next is started,
//! and every alternative starts from the same saved cursor.

use gc::Gc;

use crate::{
    matcher::{Matcher, Rule},
    scan::Cursor,
    state::{self, State},
    value::Value,
    Fault,
};

use super::{mismatch, Transition};

pub(super) fn execute(matcher: &Rule, state: &Gc<State>, at: Cursor) -> Result<Transition, Fault> {
    let items = match &**matcher {
        Matcher::Alt(items) => items,
        _ => unreachable!("dispatched as alt"),
    };
    match &**state {
        State::Clean => match items.first() {
            // Nothing to choose from.
            None => Ok(Transition::Failure),
            Some(first) => Ok(pick(matcher, first, state::clean(), at, 0)),
        },
        // The parent wants another solution: same alternative, resumed
        // where it left off.
        State::Alt {
            resume,
            saved,
            index,
        } => Ok(pick(matcher, &items[*index], resume.clone(), saved.clone(), *index)),
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
    match &**state {
        State::Alt { saved, index, .. } => Ok(Transition::Success {
            state: Gc::new(State::Alt {
                resume,
                saved: saved.clone(),
                index: *index,
            }),
            at,
            value,
        }),
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    let items = match &**matcher {
        Matcher::Alt(items) => items,
        _ => unreachable!("dispatched as alt"),
    };
    match &**state {
        State::Alt { saved, index, .. } => {
            let next = index + 1;
            match items.get(next) {
                // That was the last alternative.
                None => Ok(Transition::Failure),
                Some(item) => Ok(pick(matcher, item, state::clean(), saved.clone(), next)),
            }
        }
        _ => Err(mismatch(matcher, state)),
    }
}

fn pick(matcher: &Rule, item: &Rule, child_state: Gc<State>, saved: Cursor, index: usize) -> Transition {
    Transition::Execute {
        parent: matcher.clone(),
        parent_state: Gc::new(State::Alt {
            resume: child_state.clone(),
            saved: saved.clone(),
            index,
        }),
        child: item.clone(),
        child_state,
        at: saved,
    }
}
