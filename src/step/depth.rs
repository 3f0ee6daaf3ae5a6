//! Greedy repetition: depth-first over match counts.
//!
//! Matching pushes as deep as the child and the upper bound allow before
//! anything is yielded, so the deepest count comes out first. Every later
//! solution comes from unwinding: pop the newest match, ask that child for
//! its next solution, and either push back down from there or yield the
//! shallower count. Each pop retires exactly one match, so counts only
//! ever shrink between yields.

use gc::Gc;

use crate::{
    matcher::{Matcher, Repetition, Rule},
    scan::Cursor,
    state::{self, Stacks, State},
    value::{assemble, Value},
    Fault,
};

use super::{mismatch, Transition};

fn rep(matcher: &Rule) -> &Repetition {
    match &**matcher {
        Matcher::Depth(rep) => rep,
        _ => unreachable!("dispatched as depth"),
    }
}

pub(super) fn execute(matcher: &Rule, state: &Gc<State>, at: Cursor) -> Result<Transition, Fault> {
    match &**state {
        State::Clean => {
            let stacks = Stacks::seed(at);
            if rep(matcher).hi == 0 {
                // No room to match at all; zero matches is the only
                // candidate solution.
                Ok(offer(matcher, stacks))
            } else {
                Ok(push_on(matcher, stacks))
            }
        }
        // The parent wants the next, shallower-or-sideways solution.
        State::Backtrack(stacks) => Ok(unwind(matcher, stacks.clone())),
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
        // Whether we were pushing deeper or re-entered a popped child
        // sideways, a child success means one more match on the stacks.
        State::Slurp(stacks) | State::Backtrack(stacks) => {
            let deeper = stacks.pushed(value, at, resume);
            if deeper.depth() == rep(matcher).hi {
                Ok(offer(matcher, deeper))
            } else {
                Ok(push_on(matcher, deeper))
            }
        }
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    match &**state {
        // The child has no (more) matches at this depth; what is on the
        // stacks is as deep as this line goes.
        State::Slurp(stacks) | State::Backtrack(stacks) => Ok(offer(matcher, stacks.clone())),
        _ => Err(mismatch(matcher, state)),
    }
}

/// Yield the stacks as a solution if they are deep enough, otherwise keep
/// unwinding; counts below the lower bound are never emitted.
fn offer(matcher: &Rule, stacks: Stacks) -> Transition {
    let Repetition { lo, flatten, .. } = rep(matcher);
    if stacks.depth() >= *lo {
        let at = stacks.top();
        let value = assemble(&stacks.results, *flatten);
        Transition::Success {
            state: Gc::new(State::Backtrack(stacks)),
            at,
            value,
        }
    } else {
        unwind(matcher, stacks)
    }
}

/// Pop the newest match and re-enter that child for its next solution.
/// At depth zero there is nothing left to vary.
fn unwind(matcher: &Rule, stacks: Stacks) -> Transition {
    match stacks.popped() {
        None => Transition::Failure,
        Some((shorter, resume)) => {
            let at = shorter.top();
            Transition::Execute {
                parent: matcher.clone(),
                parent_state: Gc::new(State::Backtrack(shorter)),
                child: rep(matcher).child.clone(),
                child_state: resume,
                at,
            }
        }
    }
}

/// Drive a fresh child match on top of the stacks.
fn push_on(matcher: &Rule, stacks: Stacks) -> Transition {
    let at = stacks.top();
    Transition::Execute {
        parent: matcher.clone(),
        parent_state: Gc::new(State::Slurp(stacks)),
        child: rep(matcher).child.clone(),
        child_state: state::clean(),
        at,
    }
}
