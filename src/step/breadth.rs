//! Non-greedy repetition: level-order over match counts.
//!
//! Shorter solutions must all come out before any longer one, and the
//! longer ones are found by extending each shorter one in turn, so instead
//! of one stack this keeps a queue of partial solutions, shallower before
//! deeper. The head is yielded when it becomes the front (if it has enough
//! matches), then grown: its child enumeration is pumped for siblings, each
//! extension joining the back of the queue, until it runs dry and the head
//! retires.

use gc::Gc;

use crate::{
    matcher::{Matcher, Repetition, Rule},
    scan::Cursor,
    state::{self, Entry, State},
    value::{assemble, Value},
    Fault,
};

use super::{mismatch, Transition};

fn rep(matcher: &Rule) -> &Repetition {
    match &**matcher {
        Matcher::Breadth(rep) => rep,
        _ => unreachable!("dispatched as breadth"),
    }
}

pub(super) fn execute(matcher: &Rule, state: &Gc<State>, at: Cursor) -> Result<Transition, Fault> {
    match &**state {
        State::Clean => {
            let queue = vec![Entry {
                at,
                resume: state::clean(),
                results: Vec::new(),
            }];
            // The zero-match solution is the head; it may yield right away.
            Ok(advance(matcher, queue, true))
        }
        // The head was already yielded; expand the frontier behind it.
        State::Grow(queue) => Ok(advance(matcher, queue.clone(), false)),
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
        State::Grow(queue) => {
            // The head found one more extension: queue it at the back as a
            // fresh partial solution, then keep pumping the head for
            // siblings with the resume state the child just handed back.
            let mut grown = queue.clone();
            let mut results = grown[0].results.clone();
            results.push(value);
            grown.push(Entry {
                at,
                resume: state::clean(),
                results,
            });
            grown[0].resume = resume.clone();
            let head_at = grown[0].at.clone();
            Ok(Transition::Execute {
                parent: matcher.clone(),
                parent_state: Gc::new(State::Grow(grown)),
                child: rep(matcher).child.clone(),
                child_state: resume,
                at: head_at,
            })
        }
        _ => Err(mismatch(matcher, state)),
    }
}

pub(super) fn failure(matcher: &Rule, state: &Gc<State>) -> Result<Transition, Fault> {
    match &**state {
        // The head has no more extensions; retire it and move on to the
        // next partial solution, which has not been yielded yet.
        State::Grow(queue) => Ok(advance(matcher, queue[1..].to_vec(), true)),
        _ => Err(mismatch(matcher, state)),
    }
}

/// Walk the queue forward: yield the front entry if it is allowed to
/// (deep enough, and not yielded before), retire entries that cannot be
/// extended, and otherwise drive the child to extend the front entry.
/// Entries deeper than the upper bound are never created, and the queue
/// is depth-ordered, so yielded counts only ever grow.
fn advance(matcher: &Rule, mut queue: Vec<Entry>, mut may_yield: bool) -> Transition {
    let Repetition { lo, hi, flatten, .. } = rep(matcher);
    loop {
        let head = match queue.first() {
            None => return Transition::Failure,
            Some(head) => head,
        };
        let depth = head.results.len();
        if may_yield && depth >= *lo {
            let at = head.at.clone();
            let value = assemble(&head.results, *flatten);
            return Transition::Success {
                state: Gc::new(State::Grow(queue)),
                at,
                value,
            };
        }
        if depth >= *hi {
            // Full up; nothing can be extended from here.
            queue.remove(0);
            may_yield = true;
            continue;
        }
        let child_state = head.resume.clone();
        let at = head.at.clone();
        return Transition::Execute {
            parent: matcher.clone(),
            parent_state: Gc::new(State::Grow(queue)),
            child: rep(matcher).child.clone(),
            child_state,
            at,
        };
    }
}
