//! The one-shot matchers. Each consumes zero or more tokens, answers a
//! single success or failure on its first call, and hands out `Dirty` so a
//! resumed branch cannot produce a second solution.

use crate::{
    matcher::{Matcher, Rule},
    scan::{Cursor, Scan},
    state::{self, State},
    value::{Item, Value},
};
use gc::Gc;

use super::{mismatch, Transition};
use crate::Fault;

pub(super) fn execute(
    matcher: &Rule,
    state: &Gc<State>,
    at: Cursor,
    scan: &Scan,
) -> Result<Transition, Fault> {
    if !matches!(**state, State::Clean) {
        return Err(mismatch(matcher, state));
    }
    Ok(match &**matcher {
        Matcher::Epsilon => one_shot(at, Vec::new()),
        Matcher::Insert(item) => one_shot(at, vec![item.clone()]),
        Matcher::Dot => match scan.next(at) {
            Some((token, after)) => one_shot(after, vec![Item::Char(token)]),
            None => Transition::Failure,
        },
        Matcher::Fail => Transition::Failure,
        Matcher::Equal(text) => {
            let mut here = at;
            for want in text.chars() {
                match scan.next(here) {
                    Some((got, after)) if got == want => here = after,
                    // Mismatch or the input ran out first.
                    _ => return Ok(Transition::Failure),
                }
            }
            one_shot(here, vec![Item::Text(text.clone())])
        }
        Matcher::Eos => {
            if scan.at_end(at.clone()) {
                one_shot(at, Vec::new())
            } else {
                Transition::Failure
            }
        }
        Matcher::Pattern { regex, .. } => match regex.find(scan.tail(at.clone())) {
            // The pattern is \A-anchored, so the end of the match is
            // exactly how far to advance.
            Some(found) => one_shot(
                scan.forward(at, found.end()),
                vec![Item::text(found.as_str())],
            ),
            None => Transition::Failure,
        },
        _ => unreachable!("dispatched as an atom"),
    })
}

fn one_shot(at: Cursor, value: Value) -> Transition {
    Transition::Success {
        state: state::dirty(),
        at,
        value,
    }
}
