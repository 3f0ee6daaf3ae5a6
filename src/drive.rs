//! A reference trampoline that interprets transition messages.
//!
//! The matchers only ever describe what should happen next; something has
//! to keep calling them. This driver is the straightforward way to do
//! that: a loop over transitions with an explicit stack of suspended
//! parents. An `Execute` pushes the parent and enters the child, a
//! resolved child pops its parent and delivers the outcome, and when the
//! stack runs out the root itself has resolved. Between solutions only the
//! root's resume state is kept; that state is a complete recipe for
//! resuming enumeration, so the next call just re-executes the root in it.

use gc::Gc;

use crate::{
    matcher::Rule,
    scan::{Cursor, Scan},
    state::{self, State},
    step::{self, Transition},
    value::{Value, ValueFmt},
    Fault,
};

/// Default cap on suspended frames. Generous for real grammars; an
/// unguarded left recursion hits it almost immediately.
pub const DEFAULT_FRAME_LIMIT: usize = 1 << 16;

/// Enumerates the solutions of one matcher over one scan.
///
/// Iterating yields `Result<Value, Fault>`: each `Ok` is one solution, a
/// `Fault` is a configuration or driver error (never a mere match
/// failure), and the stream ends when the matcher is exhausted.
pub struct Matches<'a> {
    root: Rule,
    scan: Scan<'a>,
    start: Cursor,
    state: Gc<State>,
    done: bool,
    frame_limit: usize,
    debug: bool,
}

impl<'a> Matches<'a> {
    pub fn new(root: Rule, scan: Scan<'a>) -> Matches<'a> {
        let start = scan.start();
        Matches::starting_at(root, scan, start)
    }

    /// Enumerate solutions beginning at a cursor other than the start.
    pub fn starting_at(root: Rule, scan: Scan<'a>, start: Cursor) -> Matches<'a> {
        Matches {
            root,
            scan,
            start,
            state: state::clean(),
            done: false,
            frame_limit: DEFAULT_FRAME_LIMIT,
            debug: false,
        }
    }

    /// Cap the suspended-frame stack. Left-recursive grammars grow it
    /// without bound, so a smaller cap makes them fail faster.
    pub fn frame_limit(mut self, limit: usize) -> Matches<'a> {
        self.frame_limit = limit;
        self
    }

    /// Print every transition as it is interpreted.
    pub fn debug(mut self, on: bool) -> Matches<'a> {
        self.debug = on;
        self
    }

    /// The next solution with the cursor it ended at, `Ok(None)` when the
    /// matcher is exhausted. A fault also ends the enumeration.
    pub fn next_match(&mut self) -> Result<Option<(Cursor, Value)>, Fault> {
        if self.done {
            return Ok(None);
        }
        let found = self.pump();
        if !matches!(found, Ok(Some(_))) {
            self.done = true;
        }
        found
    }

    fn pump(&mut self) -> Result<Option<(Cursor, Value)>, Fault> {
        let mut frames: Vec<(Rule, Gc<State>)> = Vec::new();
        let mut transition = step::execute(&self.root, &self.state, self.start.clone(), &self.scan)?;
        loop {
            if self.debug {
                self.trace(&frames, &transition);
            }
            let (resolved, at, outcome) = match transition {
                Transition::Execute {
                    parent,
                    parent_state,
                    child,
                    child_state,
                    at,
                } => {
                    if frames.len() >= self.frame_limit {
                        return Err(Fault::TooDeep(self.frame_limit));
                    }
                    frames.push((parent, parent_state));
                    transition = step::execute(&child, &child_state, at, &self.scan)?;
                    continue;
                }
                Transition::Success { state, at, value } => (state, at, Some(value)),
                Transition::Response { state, at, value } => (state, at, value),
                Transition::Failure => (state::dirty(), self.start.clone(), None),
            };
            transition = match (frames.pop(), outcome) {
                // The root itself resolved.
                (None, Some(value)) => {
                    self.state = resolved;
                    return Ok(Some((at, value)));
                }
                (None, None) => return Ok(None),
                (Some((parent, parent_state)), Some(value)) => {
                    step::success(&parent, &parent_state, resolved, at, value)?
                }
                (Some((parent, parent_state)), None) => step::failure(&parent, &parent_state)?,
            };
        }
    }

    fn trace(&self, frames: &[(Rule, Gc<State>)], transition: &Transition) {
        let pad = "  ".repeat(frames.len());
        match transition {
            Transition::Execute {
                parent, child, at, ..
            } => println!(
                "{}{} drives {} at {}",
                pad,
                parent.kind(),
                child.kind(),
                at.clone().offset()
            ),
            Transition::Success { at, value, .. } => {
                println!("{}success at {} with {}", pad, at.clone().offset(), ValueFmt(value))
            }
            Transition::Response {
                at,
                value: Some(value),
                ..
            } => println!("{}response at {} with {}", pad, at.clone().offset(), ValueFmt(value)),
            Transition::Response { value: None, .. } => println!("{}response: no match", pad),
            Transition::Failure => println!("{}no match", pad),
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = Result<Value, Fault>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_match() {
            Ok(Some((_, value))) => Some(Ok(value)),
            Ok(None) => None,
            Err(fault) => Some(Err(fault)),
        }
    }
}

/// Enumerate `root`'s solutions over `text` from the beginning.
pub fn matches<'a>(root: &Rule, text: &'a str) -> Matches<'a> {
    Matches::new(root.clone(), Scan::new(text))
}

/// Just the first solution, if there is one.
pub fn first_match(root: &Rule, text: &str) -> Result<Option<Value>, Fault> {
    Ok(matches(root, text).next_match()?.map(|(_, value)| value))
}
