//! Per-invocation matcher state.
//!
//! A state records how far one matcher got at one call site, and a state
//! handed out with a success is a complete recipe for resuming enumeration
//! there later. Nothing in here is ever mutated after it is built; resuming
//! clones-and-extends, so old states stay valid for the driver to hold onto,
//! hash, or cache.

use gc::{Finalize, Gc, Trace};

use crate::{
    scan::Cursor,
    value::Value,
};

/// Parallel stacks recording a run of child matches: what each produced,
/// where each left the cursor, and how to resume each one. `cursors` also
/// holds the entry cursor up front, so it is always one longer than the
/// other two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Trace, Finalize)]
pub struct Stacks {
    pub results: Vec<Value>,
    pub cursors: Vec<Cursor>,
    pub resumes: Vec<Gc<State>>,
}

impl Stacks {
    pub(crate) fn seed(at: Cursor) -> Stacks {
        Stacks {
            results: Vec::new(),
            cursors: vec![at],
            resumes: Vec::new(),
        }
    }

    /// How many child matches are on the stacks.
    pub(crate) fn depth(&self) -> usize {
        self.results.len()
    }

    /// The cursor after the newest match (or the entry cursor at depth 0).
    pub(crate) fn top(&self) -> Cursor {
        // cursors is seeded with the entry cursor and never drained past it
        self.cursors[self.cursors.len() - 1].clone()
    }

    /// A copy with one more match recorded.
    pub(crate) fn pushed(&self, value: Value, after: Cursor, resume: Gc<State>) -> Stacks {
        let mut next = self.clone();
        next.results.push(value);
        next.cursors.push(after);
        next.resumes.push(resume);
        next
    }

    /// A copy with the newest match removed, plus that match's resume
    /// state. `None` at depth 0.
    pub(crate) fn popped(&self) -> Option<(Stacks, Gc<State>)> {
        let mut next = self.clone();
        let resume = next.resumes.pop()?;
        next.results.pop();
        next.cursors.pop();
        Some((next, resume))
    }
}

/// One partial solution in the breadth-first repetition's queue: where its
/// next extension would start, how to resume the child enumeration that
/// extends it, and what it has produced so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Trace, Finalize)]
pub struct Entry {
    pub at: Cursor,
    pub resume: Gc<State>,
    pub results: Vec<Value>,
}

/// Where one matcher invocation stands.
///
/// `Clean` and `Dirty` are universal: every matcher starts `Clean`, and a
/// matcher resumed in `Dirty` only ever fails again. The rest belong each
/// to one combinator family; feeding one to the wrong matcher is a driver
/// bug and faults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Trace, Finalize)]
pub enum State {
    /// Not yet entered at this call site.
    Clean,
    /// Exhausted; nothing left but failure.
    Dirty,
    /// Drop wrapper: the child's resume state.
    Drop(Gc<State>),
    /// Lookahead: the child's resume state and the cursor to restore.
    Look { resume: Gc<State>, saved: Cursor },
    /// Negation has produced its single solution at this cursor.
    Not { saved: Cursor },
    /// Ordered choice: resume state of the current alternative, the entry
    /// cursor every alternative starts from, and which alternative is up.
    Alt {
        resume: Gc<State>,
        saved: Cursor,
        index: usize,
    },
    /// Sequencing: one frame per matched child.
    Series(Stacks),
    /// Greedy repetition, still pushing deeper.
    Slurp(Stacks),
    /// Greedy repetition, unwinding for the next solution.
    Backtrack(Stacks),
    /// Non-greedy repetition: the frontier of partial solutions, head
    /// first, shallower before deeper.
    Grow(Vec<Entry>),
}

impl State {
    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            State::Clean => "clean",
            State::Dirty => "dirty",
            State::Drop(_) => "drop",
            State::Look { .. } => "lookahead",
            State::Not { .. } => "not",
            State::Alt { .. } => "alt",
            State::Series(_) => "series",
            State::Slurp(_) => "slurp",
            State::Backtrack(_) => "backtrack",
            State::Grow(_) => "grow",
        }
    }
}

/// Fresh `Clean` handle.
pub(crate) fn clean() -> Gc<State> {
    Gc::new(State::Clean)
}

/// Fresh `Dirty` handle.
pub(crate) fn dirty() -> Gc<State> {
    Gc::new(State::Dirty)
}
