//! The input text and the cursors that point into it.

use gc::{Finalize, Trace};

/// A position in a [`Scan`], measured in bytes from the start of the text.
///
/// Cursors are opaque to matchers: they only ever come from [`Scan::start`]
/// or [`Scan::next`], get stashed inside states, and go back into the scan.
/// They hash and compare cheaply so a driver can key caches on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Trace, Finalize)]
pub struct Cursor(usize);

impl Cursor {
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Read-only view of the text being matched.
///
/// This is the whole source contract: ask whether a cursor is at the end,
/// step one token (a `char`) forward, or take the remaining text as a slice
/// for the regex atom. Nothing here ever mutates.
#[derive(Debug, Clone, Copy)]
pub struct Scan<'a> {
    text: &'a str,
}

impl<'a> Scan<'a> {
    pub fn new(text: &'a str) -> Scan<'a> {
        Scan { text }
    }

    pub fn start(&self) -> Cursor {
        Cursor(0)
    }

    pub fn at_end(&self, at: Cursor) -> bool {
        at.0 >= self.text.len()
    }

    /// One token and the cursor just past it, or `None` at the end.
    pub fn next(&self, at: Cursor) -> Option<(char, Cursor)> {
        let c = self.text[at.0..].chars().next()?;
        Some((c, Cursor(at.0 + c.len_utf8())))
    }

    /// Everything from the cursor to the end of the text.
    pub fn tail(&self, at: Cursor) -> &'a str {
        &self.text[at.0..]
    }

    /// Jump forward over a span some other machinery already measured,
    /// like a regex match. `bytes` must land on a char boundary.
    pub fn forward(&self, at: Cursor, bytes: usize) -> Cursor {
        Cursor(at.0 + bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking() {
        let scan = Scan::new("ab");
        let c0 = scan.start();
        assert!(!scan.at_end(c0.clone()));

        let (a, c1) = scan.next(c0).unwrap();
        assert_eq!(a, 'a');
        let (b, c2) = scan.next(c1).unwrap();
        assert_eq!(b, 'b');
        assert!(scan.at_end(c2.clone()));
        assert!(scan.next(c2).is_none());
    }

    #[test]
    fn multibyte_tokens() {
        let scan = Scan::new("héllo");
        let (h, c1) = scan.next(scan.start()).unwrap();
        assert_eq!(h, 'h');
        let (e, c2) = scan.next(c1).unwrap();
        assert_eq!(e, 'é');
        // é is two bytes, so the tail resumes past both.
        assert_eq!(scan.tail(c2.clone()), "llo");
        assert_eq!(c2.offset(), 3);
    }
}
