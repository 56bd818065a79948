use std::str::Split;

/// Iterator over the non-empty, trimmed clauses of a statement.
///
/// Clone it to walk the same statement again.
#[derive(Debug, Clone)]
pub struct Clauses<'a> {
    inner: Split<'a, char>,
}

/// Split `statement` on every `.` and drop the pieces that are blank after trimming.
///
/// There is no abbreviation or decimal handling: `"pi is 3.14"` yields `"pi is 3"` and `"14"`.
pub fn split(statement: &str) -> Clauses<'_> {
    Clauses {
        inner: statement.split('.'),
    }
}

impl<'a> Iterator for Clauses<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let clause = self.inner.next()?.trim();
            if !clause.is_empty() {
                return Some(clause);
            }
        }
    }
}

impl std::iter::FusedIterator for Clauses<'_> {}
