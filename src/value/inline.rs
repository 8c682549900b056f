//! Parses tables written inline as text.
//!
//! Two shapes are accepted:
//!
//! - `[[name,age],[Alice,30],["Bob, Jr.",25]]` where the first list holds
//!   the column labels and each following list is a row.
//! - `[a,b,c]` which is a single column table labelled
//!   [`ANONYMOUS`][crate::ANONYMOUS].
//!
//! Cells may be bare or quoted with `"` or `'`. Quoted cells support `\`
//! escapes. An empty bare cell is an absent value.

use std::iter::Peekable;
use std::str::Chars;

use crate::value::{Table, ANONYMOUS};

/// Parse inline table text, returning `None` if it is malformed.
pub fn parse(text: &str) -> Option<Table> {
    let mut s = Scanner {
        chars: text.trim().chars().peekable(),
    };
    s.expect('[')?;
    s.skip_ws();
    let table = if s.chars.peek() == Some(&'[') {
        let labels = s.list()?;
        let mut table = Table::new(labels.into_iter().map(Option::unwrap_or_default));
        loop {
            s.skip_ws();
            match s.chars.next()? {
                ',' => {
                    s.skip_ws();
                    table.push_record(s.list()?);
                }
                ']' => break,
                _ => return None,
            }
        }
        table
    } else {
        let mut table = Table::new([ANONYMOUS]);
        for cell in s.cells()? {
            table.push_record(vec![cell]);
        }
        table
    };
    s.skip_ws();
    match s.chars.next() {
        None => Some(table),
        Some(_) => None,
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Scanner<'_> {
    fn expect(&mut self, c: char) -> Option<()> {
        (self.chars.next()? == c).then_some(())
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn list(&mut self) -> Option<Vec<Option<String>>> {
        self.expect('[')?;
        self.cells()
    }

    /// Reads comma separated cells up to and including the closing `]`.
    fn cells(&mut self) -> Option<Vec<Option<String>>> {
        let mut cells = Vec::new();
        loop {
            self.skip_ws();
            let cell = match *self.chars.peek()? {
                ']' if cells.is_empty() => {
                    self.chars.next();
                    return Some(cells);
                }
                q @ ('"' | '\'') => {
                    self.chars.next();
                    Some(self.quoted(q)?)
                }
                _ => self.bare(),
            };
            cells.push(cell);
            self.skip_ws();
            match self.chars.next()? {
                ',' => continue,
                ']' => return Some(cells),
                _ => return None,
            }
        }
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                '\\' => out.push(self.chars.next()?),
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    fn bare(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.chars.next_if(|c| !matches!(c, ',' | ']')) {
            out.push(c);
        }
        let trimmed = out.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}
