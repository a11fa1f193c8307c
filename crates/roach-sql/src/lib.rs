//! SQL statements and rendering.
//!
//! Build access-control and DDL statements as typed values, then render them
//! to SQL text. Every identifier goes through [`Ident`] and every string
//! literal through [`Lit`], so callers never interpolate names by hand.

mod render;
pub use render::*;

mod stmt;
pub use stmt::*;

/// A PostgreSQL string literal wrapper.
///
/// Display writes the value escaped and quoted with single quotes.
///
/// # Example
/// ```
/// use roach_sql::Lit;
/// assert_eq!(format!("{}", Lit("foo")), "'foo'");
/// assert_eq!(format!("{}", Lit("it's")), "'it''s'");
/// ```
pub struct Lit<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Lit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'")?;
        for c in self.0.as_ref().chars() {
            if c == '\'' {
                write!(f, "''")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "'")
    }
}

/// A PostgreSQL identifier wrapper.
///
/// Display writes the value escaped and quoted with double quotes.
///
/// # Example
/// ```
/// use roach_sql::Ident;
/// assert_eq!(format!("{}", Ident("defaultdb")), "\"defaultdb\"");
/// assert_eq!(format!("{}", Ident("bla\"h")), "\"bla\"\"h\"");
/// ```
pub struct Ident<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Ident<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"")?;
        for c in self.0.as_ref().chars() {
            if c == '"' {
                write!(f, "\"\"")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "\"")
    }
}

/// Escape a string literal for SQL.
pub fn escape_string(s: &str) -> String {
    format!("{}", Lit(s))
}

/// Quote a CockroachDB identifier.
///
/// Always quotes, so reserved words (`user`, `order`, `table`) and mixed-case
/// names survive verbatim. Doubles any embedded quotes.
///
/// ```
/// assert_eq!(roach_sql::quote_ident("MyRole"), "\"MyRole\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("{}", Ident(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_keeps_case_and_reserved_words() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("OrdersAdmin"), "\"OrdersAdmin\"");
        assert_eq!(quote_ident(""), "\"\"");
    }

    #[test]
    fn quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident("\"; DROP ROLE x; --"), "\"\"\"; DROP ROLE x; --\"");
    }

    #[test]
    fn escape_string_doubles_single_quotes() {
        assert_eq!(escape_string("pa'ss"), "'pa''ss'");
        assert_eq!(escape_string(""), "''");
    }
}
