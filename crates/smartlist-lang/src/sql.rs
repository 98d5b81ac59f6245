//! SQL text helpers.

pub use smartlist_proto::query::quote_ident;
use smartlist_proto::query::PLACEHOLDER;

/// Quote a `table.column` reference.
pub fn qualified(table: &str, column: &str) -> String {
    format!("{}.{}", quote_ident(table), quote_ident(column))
}

/// Write `<column> <op> ?` into `buf`.
pub fn write_comparison(buf: &mut String, column: &str, op: &str) {
    buf.push_str(&quote_ident(column));
    buf.push(' ');
    buf.push_str(op);
    buf.push(' ');
    buf.push_str(PLACEHOLDER);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("title"), "\"title\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(qualified("songs", "artist_id"), "\"songs\".\"artist_id\"");
    }

    #[test]
    fn test_write_comparison() {
        let mut buf = String::new();
        write_comparison(&mut buf, "bit_rate", ">");
        assert_eq!(buf, "\"bit_rate\" > ?");
    }
}
