//! DDL rewriting for external tables.
//!
//! `SHOW CREATE TABLE` returns a statement of the form
//! `CREATE TABLE cat.schema.tbl (...) USING ... LOCATION '...' TBLPROPERTIES (...)`.
//! Re-registering the table under another catalog means retargeting the
//! leading table reference, turning the statement into a create-or-replace,
//! and cutting the catalog-specific `TBLPROPERTIES` clause.

use crate::sql::TableRef;
use std::borrow::Cow;

/// Keyword opening the table-properties clause.
pub const TABLE_PROPERTIES: &str = "TBLPROPERTIES";

/// The two statements needed to move an external table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTableDdl {
    /// Create-or-replace statement targeting the destination catalog.
    pub replay: String,
    /// The captured statement, used to restore the source table.
    pub rollback: String,
}

/// Derive the replay and rollback statements from captured DDL.
///
/// Returns `None` when the DDL does not start with `CREATE TABLE` for
/// `source`; executing it would not register the destination table.
pub fn prepare_external_ddl(
    captured: &str,
    source: &TableRef<'_>,
    destination: &TableRef<'_>,
) -> Option<ExternalTableDdl> {
    let rewritten = rewrite_table_reference(captured, source, destination);
    if matches!(rewritten, Cow::Borrowed(_)) {
        return None;
    }

    Some(ExternalTableDdl {
        replay: strip_table_properties(&rewritten).to_string(),
        rollback: strip_table_properties(captured).to_string(),
    })
}

/// Rewrite a leading `CREATE TABLE <source>` into
/// `CREATE OR REPLACE TABLE <destination>`.
///
/// Any other input, including already rewritten DDL, is returned unchanged.
pub fn rewrite_table_reference<'a>(
    ddl: &'a str,
    source: &TableRef<'_>,
    destination: &TableRef<'_>,
) -> Cow<'a, str> {
    match parse_create_table(ddl) {
        Some(head) if source.matches_parts(&head.name) => Cow::Owned(format!(
            "{}CREATE OR REPLACE TABLE {}{}",
            &ddl[..head.start],
            destination,
            &ddl[head.end..]
        )),
        _ => Cow::Borrowed(ddl),
    }
}

/// Cut the statement before its `TBLPROPERTIES` clause.
///
/// Occurrences inside string literals or quoted identifiers are ignored.
pub fn strip_table_properties(ddl: &str) -> &str {
    match find_keyword(ddl, TABLE_PROPERTIES) {
        Some(idx) => ddl[..idx].trim_end(),
        None => ddl.trim_end(),
    }
}

/// Byte span and name parts of a leading `CREATE TABLE <name>`.
struct CreateTableHead {
    start: usize,
    end: usize,
    name: Vec<String>,
}

fn parse_create_table(ddl: &str) -> Option<CreateTableHead> {
    let start = ddl.len() - ddl.trim_start().len();
    let pos = keyword(ddl, start, "CREATE")?;
    let pos = whitespace(ddl, pos)?;
    let pos = keyword(ddl, pos, "TABLE")?;
    let pos = whitespace(ddl, pos)?;
    let (name, end) = qualified_name(ddl, pos)?;

    Some(CreateTableHead { start, end, name })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Match `word` case-insensitively at `pos`, ending on a word boundary.
fn keyword(text: &str, pos: usize, word: &str) -> Option<usize> {
    let end = pos + word.len();
    let candidate = text.get(pos..end)?;
    if !candidate.eq_ignore_ascii_case(word) {
        return None;
    }
    match text[end..].chars().next() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(end),
    }
}

/// Skip at least one whitespace character.
fn whitespace(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let trimmed = rest.trim_start();
    if trimmed.len() == rest.len() {
        None
    } else {
        Some(pos + rest.len() - trimmed.len())
    }
}

fn qualified_name(text: &str, mut pos: usize) -> Option<(Vec<String>, usize)> {
    let mut parts = Vec::new();
    loop {
        let (part, next) = identifier(text, pos)?;
        parts.push(part);
        pos = next;
        if text[pos..].starts_with('.') {
            pos += 1;
        } else {
            return Some((parts, pos));
        }
    }
}

fn identifier(text: &str, pos: usize) -> Option<(String, usize)> {
    let rest = &text[pos..];

    if let Some(quoted) = rest.strip_prefix('`') {
        let mut name = String::new();
        let mut chars = quoted.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '`' {
                if let Some(&(_, '`')) = chars.peek() {
                    chars.next();
                    name.push('`');
                    continue;
                }
                return Some((name, pos + 1 + i + 1));
            }
            name.push(c);
        }
        // unterminated
        return None;
    }

    let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    if len == 0 {
        return None;
    }
    Some((rest[..len].to_string(), pos + len))
}

/// Find `word` outside quotes, on word boundaries.
fn find_keyword(text: &str, word: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && q != b'`' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'\'' || b == b'"' || b == b'`' {
                    quote = Some(b);
                } else if b.is_ascii_alphabetic()
                    && (i == 0 || !is_ident_byte(bytes[i - 1]))
                    && keyword(text, i, word).is_some()
                {
                    return Some(i);
                }
            }
        }
        i += 1;
    }

    None
}

/// Non-ASCII bytes belong to multi-byte characters and count as identifier text.
fn is_ident_byte(b: u8) -> bool {
    !b.is_ascii() || b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURED: &str = "CREATE TABLE old_cat.sales.orders (\n  id INT,\n  amount DOUBLE)\nUSING delta\nLOCATION 's3://bucket/orders'\nTBLPROPERTIES (\n  'delta.minReaderVersion' = '1')\n";

    fn refs() -> (TableRef<'static>, TableRef<'static>) {
        let source = TableRef::new("old_cat", "sales", "orders");
        (source, source.in_catalog("new_cat"))
    }

    #[test]
    fn test_rewrite_table_reference() {
        let (source, destination) = refs();
        let rewritten = rewrite_table_reference(CAPTURED, &source, &destination);

        assert!(rewritten.starts_with("CREATE OR REPLACE TABLE `new_cat`.`sales`.`orders` (\n  id INT"));
        assert!(rewritten.contains("LOCATION 's3://bucket/orders'"));
    }

    #[test]
    fn test_rewrite_quoted_and_lowercase() {
        let (source, destination) = refs();
        let ddl = "  create   table `old_cat`.`sales`.`orders` (id INT)";
        let rewritten = rewrite_table_reference(ddl, &source, &destination);

        assert_eq!(
            rewritten,
            "  CREATE OR REPLACE TABLE `new_cat`.`sales`.`orders` (id INT)"
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let (source, destination) = refs();
        let once = rewrite_table_reference(CAPTURED, &source, &destination).into_owned();
        let twice = rewrite_table_reference(&once, &source, &destination);

        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice, once);

        let already = "CREATE TABLE new_cat.sales.orders (id INT)";
        assert_eq!(
            rewrite_table_reference(already, &source, &destination),
            already
        );
    }

    #[test]
    fn test_rewrite_ignores_other_tables() {
        let (source, destination) = refs();
        let ddl = "CREATE TABLE old_cat.sales.orders_archive (id INT)";
        assert!(matches!(
            rewrite_table_reference(ddl, &source, &destination),
            Cow::Borrowed(_)
        ));

        let view = "CREATE VIEW old_cat.sales.orders AS SELECT 1";
        assert!(matches!(
            rewrite_table_reference(view, &source, &destination),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_strip_table_properties() {
        let stripped = strip_table_properties(CAPTURED);
        assert!(stripped.ends_with("LOCATION 's3://bucket/orders'"));
        assert!(!stripped.contains(TABLE_PROPERTIES));

        assert_eq!(strip_table_properties("CREATE TABLE a.b.c (id INT)\n"), "CREATE TABLE a.b.c (id INT)");
    }

    #[test]
    fn test_strip_ignores_quoted_keyword() {
        let ddl = "CREATE TABLE a.b.c (id INT COMMENT 'see TBLPROPERTIES') TBLPROPERTIES ('x' = 'y')";
        assert_eq!(
            strip_table_properties(ddl),
            "CREATE TABLE a.b.c (id INT COMMENT 'see TBLPROPERTIES')"
        );

        let ddl = "CREATE TABLE a.b.c (`mytblproperties` INT, note STRING COMMENT 'it\\'s TBLPROPERTIES')";
        assert_eq!(strip_table_properties(ddl), ddl);
    }

    #[test]
    fn test_prepare_external_ddl() {
        let (source, destination) = refs();
        let ddl = prepare_external_ddl(CAPTURED, &source, &destination).unwrap();

        assert_eq!(
            ddl.replay,
            "CREATE OR REPLACE TABLE `new_cat`.`sales`.`orders` (\n  id INT,\n  amount DOUBLE)\nUSING delta\nLOCATION 's3://bucket/orders'"
        );
        assert_eq!(
            ddl.rollback,
            "CREATE TABLE old_cat.sales.orders (\n  id INT,\n  amount DOUBLE)\nUSING delta\nLOCATION 's3://bucket/orders'"
        );
    }

    #[test]
    fn test_prepare_rejects_foreign_ddl() {
        let (source, destination) = refs();
        assert!(prepare_external_ddl("CREATE TABLE x.y.z (id INT)", &source, &destination).is_none());
        assert!(prepare_external_ddl("", &source, &destination).is_none());
    }
}
