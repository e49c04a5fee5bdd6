//! SQL identifier quoting utilities
//!
//! User SQL is never parsed; these helpers only render identifiers that
//! Forma itself places around that SQL.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard. The mapping is injective, so
/// two distinct identifiers never render to the same text.
///
/// # Examples
/// ```
/// use fm_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote each identifier and join them with `", "`.
///
/// # Examples
/// ```
/// use fm_core::sql_utils::quote_ident_list;
/// assert_eq!(quote_ident_list(["id", "name"]), r#""id", "name""#);
/// ```
pub fn quote_ident_list<I, S>(idents: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    idents
        .into_iter()
        .map(|i| quote_ident(i.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
