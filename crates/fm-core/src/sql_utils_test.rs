use super::*;

#[test]
fn test_quote_ident_simple() {
    assert_eq!(quote_ident("users"), r#""users""#);
}

#[test]
fn test_quote_ident_with_embedded_quotes() {
    assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
}

#[test]
fn test_quote_ident_empty() {
    assert_eq!(quote_ident(""), r#""""#);
}

#[test]
fn test_quote_ident_with_dots() {
    // Dots are not special inside quote_ident
    assert_eq!(quote_ident("schema.table"), r#""schema.table""#);
}

#[test]
fn test_quote_ident_list_preserves_order() {
    assert_eq!(
        quote_ident_list(["b", "a", "c"]),
        r#""b", "a", "c""#
    );
}

#[test]
fn test_quote_ident_list_empty() {
    let empty: [&str; 0] = [];
    assert_eq!(quote_ident_list(empty), "");
}
