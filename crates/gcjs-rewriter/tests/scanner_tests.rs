use super::*;

fn scan(source: &str) -> ScannedDeclarations {
    DeclarationScanner::new("goog").scan(source).unwrap()
}

fn namespaces(decls: &[Declaration]) -> Vec<&str> {
    decls.iter().map(|d| d.namespace.as_str()).collect()
}

#[test]
fn test_scan_orders_by_first_occurrence() {
    let source = "goog.provide('app.b');\ngoog.provide('app.a');\ngoog.require('x.z');\ngoog.require('x.y');\n";
    let scanned = scan(source);
    assert_eq!(namespaces(&scanned.provides), vec!["app.b", "app.a"]);
    assert_eq!(namespaces(&scanned.requires), vec!["x.z", "x.y"]);
    assert!(scanned.provides.iter().all(|d| d.kind == DeclarationKind::Provide));
    assert!(scanned.requires.iter().all(|d| d.kind == DeclarationKind::Require));
}

#[test]
fn test_scan_accepts_quotes_whitespace_and_missing_semicolon() {
    let source = "goog.require(\"a.b\")\ngoog.require ( 'c.d' ) ;\ngoog.provide('e')";
    let scanned = scan(source);
    assert_eq!(namespaces(&scanned.requires), vec!["a.b", "c.d"]);
    assert_eq!(namespaces(&scanned.provides), vec!["e"]);

    // The trailing `;` is only swallowed when it directly follows `)`.
    let second = &scanned.requires[1];
    assert_eq!(second.first_match(source), "goog.require ( 'c.d' )");
    assert_eq!(scanned.requires[0].first_match(source), "goog.require(\"a.b\")");
}

#[test]
fn test_scan_records_exact_spans() {
    let source = "var x;goog.provide('a.b');var y;";
    let scanned = scan(source);
    let provide = &scanned.provides[0];
    assert_eq!(provide.spans, vec![Span::new(6, 26)]);
    assert_eq!(provide.first_match(source), "goog.provide('a.b');");
}

#[test]
fn test_duplicates_collapse_but_keep_every_span() {
    let source = "goog.require('a.b');\ngoog.require(\"a.b\");\ngoog.require('c');\n";
    let scanned = scan(source);
    assert_eq!(namespaces(&scanned.requires), vec!["a.b", "c"]);
    assert_eq!(scanned.requires[0].spans.len(), 2);
    assert_eq!(scanned.requires[1].spans.len(), 1);
}

#[test]
fn test_mismatched_quotes_are_not_declarations() {
    let scanned = scan("goog.require('a.b\");");
    assert!(scanned.is_empty());
}

#[test]
fn test_identifier_prefixed_root_is_ignored() {
    let scanned = scan("mygoog.provide('a');\nother.goog.require('b');\n$goog.provide('c');");
    assert!(scanned.is_empty());
}

#[test]
fn test_commented_require_is_fatal_and_lists_every_match() {
    let source = "goog.provide('a');\n// goog.require('b');\ngoog.require('c');\n//goog.require(\"d\")\n";
    let err = DeclarationScanner::new("goog").scan(source).unwrap_err();
    match err {
        RewriteError::CommentedRequire { root, matches } => {
            assert_eq!(root, "goog");
            assert_eq!(matches.len(), 2);
            assert_eq!(matches[0].line, 2);
            assert_eq!(matches[0].text, "// goog.require('b');");
            assert_eq!(matches[1].line, 4);
            assert_eq!(matches[1].text, "//goog.require(\"d\")");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_commented_provide_is_not_fatal() {
    let scanned = scan("// goog.provide('old.thing');\n");
    assert_eq!(namespaces(&scanned.provides), vec!["old.thing"]);
}

#[test]
fn test_custom_root() {
    let scanner = DeclarationScanner::new("my$ns");
    let scanned = scanner.scan("my$ns.provide('a.b');goog.provide('c');").unwrap();
    assert_eq!(namespaces(&scanned.provides), vec!["a.b"]);
    assert_eq!(scanner.root(), "my$ns");
}

#[test]
fn test_scan_provides_ignores_commented_requires() {
    let scanner = DeclarationScanner::new("goog");
    let provides = scanner.scan_provides("goog.provide('a');\n// goog.require('b');\ngoog.provide('a');goog.provide('c');");
    assert_eq!(provides, vec!["a", "c"]);
}

#[test]
fn test_empty_source() {
    assert!(scan("").is_empty());
}

#[test]
fn test_for_root_reuses_compiled_scanner() {
    let first = DeclarationScanner::for_root("goog");
    let second = DeclarationScanner::for_root("goog");
    assert!(Arc::ptr_eq(&first, &second));

    let other = DeclarationScanner::for_root("my$ns");
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.root(), "my$ns");
}
