use super::*;

fn no_assumed() -> IndexMap<String, Vec<String>> {
    IndexMap::new()
}

#[test]
fn test_ledger_starts_with_root() {
    let ledger = Ledger::new("goog");
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains("goog"));
    assert_eq!(ledger.nearest_ancestor("goog.dom"), Some("goog"));
    assert_eq!(ledger.nearest_ancestor("a.b"), None);
}

#[test]
fn test_ensure_from_empty_roots_at_global() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");

    let out = materializer.ensure("a.b", &mut ledger, false);
    assert_eq!(
        out,
        "var a=goog.global.a=goog.global.a||{};a.b=a.b||{};"
    );
    assert!(ledger.contains("a"));
    assert!(ledger.contains("a.b"));
}

#[test]
fn test_ensure_drop_last_leaves_leaf() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");

    let out = materializer.ensure("x.y", &mut ledger, true);
    assert_eq!(out, "var x=goog.global.x=goog.global.x||{};");
    assert!(ledger.contains("x"));
    assert!(!ledger.contains("x.y"));
}

#[test]
fn test_ensure_single_segment_with_drop_last_is_empty() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");
    assert_eq!(materializer.ensure("x", &mut ledger, true), "");
}

#[test]
fn test_ensure_is_idempotent() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");

    let first = materializer.ensure("a.b.c", &mut ledger, false);
    assert!(!first.is_empty());
    let len = ledger.len();
    assert_eq!(materializer.ensure("a.b.c", &mut ledger, false), "");
    assert_eq!(materializer.ensure("a.b", &mut ledger, false), "");
    assert_eq!(ledger.len(), len);
}

#[test]
fn test_ensure_reuses_nearest_ancestor() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");

    materializer.ensure("a.b", &mut ledger, false);
    let out = materializer.ensure("a.b.c.d", &mut ledger, false);
    assert_eq!(out, "a.b.c=a.b.c||{};a.b.c.d=a.b.c.d||{};");

    let sibling = materializer.ensure("a.x", &mut ledger, false);
    assert_eq!(sibling, "a.x=a.x||{};");
}

#[test]
fn test_ensure_under_root_uses_root_as_parent() {
    let assumed = no_assumed();
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");
    assert_eq!(
        materializer.ensure("goog.dom.query", &mut ledger, true),
        "goog.dom=goog.dom||{};"
    );
}

#[test]
fn test_assumed_ancestors_are_materialized_first() {
    let mut assumed = IndexMap::new();
    assumed.insert(
        "legacy.widget.Menu".to_string(),
        vec!["legacy.base".to_string()],
    );
    let materializer = Materializer::new("goog", &assumed);
    let mut ledger = Ledger::new("goog");

    let out = materializer.ensure("legacy.widget.Menu", &mut ledger, true);
    assert_eq!(
        out,
        "var legacy=goog.global.legacy=goog.global.legacy||{};legacy.base=legacy.base||{};legacy.widget=legacy.widget||{};"
    );
    assert!(ledger.contains("legacy.base"));
}

#[test]
fn test_custom_root() {
    let assumed = no_assumed();
    let materializer = Materializer::new("ns", &assumed);
    let mut ledger = Ledger::new("ns");
    assert_eq!(
        materializer.ensure("a", &mut ledger, false),
        "var a=ns.global.a=ns.global.a||{};"
    );
}
