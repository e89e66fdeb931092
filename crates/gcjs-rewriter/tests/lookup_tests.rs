use super::*;

#[test]
fn test_namespace_map_basics() {
    let mut map: NamespaceMap = [("a.b", "/src/a/b.js")].into_iter().collect();
    assert_eq!(map.len(), 1);
    assert!(map.contains("a.b"));
    assert_eq!(map.get("a.b"), Some(Path::new("/src/a/b.js")));
    assert_eq!(map.get("a"), None);

    let previous = map.insert("a.b", "/src/other.js");
    assert_eq!(previous, Some(PathBuf::from("/src/a/b.js")));
    assert_eq!(map.get("a.b"), Some(Path::new("/src/other.js")));
}

#[test]
fn test_module_request_without_context_is_quoted_path() {
    assert_eq!(
        module_request(Path::new("/path/to/y"), None),
        "\"/path/to/y\""
    );
}

#[cfg(unix)]
#[test]
fn test_module_request_relative_to_context() {
    assert_eq!(
        module_request(Path::new("/proj/src/a/b.js"), Some(Path::new("/proj/src"))),
        "\"./a/b.js\""
    );
    assert_eq!(
        module_request(Path::new("/proj/lib/c.js"), Some(Path::new("/proj/src/app"))),
        "\"../../lib/c.js\""
    );
    assert_eq!(
        module_request(Path::new("/proj/src/x.js"), Some(Path::new("/proj/src"))),
        "\"./x.js\""
    );
}

#[test]
fn test_module_request_keeps_relative_paths() {
    assert_eq!(
        module_request(Path::new("lib/c.js"), Some(Path::new("/proj"))),
        "\"lib/c.js\""
    );
}

#[test]
fn test_static_lookup_returns_shared_map() {
    let lookup = StaticLookup::new([("x.y", "/path/to/y")].into_iter().collect());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let map = runtime
        .block_on(lookup.namespace_map(&LoaderConfig::default()))
        .unwrap();
    assert!(Arc::ptr_eq(&map, &lookup.0));
}
