use super::*;

#[test]
fn test_vlq_encode_positive() {
    assert_eq!(vlq::encode(0), "A");
    assert_eq!(vlq::encode(1), "C");
    assert_eq!(vlq::encode(15), "e");
    assert_eq!(vlq::encode(16), "gB");
}

#[test]
fn test_vlq_encode_negative() {
    assert_eq!(vlq::encode(-1), "D");
    assert_eq!(vlq::encode(-15), "f");
}

#[test]
fn test_vlq_decode() {
    for value in [-100, -1, 0, 1, 100, 1000, 123_456] {
        let encoded = vlq::encode(value);
        let (decoded, consumed) = vlq::decode(&encoded).unwrap();
        assert_eq!(decoded, value, "Failed for value {value}");
        assert_eq!(consumed, encoded.len());
    }
}

#[test]
fn test_vlq_decode_rejects_garbage() {
    assert_eq!(vlq::decode("!"), None);
    // Continuation bit set with nothing following.
    assert_eq!(vlq::decode("g"), None);
}

#[test]
fn test_decode_known_mappings() {
    // Two segments on line 0, an empty line, one generated-only segment on line 2.
    let decoded = decode_mappings("AAAA,IAAI;;E").unwrap();
    assert_eq!(decoded.len(), 3);

    assert_eq!(decoded[0].generated_line, 0);
    assert_eq!(decoded[0].generated_column, 0);
    assert_eq!(
        decoded[0].original,
        Some(OriginalLocation {
            source: 0,
            line: 0,
            column: 0,
            name: None
        })
    );

    assert_eq!(decoded[1].generated_column, 4);
    assert_eq!(decoded[1].original.map(|o| o.column), Some(4));

    assert_eq!(decoded[2].generated_line, 2);
    assert_eq!(decoded[2].generated_column, 2);
    assert_eq!(decoded[2].original, None);
}

#[test]
fn test_decode_rejects_two_field_segment() {
    let err = decode_mappings("AA").unwrap_err();
    assert!(matches!(err, SourceMapError::MalformedSegment { line: 0, .. }));
}

#[test]
fn test_generator_round_trip() {
    let mut generator = SourceMapGenerator::new(Some("out.js".to_string()));
    let source = generator.add_source(Some("in.js".to_string()));
    let name = generator.add_name("value".to_string());

    generator.add_mapping(Mapping {
        generated_line: 1,
        generated_column: 0,
        original: Some(OriginalLocation {
            source,
            line: 3,
            column: 2,
            name: Some(name),
        }),
    });
    generator.add_mapping(Mapping {
        generated_line: 0,
        generated_column: 5,
        original: Some(OriginalLocation {
            source,
            line: 0,
            column: 0,
            name: None,
        }),
    });

    let raw = generator.to_raw();
    assert_eq!(raw.version, 3);
    assert_eq!(raw.file.as_deref(), Some("out.js"));
    assert_eq!(raw.sources, vec![Some("in.js".to_string())]);
    assert_eq!(raw.names, vec!["value".to_string()]);
    assert!(raw.sources_content.is_none());

    let decoded = raw.decode_mappings().unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!((decoded[0].generated_line, decoded[0].generated_column), (0, 5));
    assert_eq!((decoded[1].generated_line, decoded[1].generated_column), (1, 0));
    assert_eq!(decoded[1].original.and_then(|o| o.name), Some(0));
    assert_eq!(decoded[1].original.map(|o| (o.line, o.column)), Some((3, 2)));
}

#[test]
fn test_json_uses_camel_case_and_skips_absent_fields() {
    let mut generator = SourceMapGenerator::new(None);
    generator.add_source_with_content(Some("a.js".to_string()), Some("var a;".to_string()));
    let json = generator.to_json();

    assert!(json.contains("\"version\":3"), "{json}");
    assert!(json.contains("\"sourcesContent\":[\"var a;\"]"), "{json}");
    assert!(!json.contains("\"file\""), "{json}");
    assert!(!json.contains("sourceRoot"), "{json}");
}

#[test]
fn test_from_json_rejects_wrong_version() {
    let err = RawSourceMap::from_json(r#"{"version":2,"sources":[],"names":[],"mappings":""}"#)
        .unwrap_err();
    assert!(matches!(err, SourceMapError::UnsupportedVersion(2)));
}

#[test]
fn test_decode_mappings_checks_source_range() {
    let raw = RawSourceMap::from_json(r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"ACAA"}"#)
        .unwrap();
    let err = raw.decode_mappings().unwrap_err();
    assert!(matches!(
        err,
        SourceMapError::SourceOutOfRange { index: 1, count: 1 }
    ));
}
