use super::*;

#[test]
fn default_args_leave_configuration_untouched() {
    let args = CliArgs::try_parse_from(["gcjs", "a.js"]).expect("default args should parse");
    assert_eq!(args.files, vec![PathBuf::from("a.js")]);
    assert_eq!(args.overrides(), PartialConfig::default());
    assert!(!args.show_config);
    assert!(args.out_dir.is_none());
}

#[test]
fn override_flags_map_to_config_layer() {
    let args = CliArgs::try_parse_from([
        "gcjs",
        "--path",
        "src",
        "--path",
        "lib",
        "--es6mode",
        "--collapse-prefix",
        "bb.",
        "--collapse-separator",
        "$",
        "--no-watch",
        "-o",
        "dist",
        "x.js",
    ])
    .expect("args should parse");

    let overrides = args.overrides();
    assert_eq!(
        overrides.paths,
        Some(vec![PathBuf::from("src"), PathBuf::from("lib")])
    );
    assert_eq!(overrides.es6_mode, Some(true));
    assert_eq!(overrides.collapse_prefixes, Some(vec!["bb.".to_string()]));
    assert_eq!(overrides.collapse_separator.as_deref(), Some("$"));
    assert_eq!(overrides.watch, Some(false));
    assert_eq!(overrides.namespace_root, None);
    assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
}

#[test]
fn later_watch_flag_wins() {
    let args = CliArgs::try_parse_from(["gcjs", "--no-watch", "--watch"]).unwrap();
    assert_eq!(args.overrides().watch, Some(true));

    let args = CliArgs::try_parse_from(["gcjs", "--watch"]).unwrap();
    assert_eq!(args.overrides().watch, Some(true));
}

#[test]
fn es6_mode_alias_is_accepted() {
    let args = CliArgs::try_parse_from(["gcjs", "--es6-mode"]).unwrap();
    assert!(args.es6_mode);
}
