use super::*;
use gcjs_common::{Mapping, OriginalLocation, SourceMapGenerator};
use gcjs_rewriter::{NamespaceMap, StaticLookup};
use std::fs;
use tempfile::TempDir;

struct Project {
    dir: TempDir,
    lookup: Arc<StaticLookup>,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.js"), "goog.provide('app.a');\ngoog.require('app.b');\n").unwrap();
        fs::write(root.join("b.js"), "goog.provide('app.b');\n").unwrap();
        fs::write(root.join("broken.js"), "goog.require('app.missing');\n").unwrap();
        let map: NamespaceMap = [("app.a", root.join("a.js")), ("app.b", root.join("b.js"))]
            .into_iter()
            .collect();
        Project {
            dir,
            lookup: Arc::new(StaticLookup::new(map)),
        }
    }

    fn input(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("dist")
    }
}

fn config() -> Arc<LoaderConfig> {
    Arc::new(LoaderConfig::default())
}

#[tokio::test]
async fn writes_every_file_with_relative_requests() {
    let project = Project::new();
    let options = DriverOptions {
        out_dir: Some(project.out_dir()),
        source_maps: false,
    };
    let inputs = vec![project.input("a.js"), project.input("b.js")];
    let reports = run(&inputs, config(), Arc::clone(&project.lookup), &options)
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(FileReport::is_ok));
    assert_eq!(reports[0].input, inputs[0]);

    let written = fs::read_to_string(project.out_dir().join("a.js")).unwrap();
    assert_eq!(
        written,
        "\nvar app=goog.global.app=goog.global.app||{};app.b=require(\"./b.js\").app.b;app.a=app.a||{};\n;\nexports.app={\"a\":app.a};"
    );
    assert!(project.out_dir().join("b.js").exists());
    assert!(!project.out_dir().join("a.js.map").exists());
}

#[tokio::test]
async fn one_failure_does_not_stop_the_rest() {
    let project = Project::new();
    let options = DriverOptions {
        out_dir: Some(project.out_dir()),
        source_maps: false,
    };
    let inputs = vec![project.input("broken.js"), project.input("b.js")];
    let reports = run(&inputs, config(), Arc::clone(&project.lookup), &options)
        .await
        .unwrap();

    let err = reports[0].result.as_ref().unwrap_err();
    assert_eq!(err.to_string(), "can't find closure dependency app.missing");
    assert!(reports[1].is_ok());
    assert!(!project.out_dir().join("broken.js").exists());
}

#[tokio::test]
async fn single_file_without_out_dir_returns_code() {
    let project = Project::new();
    let reports = run(
        &[project.input("b.js")],
        config(),
        Arc::clone(&project.lookup),
        &DriverOptions::default(),
    )
    .await
    .unwrap();
    let file = reports[0].result.as_ref().unwrap();
    assert!(file.written.is_none());
    assert_eq!(
        file.code,
        "var app=goog.global.app=goog.global.app||{};app.b=app.b||{};\n;\nexports.app={\"b\":app.b};"
    );
}

#[tokio::test]
async fn multiple_files_need_an_out_dir() {
    let project = Project::new();
    let inputs = vec![project.input("a.js"), project.input("b.js")];
    let err = run(&inputs, config(), Arc::clone(&project.lookup), &DriverOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--out-dir"), "{err}");
}

#[tokio::test]
async fn colliding_output_names_are_rejected() {
    let project = Project::new();
    fs::create_dir_all(project.dir.path().join("nested")).unwrap();
    fs::write(project.input("nested/b.js"), "var x;").unwrap();
    let options = DriverOptions {
        out_dir: Some(project.out_dir()),
        source_maps: false,
    };
    let inputs = vec![project.input("b.js"), project.input("nested/b.js")];
    let err = run(&inputs, config(), Arc::clone(&project.lookup), &options)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("b.js"), "{err}");
}

#[tokio::test]
async fn adjacent_source_map_is_rebased_and_written() {
    let project = Project::new();
    let mut generator = SourceMapGenerator::new(Some("b.js".to_string()));
    generator.add_source(Some("b.src.js".to_string()));
    generator.add_mapping(Mapping {
        generated_line: 1,
        generated_column: 0,
        original: Some(OriginalLocation {
            source: 0,
            line: 7,
            column: 0,
            name: None,
        }),
    });
    fs::write(project.input("b.js.map"), generator.to_json()).unwrap();

    let options = DriverOptions {
        out_dir: Some(project.out_dir()),
        source_maps: true,
    };
    let reports = run(
        &[project.input("b.js")],
        config(),
        Arc::clone(&project.lookup),
        &options,
    )
    .await
    .unwrap();
    let file = reports[0].result.as_ref().unwrap();
    let map = file.map.as_ref().unwrap();
    assert_eq!(map.file.as_deref(), Some("b.js"));
    assert_eq!(map.sources, vec![Some("b.src.js".to_string())]);

    let written = fs::read_to_string(project.out_dir().join("b.js.map")).unwrap();
    let reread = RawSourceMap::from_json(&written).unwrap();
    assert_eq!(&reread, map);
}

#[tokio::test]
async fn missing_adjacent_map_is_not_an_error() {
    let project = Project::new();
    let options = DriverOptions {
        out_dir: Some(project.out_dir()),
        source_maps: true,
    };
    let reports = run(
        &[project.input("b.js")],
        config(),
        Arc::clone(&project.lookup),
        &options,
    )
    .await
    .unwrap();
    let file = reports[0].result.as_ref().unwrap();
    assert!(file.map.is_none());
}
