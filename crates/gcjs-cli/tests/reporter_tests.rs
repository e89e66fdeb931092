use super::*;
use crate::driver::RewrittenFile;
use std::path::PathBuf;

fn ok(name: &str) -> FileReport {
    FileReport {
        input: PathBuf::from(name),
        result: Ok(RewrittenFile {
            code: String::new(),
            map: None,
            written: None,
        }),
    }
}

fn failed(name: &str, message: &str) -> FileReport {
    FileReport {
        input: PathBuf::from(name),
        result: Err(anyhow::anyhow!(message.to_string())),
    }
}

#[test]
fn renders_nothing_when_all_files_succeed() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.render(&[ok("a.js"), ok("b.js")]), "");
}

#[test]
fn renders_each_failure_and_a_summary() {
    let reporter = Reporter::new(false);
    let out = reporter.render(&[
        ok("a.js"),
        failed("b.js", "can't find closure dependency x.y"),
    ]);
    assert_eq!(
        out,
        "b.js - error: can't find closure dependency x.y\n\nFailed to rewrite 1 of 2 files.\n"
    );
}

#[test]
fn failure_includes_context_chain() {
    let reporter = Reporter::new(false);
    let err = anyhow::anyhow!("No such file").context("failed to read c.js");
    assert_eq!(
        reporter.format_failure("c.js", &err),
        "c.js - error: failed to read c.js: No such file"
    );
}
