use crate::driver::FileReport;
use colored::Colorize;

/// Renders per-file failures and the run summary for stderr.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// One block per failed file, then a summary line if anything failed.
    pub fn render(&self, reports: &[FileReport]) -> String {
        let mut out = String::new();
        let mut failed = 0usize;
        for report in reports {
            if let Err(err) = &report.result {
                failed += 1;
                out.push_str(&self.format_failure(&report.input.display().to_string(), err));
                out.push('\n');
            }
        }
        if failed > 0 {
            out.push('\n');
            out.push_str(&self.format_summary(failed, reports.len()));
            out.push('\n');
        }
        out
    }

    pub fn format_failure(&self, file: &str, err: &anyhow::Error) -> String {
        let label = if self.color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        let file = if self.color {
            file.cyan().to_string()
        } else {
            file.to_string()
        };
        format!("{file} - {label}: {err:#}")
    }

    fn format_summary(&self, failed: usize, total: usize) -> String {
        let noun = if total == 1 { "file" } else { "files" };
        let text = format!("Failed to rewrite {failed} of {total} {noun}.");
        if self.color {
            text.red().to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
