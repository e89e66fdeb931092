use clap::Parser;
use gcjs_rewriter::PartialConfig;
use std::path::PathBuf;

/// CLI arguments for the gcjs binary.
#[derive(Parser, Debug)]
#[command(
    name = "gcjs",
    version,
    about = "Rewrite goog.provide/goog.require namespace declarations into CommonJS modules"
)]
pub struct CliArgs {
    /// Files to rewrite.
    pub files: Vec<PathBuf>,

    /// JSON configuration file holding defaults and named `profiles`.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Configuration profile to apply on top of the defaults.
    #[arg(long)]
    pub profile: Option<String>,

    // ==================== Per-invocation Overrides ====================
    /// Root directory to scan for provided namespaces (repeatable).
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Invalidate the namespace map when files under the roots change.
    #[arg(long, overrides_with = "no_watch")]
    pub watch: bool,

    /// Never watch the roots.
    #[arg(long = "no-watch")]
    pub no_watch: bool,

    /// Emit `exports.default` and the `__esModule` marker.
    #[arg(long = "es6mode", alias = "es6-mode")]
    pub es6_mode: bool,

    /// Namespace prefix to flatten into a single identifier (repeatable).
    #[arg(long = "collapse-prefix", value_name = "PREFIX")]
    pub collapse_prefixes: Vec<String>,

    /// Separator used when flattening collapsed namespaces.
    #[arg(long = "collapse-separator", value_name = "SEP")]
    pub collapse_separator: Option<String>,

    /// Global object the declarations hang off.
    #[arg(long = "namespace-root", value_name = "NAME")]
    pub namespace_root: Option<String>,

    // ==================== Output ====================
    /// Directory to write rewritten files (and maps) into.
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Read `<file>.map` next to each input and write a re-based map.
    #[arg(long = "source-map")]
    pub source_map: bool,

    /// Print the merged configuration as JSON and exit.
    #[arg(long = "show-config")]
    pub show_config: bool,

    /// Colorize error output (defaults to whether stderr is a terminal).
    #[arg(long)]
    pub pretty: Option<bool>,
}

impl CliArgs {
    /// The override layer built from command-line flags.
    ///
    /// Flags that were not given leave the configuration untouched.
    pub fn overrides(&self) -> PartialConfig {
        let watch = if self.no_watch {
            Some(false)
        } else if self.watch {
            Some(true)
        } else {
            None
        };
        PartialConfig {
            paths: (!self.paths.is_empty()).then(|| self.paths.clone()),
            watch,
            es6_mode: self.es6_mode.then_some(true),
            collapse_prefixes: (!self.collapse_prefixes.is_empty())
                .then(|| self.collapse_prefixes.clone()),
            collapse_separator: self.collapse_separator.clone(),
            namespace_root: self.namespace_root.clone(),
            ..PartialConfig::default()
        }
    }
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
