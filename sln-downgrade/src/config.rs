//! Optional `sln-downgrade.toml` settings and their merge with CLI flags.
//!
//! Precedence is CLI flag, then config file, then the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ConvertError;
use crate::format::describe;
use crate::naming::PostfixRule;
use crate::options::ConversionOptions;

/// Looked up next to the solution when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "sln-downgrade.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Target identifier such as `"2008"`.
    pub target: Option<String>,
    /// Output directory; relative paths are resolved against the config
    /// file's directory by [`load_config`].
    pub output: Option<PathBuf>,
    pub fix_bootstrapper: Option<bool>,
    #[serde(default)]
    pub solution: PostfixConfig,
    #[serde(default)]
    pub project: PostfixConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostfixConfig {
    pub postfix: Option<String>,
    pub replace: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a config file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut config = parse_config(&raw, path.display().to_string())?;

    if let Some(base) = path.parent() {
        config.output = config.output.take().map(|output| {
            if output.is_relative() {
                base.join(output)
            } else {
                output
            }
        });
    }
    Ok(config)
}

fn parse_config(raw: &str, path: String) -> Result<FileConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
}

/// `sln-downgrade.toml` next to `solution_path`, if it exists.
pub fn discover(solution_path: &Path) -> Option<PathBuf> {
    let candidate = ConversionOptions::new(solution_path)
        .solution_dir()
        .join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub target: Option<String>,
    pub output: Option<PathBuf>,
    pub solution_postfix: Option<String>,
    pub replace_solution_postfix: Option<String>,
    pub project_postfix: Option<String>,
    pub replace_project_postfix: Option<String>,
    pub fix_bootstrapper: bool,
}

/// Merge CLI overrides, file settings and defaults into run options.
///
/// # Errors
///
/// [`ConvertError::UnsupportedFormat`] when the chosen target is unknown.
pub fn resolve_options(
    solution_path: &Path,
    file: Option<&FileConfig>,
    overrides: &Overrides,
) -> Result<ConversionOptions, ConvertError> {
    let defaults = FileConfig::default();
    let file = file.unwrap_or(&defaults);

    let target = overrides
        .target
        .as_deref()
        .or(file.target.as_deref())
        .map(|id| describe(id).map(|descriptor| descriptor.target))
        .transpose()?
        .unwrap_or_default();

    let mut options = ConversionOptions::new(solution_path).with_target(target);
    if let Some(output) = overrides.output.as_ref().or(file.output.as_ref()) {
        options.output_dir = output.clone();
    }
    options.solution_postfix = postfix_rule(
        &overrides.solution_postfix,
        &overrides.replace_solution_postfix,
        &file.solution,
    );
    options.project_postfix = postfix_rule(
        &overrides.project_postfix,
        &overrides.replace_project_postfix,
        &file.project,
    );
    options.fix_bootstrapper = overrides.fix_bootstrapper || file.fix_bootstrapper.unwrap_or(false);
    Ok(options)
}

fn postfix_rule(postfix: &Option<String>, replace: &Option<String>, file: &PostfixConfig) -> PostfixRule {
    PostfixRule::new(
        postfix.clone().or_else(|| file.postfix.clone()).unwrap_or_default(),
        replace.clone().or_else(|| file.replace.clone()).unwrap_or_default(),
    )
}
