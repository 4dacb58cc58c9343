use std::path::{Path, PathBuf};

use crate::format::TargetFormat;
use crate::naming::PostfixRule;

/// Fully resolved inputs of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub solution_path: PathBuf,
    pub target: TargetFormat,
    /// Where the renamed solution and project copies are written.
    pub output_dir: PathBuf,
    pub solution_postfix: PostfixRule,
    pub project_postfix: PostfixRule,
    /// Also trim `BootstrapperPackage` items the target cannot offer.
    pub fix_bootstrapper: bool,
}

impl ConversionOptions {
    /// Defaults: target 2008, output next to the solution, no renaming.
    pub fn new(solution_path: impl Into<PathBuf>) -> Self {
        let solution_path = solution_path.into();
        let output_dir = solution_dir(&solution_path);
        Self {
            solution_path,
            target: TargetFormat::default(),
            output_dir,
            solution_postfix: PostfixRule::default(),
            project_postfix: PostfixRule::default(),
            fix_bootstrapper: false,
        }
    }

    pub fn with_target(mut self, target: TargetFormat) -> Self {
        self.target = target;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Directory that relative project paths in the solution resolve against.
    pub fn solution_dir(&self) -> PathBuf {
        solution_dir(&self.solution_path)
    }
}

fn solution_dir(solution_path: &Path) -> PathBuf {
    match solution_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
