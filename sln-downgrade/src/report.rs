use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::format::TargetFormat;
use crate::project::{ProjectChanges, ProjectOutcome};

/// What one conversion run did, in solution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub solution: PathBuf,
    /// Path of the written solution file.
    pub output: PathBuf,
    pub target: TargetFormat,
    pub projects: Vec<ProjectRecord>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: ProjectOutcome,
}

/// A `Project(` line that was emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// 1-based line number, counted after the byte order mark.
    pub line: usize,
    pub name: Option<String>,
    pub path: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    VirtualFolder,
    UnsupportedExtension,
    Malformed,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::VirtualFolder => "virtual-folder",
            SkipReason::UnsupportedExtension => "unsupported-extension",
            SkipReason::Malformed => "malformed",
        }
    }
}

impl ConversionReport {
    pub fn converted(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| matches!(p.outcome, ProjectOutcome::Converted(_)))
            .count()
    }

    pub fn already_converted(&self) -> usize {
        self.projects.len() - self.converted()
    }
}

/// Render the one-line run summary.
pub fn render_summary(report: &ConversionReport) -> String {
    format!(
        "convert_summary target={} converted={} already_converted={} skipped={} output={}",
        report.target,
        report.converted(),
        report.already_converted(),
        report.skipped.len(),
        report.output.display()
    )
    .cyan()
    .to_string()
}

/// Render one line per project and skipped entry, followed by the summary.
pub fn render_text(report: &ConversionReport) -> String {
    let mut out = Vec::new();
    for project in &report.projects {
        let line = match &project.outcome {
            ProjectOutcome::Converted(changes) => format!(
                "CONVERTED {} -> {} ({})",
                project.name,
                project.destination.display(),
                describe_changes(changes)
            )
            .green()
            .to_string(),
            ProjectOutcome::AlreadyConverted => format!(
                "UNCHANGED {} -> {} (already in target format)",
                project.name,
                project.destination.display()
            )
            .yellow()
            .to_string(),
        };
        out.push(line);
    }
    for entry in &report.skipped {
        out.push(format!(
            "SKIPPED line={} name={} path={} reason={}",
            entry.line,
            entry.name.as_deref().unwrap_or("-"),
            entry.path.as_deref().unwrap_or("-"),
            entry.reason.as_str()
        ));
    }
    out.push(render_summary(report));
    out.join("\n")
}

fn describe_changes(changes: &ProjectChanges) -> String {
    let mut parts = Vec::new();
    if changes.product_version_updated {
        parts.push("product-version".to_string());
    }
    let counts = [
        ("old-tools-version", changes.old_tools_version_removed),
        ("framework-removed", changes.target_frameworks_removed),
        ("framework-clamped", changes.target_frameworks_clamped),
        ("references", changes.references_renamed),
        ("imports", changes.imports_rewritten),
        ("silverlight", changes.silverlight_imports_clamped),
        ("bootstrapper", changes.bootstrapper_packages_changed),
    ];
    for (label, count) in counts {
        if count > 0 {
            parts.push(format!("{label}={count}"));
        }
    }
    if changes.target_framework_inserted {
        parts.push("framework-inserted".to_string());
    }
    if parts.is_empty() {
        "tools-version".to_string()
    } else {
        format!("tools-version {}", parts.join(" "))
    }
}
