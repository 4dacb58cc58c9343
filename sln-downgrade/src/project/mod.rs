//! Structural downgrade of managed MSBuild project files.
//!
//! A project is edited in a fixed order of steps. The first step doubles as
//! a gate: a project whose `ToolsVersion` already matches the target is
//! reported as [`ProjectOutcome::AlreadyConverted`] and left exactly as it
//! was copied, which makes repeated runs harmless.
//!
//! ## Steps
//!
//! 1. [`versions::apply_tools_version`]: set, insert or remove `ToolsVersion`
//! 2. [`versions::apply_product_version`]: overwrite `ProductVersion`
//! 3. [`versions::remove_old_tools_version`]: drop `OldToolsVersion`
//! 4. [`versions::normalize_target_framework`]: remove/clamp/insert
//!    `TargetFrameworkVersion`
//! 5. [`references::rename_project_references`]: keep `ProjectReference`
//!    paths pointing at the renamed copies
//! 6. [`imports::swap_tools_path_token`]: `MSBuildToolsPath` vs `MSBuildBinPath`
//! 7. [`imports::clamp_silverlight_version`]: 2008 only
//! 8. [`bootstrapper::fix_bootstrapper_packages`]: opt-in

use std::path::Path;

use msbuild_xml::{parse_file, write_file, XmlNode};
use serde::Serialize;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format::FormatDescriptor;
use crate::options::ConversionOptions;

pub mod bootstrapper;
pub mod imports;
pub mod references;
pub mod versions;

pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Extensions of the project files this tool knows how to downgrade.
pub const MANAGED_PROJECT_EXTENSIONS: [&str; 2] = [".csproj", ".vbproj"];

/// Whether `path` names a `.csproj` or `.vbproj` file (case-sensitive).
pub fn is_managed_project(path: &str) -> bool {
    MANAGED_PROJECT_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}

/// Per-step edit counts for one converted project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectChanges {
    pub product_version_updated: bool,
    pub old_tools_version_removed: usize,
    pub target_frameworks_removed: usize,
    pub target_frameworks_clamped: usize,
    pub target_framework_inserted: bool,
    pub references_renamed: usize,
    pub imports_rewritten: usize,
    pub silverlight_imports_clamped: usize,
    pub bootstrapper_packages_changed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectOutcome {
    Converted(ProjectChanges),
    /// `ToolsVersion` already matched the target; the file was not touched.
    AlreadyConverted,
}

/// Applies the ordered downgrade steps for one target format.
#[derive(Debug, Clone, Copy)]
pub struct ProjectTransformer<'a> {
    descriptor: FormatDescriptor,
    options: &'a ConversionOptions,
}

impl<'a> ProjectTransformer<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            descriptor: options.target.descriptor(),
            options,
        }
    }

    /// Transform the project file at `path` in place.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::ProjectXml`] when the file is not well-formed XML
    /// - [`ConvertError::InvalidProjectFile`] when the root is not an MSBuild
    ///   `<Project>` element
    /// - [`ConvertError::ProjectWrite`] when the result cannot be saved
    pub fn convert_file(&self, path: &Path) -> Result<ProjectOutcome> {
        let mut doc = parse_file(path).map_err(|source| ConvertError::ProjectXml {
            path: path.to_path_buf(),
            source,
        })?;
        ensure_project_root(&doc.root, path)?;

        let outcome = self.transform(&mut doc.root);
        match &outcome {
            ProjectOutcome::AlreadyConverted => {
                debug!(project = %path.display(), "project already in target format");
            }
            ProjectOutcome::Converted(_) => {
                write_file(&doc, path).map_err(|source| ConvertError::ProjectWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(outcome)
    }

    /// Apply every step to an already validated `<Project>` root.
    pub fn transform(&self, project: &mut XmlNode) -> ProjectOutcome {
        let target = self.descriptor.target;
        if !versions::apply_tools_version(project, &self.descriptor) {
            return ProjectOutcome::AlreadyConverted;
        }

        let mut changes = ProjectChanges {
            product_version_updated: versions::apply_product_version(project, &self.descriptor),
            old_tools_version_removed: versions::remove_old_tools_version(project),
            ..ProjectChanges::default()
        };

        let frameworks = versions::normalize_target_framework(project, target);
        changes.target_frameworks_removed = frameworks.removed;
        changes.target_frameworks_clamped = frameworks.clamped;
        changes.target_framework_inserted = frameworks.inserted;

        changes.references_renamed =
            references::rename_project_references(project, &self.options.project_postfix);
        changes.imports_rewritten = imports::swap_tools_path_token(project, target);
        changes.silverlight_imports_clamped = imports::clamp_silverlight_version(project, target);

        if self.options.fix_bootstrapper {
            changes.bootstrapper_packages_changed =
                bootstrapper::fix_bootstrapper_packages(project, target);
        }

        ProjectOutcome::Converted(changes)
    }
}

fn ensure_project_root(root: &XmlNode, path: &Path) -> Result<()> {
    if root.tag == "Project" && root.attribute("xmlns") == Some(MSBUILD_NAMESPACE) {
        return Ok(());
    }
    Err(ConvertError::InvalidProjectFile {
        path: path.to_path_buf(),
        reason: format!(
            "expected root <Project xmlns=\"{MSBUILD_NAMESPACE}\">, found <{}>",
            root.tag
        ),
    })
}
