//! Line-oriented rewrite of `.sln` files.
//!
//! Solution files are not parsed into a tree. Every line is emitted as read
//! except the format version line, the `# Visual Studio` banner and
//! `Project(` lines that reference a managed project, which are rewritten
//! after the project itself has been copied and downgraded.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConvertError, Result};
use crate::format::FormatDescriptor;
use crate::naming::{file_name_of, renamed_project_name, split_extension};
use crate::options::ConversionOptions;
use crate::path_guard::is_same_file;
use crate::project::{is_managed_project, ProjectOutcome, ProjectTransformer};
use crate::report::{ProjectRecord, SkipReason, SkippedEntry};

pub const FORMAT_VERSION_MARKER: &str = "Microsoft Visual Studio Solution File, Format Version";
const BANNER_MARKER: &str = "# Visual";
const BANNER_PREFIX: &str = "# Visual Studio ";
const PROJECT_MARKER: &str = "Project(";

const SOLUTION_ITEMS: &str = "Solution Items";
/// Project type GUID Visual Studio uses for solution folders.
const SOLUTION_FOLDER_TYPE: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// Written when the source solution has no byte order mark of its own.
pub const DEFAULT_BYTE_ORDER_MARK: [u8; 5] = [0xEF, 0xBB, 0xBF, 0x0D, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    Lf,
    /// Final line without a terminator.
    None,
}

impl LineEnding {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::CrLf => b"\r\n",
            LineEnding::Lf => b"\n",
            LineEnding::None => b"",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionLine {
    /// Line bytes without the terminator.
    pub content: Vec<u8>,
    pub ending: LineEnding,
}

/// A solution file split into its leading marker and lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDocument {
    /// BOM plus the line break that follows it in the source, or
    /// [`DEFAULT_BYTE_ORDER_MARK`] when the source has no BOM.
    pub byte_order_mark: Vec<u8>,
    pub lines: Vec<SolutionLine>,
}

impl SolutionDocument {
    pub fn parse(bytes: &[u8]) -> Self {
        let (byte_order_mark, body) = match bytes.strip_prefix(&UTF8_BOM) {
            Some(rest) => {
                let newline = if rest.starts_with(b"\r\n") {
                    2
                } else if rest.starts_with(b"\n") {
                    1
                } else {
                    0
                };
                let marker_len = UTF8_BOM.len() + newline;
                (bytes[..marker_len].to_vec(), &bytes[marker_len..])
            }
            None => (DEFAULT_BYTE_ORDER_MARK.to_vec(), bytes),
        };

        Self {
            byte_order_mark,
            lines: split_lines(body),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.byte_order_mark.clone();
        for line in &self.lines {
            out.extend_from_slice(&line.content);
            out.extend_from_slice(line.ending.as_bytes());
        }
        out
    }
}

fn split_lines(mut body: &[u8]) -> Vec<SolutionLine> {
    let mut lines = Vec::new();
    while !body.is_empty() {
        let Some(newline) = body.iter().position(|&b| b == b'\n') else {
            lines.push(SolutionLine {
                content: body.to_vec(),
                ending: LineEnding::None,
            });
            break;
        };
        let (content, ending) = match body[..newline].strip_suffix(b"\r") {
            Some(content) => (content, LineEnding::CrLf),
            None => (&body[..newline], LineEnding::Lf),
        };
        lines.push(SolutionLine {
            content: content.to_vec(),
            ending,
        });
        body = &body[newline + 1..];
    }
    lines
}

/// The fields of a `Project("{type}") = "Name", "Path", "{guid}"` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReferenceEntry {
    pub type_guid: String,
    pub name: String,
    /// Path relative to the solution directory, as written in the file.
    pub path: String,
    pub guid: String,
}

impl ProjectReferenceEntry {
    /// Parse a `Project(` line; `None` when it does not have exactly three
    /// comma-separated components or the first one has no `=`.
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(',').collect();
        let [head, path, guid] = parts.as_slice() else {
            return None;
        };
        let (declaration, name) = head.split_once('=')?;
        let type_guid = declaration
            .trim()
            .strip_prefix(PROJECT_MARKER)?
            .strip_suffix(')')?;

        Some(Self {
            type_guid: trim_field(type_guid).to_string(),
            name: trim_field(name).to_string(),
            path: trim_field(path).to_string(),
            guid: trim_field(guid).to_string(),
        })
    }

    /// Solution folders and the `Solution Items` pseudo-project.
    pub fn is_virtual_folder(&self) -> bool {
        self.path.eq_ignore_ascii_case(SOLUTION_ITEMS)
            || self.type_guid.eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE)
    }

    pub fn is_managed(&self) -> bool {
        is_managed_project(&self.path)
    }

    /// Path segments, split on both separators, with empty and `.` segments
    /// dropped.
    fn segments(&self) -> Vec<&str> {
        self.path
            .split(['\\', '/'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect()
    }
}

fn trim_field(field: &str) -> &str {
    field.trim_matches(|c| c == ' ' || c == '"')
}

/// Rewrite a project line for a copy named `new_file_name`.
///
/// The old stem is replaced by the new one inside the display name, and the
/// file-name portion at the end of the path is replaced. The type GUID, the
/// project GUID and the original separators stay as written.
pub fn rewrite_project_line(line: &str, entry: &ProjectReferenceEntry, new_file_name: &str) -> String {
    let old_file_name = file_name_of(&entry.path);
    let (old_stem, _) = split_extension(old_file_name);
    let (new_stem, _) = split_extension(new_file_name);

    let mut parts: Vec<String> = line.split(',').map(str::to_string).collect();
    if parts.len() != 3 {
        return line.to_string();
    }

    if !old_stem.is_empty() {
        if let Some(eq) = parts[0].find('=') {
            let (declaration, name) = parts[0].split_at(eq);
            let renamed = format!("{declaration}{}", name.replace(old_stem, new_stem));
            parts[0] = renamed;
        }
    }

    if let Some(start) = parts[1].rfind(old_file_name) {
        parts[1].replace_range(start..start + old_file_name.len(), new_file_name);
    }

    parts.join(",")
}

/// A solution after every line has been processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedSolution {
    pub document: SolutionDocument,
    pub projects: Vec<ProjectRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Rewrites solution lines and converts the projects they reference.
pub struct SolutionTransformer<'a> {
    options: &'a ConversionOptions,
    descriptor: FormatDescriptor,
    source_dir: PathBuf,
    projects: ProjectTransformer<'a>,
}

impl<'a> SolutionTransformer<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            descriptor: options.target.descriptor(),
            source_dir: options.solution_dir(),
            projects: ProjectTransformer::new(options),
        }
    }

    /// Process every line of `document` in order.
    ///
    /// Project copies are written under the output directory as their lines
    /// are reached; the first failing copy or project conversion aborts.
    pub fn transform(&self, document: &SolutionDocument) -> Result<TransformedSolution> {
        let mut transformed = TransformedSolution {
            document: SolutionDocument {
                byte_order_mark: document.byte_order_mark.clone(),
                lines: Vec::with_capacity(document.lines.len()),
            },
            projects: Vec::new(),
            skipped: Vec::new(),
        };

        for (index, line) in document.lines.iter().enumerate() {
            let content = match std::str::from_utf8(&line.content) {
                Ok(text) => self
                    .transform_line(index + 1, text, &mut transformed)?
                    .into_bytes(),
                Err(_) => line.content.clone(),
            };
            transformed.document.lines.push(SolutionLine {
                content,
                ending: line.ending,
            });
        }

        Ok(transformed)
    }

    /// Rewrite one line; the first matching rule wins.
    pub fn transform_line(
        &self,
        number: usize,
        line: &str,
        transformed: &mut TransformedSolution,
    ) -> Result<String> {
        if line.starts_with(FORMAT_VERSION_MARKER) {
            return Ok(format!(
                "{FORMAT_VERSION_MARKER} {}",
                self.descriptor.solution_format_version
            ));
        }
        if line.starts_with(BANNER_MARKER) {
            return Ok(format!("{BANNER_PREFIX}{}", self.descriptor.label));
        }
        if !line.starts_with(PROJECT_MARKER) {
            return Ok(line.to_string());
        }

        let Some(entry) = ProjectReferenceEntry::parse(line) else {
            debug!(line = number, "malformed project line left unchanged");
            transformed.skipped.push(SkippedEntry {
                line: number,
                name: None,
                path: None,
                reason: SkipReason::Malformed,
            });
            return Ok(line.to_string());
        };

        let reason = if entry.is_virtual_folder() {
            Some(SkipReason::VirtualFolder)
        } else if !entry.is_managed() {
            Some(SkipReason::UnsupportedExtension)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(line = number, name = %entry.name, path = %entry.path, ?reason, "project entry left unchanged");
            transformed.skipped.push(SkippedEntry {
                line: number,
                name: Some(entry.name),
                path: Some(entry.path),
                reason,
            });
            return Ok(line.to_string());
        }

        let record = self.convert_project(&entry)?;
        let new_file_name = record
            .destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        transformed.projects.push(record);
        Ok(rewrite_project_line(line, &entry, &new_file_name))
    }

    fn convert_project(&self, entry: &ProjectReferenceEntry) -> Result<ProjectRecord> {
        let segments = entry.segments();
        let Some((file_name, directories)) = segments.split_last() else {
            return Err(ConvertError::InvalidProjectFile {
                path: PathBuf::from(&entry.path),
                reason: "project path is empty".to_string(),
            });
        };

        let source = join_segments(&self.source_dir, &segments);
        let destination_dir = join_segments(&self.options.output_dir, directories);
        fs::create_dir_all(&destination_dir)
            .map_err(|err| ConvertError::fs("create directory", &destination_dir, err))?;
        let destination = destination_dir.join(renamed_project_name(file_name, self.options));

        if is_same_file(&source, &destination)? {
            debug!(project = %source.display(), "converting project in place");
        } else {
            fs::copy(&source, &destination)
                .map_err(|err| ConvertError::fs("copy project", &source, err))?;
        }

        let outcome = self.projects.convert_file(&destination)?;
        match &outcome {
            ProjectOutcome::Converted(_) => info!(
                project = %entry.name,
                destination = %destination.display(),
                target = %self.descriptor.target,
                "converted project"
            ),
            ProjectOutcome::AlreadyConverted => {
                debug!(project = %entry.name, "project already converted")
            }
        }

        Ok(ProjectRecord {
            name: entry.name.clone(),
            source,
            destination,
            outcome,
        })
    }
}

fn join_segments(base: &Path, segments: &[&str]) -> PathBuf {
    segments
        .iter()
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}
