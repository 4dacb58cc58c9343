//! Per-version constants for the supported Visual Studio file formats.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConvertError;

/// A Visual Studio release whose solution/project format can be targeted.
///
/// Defaults to 2008, the second-oldest supported format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TargetFormat {
    #[serde(rename = "2005")]
    Vs2005,
    #[default]
    #[serde(rename = "2008")]
    Vs2008,
    #[serde(rename = "2010")]
    Vs2010,
    #[serde(rename = "2012")]
    Vs2012,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 4] = [
        TargetFormat::Vs2005,
        TargetFormat::Vs2008,
        TargetFormat::Vs2010,
        TargetFormat::Vs2012,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TargetFormat::Vs2005 => "2005",
            TargetFormat::Vs2008 => "2008",
            TargetFormat::Vs2010 => "2010",
            TargetFormat::Vs2012 => "2012",
        }
    }

    pub fn descriptor(self) -> FormatDescriptor {
        let (solution_format_version, project_tools_version, project_product_version) = match self
        {
            TargetFormat::Vs2005 => ("9.00", None, Some("8.0.50727")),
            TargetFormat::Vs2008 => ("10.00", Some("3.5"), Some("9.0.21022")),
            TargetFormat::Vs2010 => ("11.00", Some("4.0"), None),
            TargetFormat::Vs2012 => ("12.00", Some("4.0"), None),
        };
        FormatDescriptor {
            target: self,
            label: self.id(),
            solution_format_version,
            project_tools_version,
            project_product_version,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetFormat::ALL
            .into_iter()
            .find(|format| format.id() == s.trim())
            .ok_or_else(|| ConvertError::UnsupportedFormat(s.to_string()))
    }
}

impl Display for TargetFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Everything a conversion needs to know about its target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub target: TargetFormat,
    /// Shown in the solution's `# Visual Studio` banner.
    pub label: &'static str,
    pub solution_format_version: &'static str,
    /// `None` means the `ToolsVersion` attribute must be absent.
    pub project_tools_version: Option<&'static str>,
    /// `None` means `ProductVersion` is left untouched.
    pub project_product_version: Option<&'static str>,
}

/// Resolve a target identifier such as `"2008"` into its descriptor.
pub fn describe(identifier: &str) -> Result<FormatDescriptor, ConvertError> {
    identifier.parse::<TargetFormat>().map(TargetFormat::descriptor)
}

#[cfg(test)]
mod tests {
    use super::{describe, TargetFormat};
    use crate::error::ConvertError;

    #[test]
    fn table_matches_visual_studio_constants() {
        let rows: Vec<_> = TargetFormat::ALL
            .into_iter()
            .map(|format| {
                let d = format.descriptor();
                (
                    d.label,
                    d.solution_format_version,
                    d.project_tools_version,
                    d.project_product_version,
                )
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                ("2005", "9.00", None, Some("8.0.50727")),
                ("2008", "10.00", Some("3.5"), Some("9.0.21022")),
                ("2010", "11.00", Some("4.0"), None),
                ("2012", "12.00", Some("4.0"), None),
            ]
        );
    }

    #[test]
    fn describe_rejects_unknown_identifiers() {
        let err = describe("2013").expect_err("2013 is not supported");
        assert!(matches!(err, ConvertError::UnsupportedFormat(ref id) if id == "2013"));
        assert!(describe("vs2008").is_err());
    }

    #[test]
    fn default_target_is_2008() {
        assert_eq!(TargetFormat::default(), TargetFormat::Vs2008);
        assert_eq!(describe("2008").expect("2008").target, TargetFormat::default());
    }
}
