use msbuild_xml::XmlNode;

use crate::format::TargetFormat;

/// Property used by MSBuild 2.0 (Visual Studio 2005) to locate targets.
const BIN_PATH_TOKEN: &str = "MSBuildBinPath";
/// Replacement introduced together with `ToolsVersion` in MSBuild 3.5.
const TOOLS_PATH_TOKEN: &str = "MSBuildToolsPath";

const SILVERLIGHT_MARKER: &str = "Microsoft\\Silverlight";
const SILVERLIGHT_VERSION_VS2008: &str = "v3.0";
const SILVERLIGHT_REPLACED: [&str; 2] = ["v4.0", "$(SilverlightVersion)"];

/// Point every top-level `Import` at the tools-path property the target
/// understands. Returns how many imports changed.
pub fn swap_tools_path_token(project: &mut XmlNode, target: TargetFormat) -> usize {
    let (from, to) = match target {
        TargetFormat::Vs2005 => (TOOLS_PATH_TOKEN, BIN_PATH_TOKEN),
        _ => (BIN_PATH_TOKEN, TOOLS_PATH_TOKEN),
    };
    rewrite_imports(project, |path| path.replace(from, to))
}

/// Pin Silverlight targets imports to v3.0, the newest Silverlight SDK that
/// Visual Studio 2008 supports. Only applies when targeting 2008.
pub fn clamp_silverlight_version(project: &mut XmlNode, target: TargetFormat) -> usize {
    if target != TargetFormat::Vs2008 {
        return 0;
    }
    rewrite_imports(project, |path| {
        if !path.contains(SILVERLIGHT_MARKER) {
            return path.to_string();
        }
        SILVERLIGHT_REPLACED
            .iter()
            .fold(path.to_string(), |acc, token| {
                acc.replace(token, SILVERLIGHT_VERSION_VS2008)
            })
    })
}

fn rewrite_imports(project: &mut XmlNode, rewrite: impl Fn(&str) -> String) -> usize {
    let mut changed = 0;
    for import in project.children_mut("Import") {
        let Some(path) = import.attribute("Project") else {
            continue;
        };
        let updated = rewrite(path);
        if updated != path {
            import.set_attribute("Project", updated);
            changed += 1;
        }
    }
    changed
}
