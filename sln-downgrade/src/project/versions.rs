use msbuild_xml::XmlNode;

use crate::format::{FormatDescriptor, TargetFormat};

const TOOLS_VERSION: &str = "ToolsVersion";
const PROPERTY_GROUP: &str = "PropertyGroup";
const PRODUCT_VERSION: &str = "ProductVersion";
const OLD_TOOLS_VERSION: &str = "OldToolsVersion";
const TARGET_FRAMEWORK_VERSION: &str = "TargetFrameworkVersion";

/// Framework versions Visual Studio 2008 can build.
const VS2008_FRAMEWORKS: [&str; 5] = ["v1.0", "v1.1", "v2.0", "v3.0", "v3.5"];
const VS2008_FRAMEWORK_CEILING: &str = "v3.5";
const DEFAULT_FRAMEWORK: &str = "v2.0";

/// Bring `ToolsVersion` in line with the target.
///
/// Returns `false` when the project is already in the target format: the
/// attribute already holds the target value, or it is absent and the
/// target (2005) has none.
pub fn apply_tools_version(project: &mut XmlNode, descriptor: &FormatDescriptor) -> bool {
    match (project.attribute(TOOLS_VERSION), descriptor.project_tools_version) {
        (Some(current), Some(wanted)) if current == wanted => return false,
        (None, None) => return false,
        _ => {}
    }

    match descriptor.project_tools_version {
        Some(wanted) if project.attribute(TOOLS_VERSION).is_some() => {
            project.set_attribute(TOOLS_VERSION, wanted);
        }
        // Visual Studio writes ToolsVersion as the first attribute.
        Some(wanted) => project
            .attributes
            .insert(0, (TOOLS_VERSION.to_string(), wanted.to_string())),
        None => {
            project.remove_attribute(TOOLS_VERSION);
        }
    }
    true
}

/// Overwrite the first `PropertyGroup/ProductVersion` when the target
/// declares a product version.
pub fn apply_product_version(project: &mut XmlNode, descriptor: &FormatDescriptor) -> bool {
    let Some(product_version) = descriptor.project_product_version else {
        return false;
    };
    let node = project
        .children_mut(PROPERTY_GROUP)
        .find_map(|group| group.get_child_mut(PRODUCT_VERSION));
    match node {
        Some(node) => {
            node.text = Some(product_version.to_string());
            true
        }
        None => false,
    }
}

/// Drop every `PropertyGroup/OldToolsVersion`.
pub fn remove_old_tools_version(project: &mut XmlNode) -> usize {
    project
        .children_mut(PROPERTY_GROUP)
        .map(|group| group.remove_children(OLD_TOOLS_VERSION))
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameworkChanges {
    pub removed: usize,
    pub clamped: usize,
    pub inserted: bool,
}

/// Normalize `TargetFrameworkVersion` declarations for the target.
///
/// - 2005 predates the element: every declaration is removed.
/// - 2008 cannot build 4.x: anything outside v1.0..v3.5 becomes v3.5.
/// - 2008 and 2010 expect a declaration: when the project has none, `v2.0`
///   is appended to the first `PropertyGroup`.
pub fn normalize_target_framework(project: &mut XmlNode, target: TargetFormat) -> FrameworkChanges {
    let mut changes = FrameworkChanges::default();
    let mut declared = false;

    for group in project.children_mut(PROPERTY_GROUP) {
        match target {
            TargetFormat::Vs2005 => {
                changes.removed += group.remove_children(TARGET_FRAMEWORK_VERSION);
            }
            TargetFormat::Vs2008 => {
                for node in group.children_mut(TARGET_FRAMEWORK_VERSION) {
                    declared = true;
                    let current = node.text.as_deref().unwrap_or_default().trim();
                    if !VS2008_FRAMEWORKS.contains(&current) {
                        node.text = Some(VS2008_FRAMEWORK_CEILING.to_string());
                        changes.clamped += 1;
                    }
                }
            }
            TargetFormat::Vs2010 | TargetFormat::Vs2012 => {
                declared |= group.get_child(TARGET_FRAMEWORK_VERSION).is_some();
            }
        }
    }

    if !declared && matches!(target, TargetFormat::Vs2008 | TargetFormat::Vs2010) {
        if let Some(group) = project.get_child_mut(PROPERTY_GROUP) {
            group
                .children
                .push(XmlNode::with_text(TARGET_FRAMEWORK_VERSION, DEFAULT_FRAMEWORK));
            changes.inserted = true;
        }
    }

    changes
}
