use msbuild_xml::XmlNode;

use super::is_managed_project;
use crate::naming::{file_name_of, split_extension, PostfixRule};

/// Rename the file-name portion of every managed `ProjectReference` include.
///
/// Every referenced project is assumed to be converted alongside this one,
/// so the same postfix rule applies; the directory portion is untouched.
/// Returns how many includes changed.
pub fn rename_project_references(project: &mut XmlNode, rule: &PostfixRule) -> usize {
    let mut renamed = 0;
    for group in project.children_mut("ItemGroup") {
        for reference in group.children_mut("ProjectReference") {
            let Some(include) = reference.attribute("Include") else {
                continue;
            };
            if !is_managed_project(include) {
                continue;
            }
            let updated = rename_include(include, rule);
            if updated != include {
                reference.set_attribute("Include", updated);
                renamed += 1;
            }
        }
    }
    renamed
}

fn rename_include(include: &str, rule: &PostfixRule) -> String {
    let file_name = file_name_of(include);
    let directory = &include[..include.len() - file_name.len()];
    let (stem, extension) = split_extension(file_name);
    format!("{directory}{}{extension}", rule.apply(stem))
}
