use msbuild_xml::XmlNode;

use crate::format::TargetFormat;

const FRAMEWORK_2_0: &str = "Microsoft.Net.Framework.2.0";

const UNSUPPORTED_BY_VS2005: &[&str] = &[
    "Microsoft.Net.Framework.3.0",
    "Microsoft.Net.Framework.3.5",
    "Microsoft.Net.Client.3.5",
    "Microsoft.Net.Framework.3.5.SP1",
    "Microsoft.Windows.Installer.3.1",
];
const UNSUPPORTED_BY_VS2008: &[&str] = &[
    "Microsoft.Net.Client.3.5",
    "Microsoft.Net.Framework.3.5.SP1",
    "Microsoft.Windows.Installer.3.1",
];
const NO_PACKAGES: &[&str] = &[];

/// Trim `BootstrapperPackage` items the target's setup bootstrapper cannot
/// offer and relabel the .NET 2.0 package the way that release names it.
///
/// Newer packages are removed, never added. Returns the number of packages
/// relabelled or removed.
pub fn fix_bootstrapper_packages(project: &mut XmlNode, target: TargetFormat) -> usize {
    let (label, unsupported) = match target {
        TargetFormat::Vs2005 => (Some(".NET Framework 2.0"), UNSUPPORTED_BY_VS2005),
        TargetFormat::Vs2008 => (Some(".NET Framework 2.0 %28x86%29"), UNSUPPORTED_BY_VS2008),
        TargetFormat::Vs2010 => (Some(".NET Framework 2.0 %28x86%29"), NO_PACKAGES),
        TargetFormat::Vs2012 => (None, NO_PACKAGES),
    };

    let mut changed = 0;
    for group in project.children_mut("ItemGroup") {
        let before = group.children.len();
        group.children.retain(|item| {
            item.tag != "BootstrapperPackage"
                || !item
                    .attribute("Include")
                    .is_some_and(|include| unsupported.contains(&include))
        });
        changed += before - group.children.len();

        let Some(label) = label else {
            continue;
        };
        for package in group.children_mut("BootstrapperPackage") {
            if package.attribute("Include") != Some(FRAMEWORK_2_0) {
                continue;
            }
            if let Some(name) = package.get_child_mut("ProductName") {
                if name.text.as_deref() != Some(label) {
                    name.text = Some(label.to_string());
                    changed += 1;
                }
            }
        }
    }
    changed
}
