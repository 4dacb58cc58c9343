//! Output file naming shared by the solution and project rewriters.
//!
//! Both the solution line rewrite and the `ProjectReference` rewrite derive
//! names through [`PostfixRule::apply`], so a copied project and every
//! reference to it always agree.

use std::path::Path;

use crate::options::ConversionOptions;

/// How a file stem is renamed: substitute `replace` with `postfix`, or
/// append `postfix` when there is nothing to replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostfixRule {
    pub postfix: String,
    pub replace: String,
}

impl PostfixRule {
    pub fn new(postfix: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            postfix: postfix.into(),
            replace: replace.into(),
        }
    }

    /// Rename a stem (file name without extension).
    ///
    /// The replacement is a plain substring match over the whole stem, so
    /// `replace = "10"` also rewrites the `10` in `Net10Core_10`.
    pub fn apply(&self, stem: &str) -> String {
        if !self.replace.is_empty() && stem.contains(&self.replace) {
            stem.replace(&self.replace, &self.postfix)
        } else {
            format!("{stem}{}", self.postfix)
        }
    }
}

/// Output file name for the solution at `original_path`; always `.sln`.
pub fn renamed_solution_name(original_path: &Path, options: &ConversionOptions) -> String {
    let stem = original_path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("{}.sln", options.solution_postfix.apply(&stem))
}

/// Output file name for a project file name such as `Core.csproj`.
///
/// Only the final path segment is considered; both `\` and `/` count as
/// separators since solution and project files come from Windows.
pub fn renamed_project_name(original_file_name: &str, options: &ConversionOptions) -> String {
    let file_name = file_name_of(original_file_name);
    let (stem, extension) = split_extension(file_name);
    format!("{}{}", options.project_postfix.apply(stem), extension)
}

/// Final segment of a Windows- or Unix-style path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// Split `name` into stem and extension (the extension keeps its dot).
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{file_name_of, renamed_project_name, renamed_solution_name, split_extension, PostfixRule};
    use crate::options::ConversionOptions;

    fn options(solution: PostfixRule, project: PostfixRule) -> ConversionOptions {
        let mut options = ConversionOptions::new("C:/src/Sample.sln");
        options.solution_postfix = solution;
        options.project_postfix = project;
        options
    }

    #[test]
    fn appends_postfix_when_nothing_to_replace() {
        let rule = PostfixRule::new("_2008", "");
        assert_eq!(rule.apply("Core"), "Core_2008");
        assert_eq!(PostfixRule::default().apply("Core"), "Core");
    }

    #[test]
    fn replaces_postfix_when_present() {
        let rule = PostfixRule::new("_2008", "_2010");
        assert_eq!(rule.apply("Core_2010"), "Core_2008");
    }

    #[test]
    fn appends_when_replace_postfix_is_missing_from_stem() {
        let rule = PostfixRule::new("_2008", "_2010");
        assert_eq!(rule.apply("Core"), "Core_2008");
    }

    #[test]
    fn replacement_is_not_anchored_to_the_end_of_the_stem() {
        // Every occurrence is replaced, including ones inside the name.
        let rule = PostfixRule::new("08", "10");
        assert_eq!(rule.apply("Net10Core10"), "Net08Core08");
    }

    #[test]
    fn solution_name_always_gets_sln_extension() {
        let opts = options(PostfixRule::new("-vs2005", ""), PostfixRule::default());
        assert_eq!(
            renamed_solution_name(Path::new("/work/Sample.sln"), &opts),
            "Sample-vs2005.sln"
        );
    }

    #[test]
    fn project_name_keeps_extension_and_ignores_directories() {
        let opts = options(PostfixRule::default(), PostfixRule::new("2008", "2010"));
        assert_eq!(renamed_project_name("Core2010.csproj", &opts), "Core2008.csproj");
        assert_eq!(renamed_project_name("..\\Lib\\Lib.vbproj", &opts), "Lib2008.vbproj");
    }

    #[test]
    fn path_helpers_understand_both_separators() {
        assert_eq!(file_name_of("a\\b/c.csproj"), "c.csproj");
        assert_eq!(file_name_of("c.csproj"), "c.csproj");
        assert_eq!(split_extension("My.App.csproj"), ("My.App", ".csproj"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
