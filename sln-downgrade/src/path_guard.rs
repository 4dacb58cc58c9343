use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Whether `a` and `b` name the same file once normalized.
///
/// Used to detect in-place conversion (output directory equal to the
/// solution directory and no renaming), where copying a project onto itself
/// must be skipped.
pub fn is_same_file(a: &Path, b: &Path) -> Result<bool> {
    Ok(normalize_for_compare(a)? == normalize_for_compare(b)?)
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        // canonicalize resolves symlinks and `..` for paths that exist on disk.
        return path
            .canonicalize()
            .map_err(|source| ConvertError::fs("canonicalize", path, source));
    }

    // Paths that don't exist yet can't be canonicalized; join with cwd. `..`
    // is not resolved here, which can only produce false "different" answers
    // and therefore an extra copy.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().map_err(|source| ConvertError::fs("resolve", ".", source))?
    };

    Ok(base.join(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::is_same_file;

    #[test]
    fn detects_same_file_through_dot_segments() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("App")).expect("mkdir");
        let file = dir.path().join("App").join("App.csproj");
        fs::write(&file, "<Project/>").expect("write");

        let indirect = dir.path().join("App").join("..").join("App").join("App.csproj");
        assert!(is_same_file(&file, &indirect).expect("compare"));
    }

    #[test]
    fn missing_destination_is_a_different_file() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("App.csproj");
        fs::write(&file, "<Project/>").expect("write");

        let other = dir.path().join("out").join("App.csproj");
        assert!(!is_same_file(&file, &other).expect("compare"));
    }
}
