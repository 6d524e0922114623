use std::path::{is_separator, Path, PathBuf};

/// Why a name cannot address a direct child of a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameProblem {
    Empty,
    Separator,
    Relative,
    Nul,
}

/// Check that `name` is a single path component that stays inside its parent.
pub fn validate(name: &str) -> Result<(), NameProblem> {
    if name.trim().is_empty() {
        return Err(NameProblem::Empty);
    }
    if name.chars().any(is_separator) {
        return Err(NameProblem::Separator);
    }
    if name == "." || name == ".." {
        return Err(NameProblem::Relative);
    }
    if name.contains('\0') {
        return Err(NameProblem::Nul);
    }
    Ok(())
}

/// Join a validated child name onto `dir`.
pub fn child_path(dir: &Path, name: &str) -> Result<PathBuf, NameProblem> {
    validate(name)?;
    Ok(dir.join(name))
}
