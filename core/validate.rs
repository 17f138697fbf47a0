use crate::error::{AppError, Result};
use log;
use std::path::{Path, PathBuf};

/// Canonicalizes and authorizes the input root. This is the one validation
/// that must succeed before any walk or read starts; every failure here is
/// fatal for the whole run.
pub fn validate_source_path(input: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(&input.to_string_lossy()).into_owned();
    let resolved = PathBuf::from(expanded).canonicalize().map_err(|e| {
        AppError::InvalidPath(format!(
            "Cannot resolve '{}': {}",
            input.display(),
            e
        ))
    })?;

    if !resolved.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "'{}' is not a directory",
            resolved.display()
        )));
    }

    for restricted in restricted_roots() {
        if resolved.starts_with(&restricted) {
            log::warn!(
                "Rejected restricted path: {} (under {})",
                resolved.display(),
                restricted.display()
            );
            return Err(AppError::RestrictedPath(resolved));
        }
    }

    // The home directory itself is rejected; project trees inside it are fine.
    if let Some(home) = dirs::home_dir() {
        if resolved == home {
            return Err(AppError::RestrictedPath(resolved));
        }
    }

    log::debug!("Validated source path: {}", resolved.display());
    Ok(resolved)
}

/// Sensitive locations the tool refuses to pack: system config roots and the
/// user's credential directories.
fn restricted_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/etc"),
        PathBuf::from("/sys"),
        PathBuf::from("/proc"),
        PathBuf::from("/boot"),
        PathBuf::from("/dev"),
        PathBuf::from("/private/etc"),
    ];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".ssh"));
        roots.push(home.join(".aws"));
        roots.push(home.join(".gnupg"));
    }
    roots
}
