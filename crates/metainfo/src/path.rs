use camino::{Utf8Path, Utf8PathBuf};

use crate::error::MetainfoError;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\0'];

const RESERVED_BASE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1", "LPT2",
    "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn is_reserved_base_name(component: &str) -> bool {
    let stem = component.split('.').next().unwrap_or(component);
    RESERVED_BASE_NAMES.iter().any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

fn sanitize_component(component: &str) -> Result<String, MetainfoError> {
    let trimmed = component.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(MetainfoError::PathUnsafe { path: component.to_string() });
    }
    if trimmed.chars().any(|c| RESERVED_CHARS.contains(&c)) {
        return Err(MetainfoError::PathUnsafe { path: component.to_string() });
    }
    if is_reserved_base_name(trimmed) {
        return Err(MetainfoError::PathUnsafe { path: component.to_string() });
    }
    Ok(trimmed.to_string())
}

/// Validates and normalizes a list of path components (as they appear in a
/// `.torrent` file's `path` key) into a single portable relative path.
///
/// # Errors
///
/// Returns [`MetainfoError::PathUnsafe`] if the path is empty, any
/// component is empty/`.`/`..`, contains a reserved character, or is a
/// reserved base name (even with an extension).
pub fn sanitize_subpath(components: &[String]) -> Result<Utf8PathBuf, MetainfoError> {
    if components.is_empty() {
        return Err(MetainfoError::PathUnsafe { path: String::new() });
    }
    let mut path = Utf8PathBuf::new();
    for raw in components {
        path.push(sanitize_component(raw)?);
    }
    Ok(path)
}

/// `true` iff `path` could have been produced by [`sanitize_subpath`]:
/// relative, non-empty, with no component that fails the portable-subpath
/// rules.
#[must_use]
pub fn is_portable(path: &Utf8Path) -> bool {
    if path.as_str().is_empty() || path.is_absolute() {
        return false;
    }
    path.components().all(|c| sanitize_component(c.as_str()).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_normal_nested_path() {
        let components = vec!["videos".to_string(), "s01e01.mkv".to_string()];
        let path = sanitize_subpath(&components).unwrap();
        assert_eq!(path, Utf8PathBuf::from("videos/s01e01.mkv"));
    }

    #[test]
    fn rejects_empty_component_list() {
        assert!(sanitize_subpath(&[]).is_err());
    }

    #[test]
    fn rejects_dot_and_dot_dot_components() {
        assert!(sanitize_subpath(&["..".to_string(), "x".to_string()]).is_err());
        assert!(sanitize_subpath(&[".".to_string()]).is_err());
    }

    #[test]
    fn rejects_reserved_characters() {
        assert!(sanitize_subpath(&["bad:name".to_string()]).is_err());
    }

    #[test]
    fn rejects_reserved_base_names_even_with_an_extension() {
        assert!(sanitize_subpath(&["NUL".to_string()]).is_err());
        assert!(sanitize_subpath(&["com1.txt".to_string()]).is_err());
        assert!(sanitize_subpath(&["lpt9.tar.gz".to_string()]).is_err());
    }

    #[test]
    fn allows_names_that_merely_contain_a_reserved_word() {
        assert!(sanitize_subpath(&["console.log".to_string()]).is_ok());
    }

    #[test]
    fn is_portable_rejects_absolute_paths() {
        assert!(!is_portable(Utf8Path::new("/etc/passwd")));
        assert!(is_portable(Utf8Path::new("a/b.txt")));
    }
}
