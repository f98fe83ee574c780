//! Sanitisation of remote file names.
//!
//! The listing endpoint is the only source of local file names, so a
//! malicious or corrupted listing could try to write outside the save
//! directory (`../../etc/passwd`). Every `/` and `\` is stripped before the
//! name touches the filesystem.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{TransferError, TransferResult};

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\\/]").unwrap())
}

/// Removes every path separator from a remote file name.
///
/// Fails with `InvalidFileName` when nothing usable remains: an empty
/// string, `.` or `..` would not name a file inside the save directory.
///
/// # Example
///
/// ```
/// use shareport::filename::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "....etcpasswd");
/// assert_eq!(sanitize_file_name("a.txt").unwrap(), "a.txt");
/// ```
pub fn sanitize_file_name(name: &str) -> TransferResult<String> {
    let cleaned = separator_pattern().replace_all(name, "").into_owned();

    match cleaned.as_str() {
        "" | "." | ".." => Err(TransferError::InvalidFileName(name.to_string())),
        _ => Ok(cleaned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::{Component, Path};

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_file_name("holiday.jpg").unwrap(), "holiday.jpg");
    }

    #[test]
    fn test_traversal_is_flattened() {
        let name = sanitize_file_name("../../etc/passwd").unwrap();
        assert!(!name.contains('/'));
        assert_eq!(name, "....etcpasswd");
    }

    #[test]
    fn test_backslashes_removed() {
        assert_eq!(
            sanitize_file_name(r"..\..\windows\win.ini").unwrap(),
            "....windowswin.ini"
        );
    }

    #[test]
    fn test_spaces_and_unicode_kept() {
        assert_eq!(
            sanitize_file_name("Über Bericht 2017.pdf").unwrap(),
            "Über Bericht 2017.pdf"
        );
    }

    #[test]
    fn test_empty_after_stripping_is_rejected() {
        assert!(matches!(
            sanitize_file_name("///"),
            Err(TransferError::InvalidFileName(_))
        ));
        assert!(sanitize_file_name("").is_err());
    }

    #[test]
    fn test_dot_names_rejected() {
        assert!(sanitize_file_name("/..").is_err());
        assert!(sanitize_file_name(".\\").is_err());
        assert!(sanitize_file_name("...").is_ok());
    }

    #[test]
    fn test_sanitized_path_stays_inside_save_dir() {
        let save_dir = Path::new("/srv/downloads");
        let name = sanitize_file_name("../../etc/passwd").unwrap();
        let target = save_dir.join(&name);

        assert_eq!(target.parent(), Some(save_dir));
        assert!(target
            .components()
            .all(|c| !matches!(c, Component::ParentDir)));
    }

    proptest! {
        #[test]
        fn prop_no_separators_survive(name in ".{0,64}") {
            if let Ok(cleaned) = sanitize_file_name(&name) {
                prop_assert!(!cleaned.contains('/'));
                prop_assert!(!cleaned.contains('\\'));
            }
        }

        #[test]
        fn prop_result_is_single_component(name in "[a-z./\\\\]{1,24}") {
            if let Ok(cleaned) = sanitize_file_name(&name) {
                let save_dir = Path::new("/save");
                let target = save_dir.join(&cleaned);
                prop_assert_eq!(target.parent(), Some(save_dir));
                prop_assert_eq!(Path::new(&cleaned).components().count(), 1);
            }
        }
    }
}
