//! Upload intake: which files are accepted and what they are called once
//! accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::errors::UploadError;

/// Extensions accepted when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &["csv"];

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("file-name filter is a valid regex"));

/// True when `file_name` has an extension from `extensions` (ASCII case ignored).
pub fn allowed_file(file_name: &str, extensions: &[impl AsRef<str>]) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => extensions
            .iter()
            .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Reduces a client-supplied name to a flat, ASCII-only file name.
///
/// Accented letters are folded to their NFKD base, path separators become
/// word breaks, whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]`
/// is dropped, and leading/trailing `.`/`_` are stripped. The result may be
/// empty.
pub fn secure_filename(file_name: &str) -> String {
    let ascii: String = file_name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// An accepted upload: its sanitized name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    file_name: String,
    content: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: &str,
        content: impl Into<Vec<u8>>,
        extensions: &[impl AsRef<str>],
    ) -> Result<Self, UploadError> {
        if file_name.trim().is_empty() {
            return Err(UploadError::NoSelectedFile);
        }
        if !allowed_file(file_name, extensions) {
            return Err(UploadError::DisallowedExtension {
                name: file_name.to_string(),
            });
        }
        Ok(Self {
            file_name: secure_filename(file_name),
            content: content.into(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}
