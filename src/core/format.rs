//! Configuration file formats

use std::path::Path;

/// Text formats configuration files may be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Ron,
}

impl FileFormat {
    /// Pick a format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(FileFormat::Json)
        } else if extension.eq_ignore_ascii_case("ron") {
            Some(FileFormat::Ron)
        } else {
            None
        }
    }
}

/// Extension of `path` for error messages
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("level1.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("agents/guard.RON")), Some(FileFormat::Ron));
        assert_eq!(FileFormat::from_path(Path::new("paths.plist")), None);
        assert_eq!(FileFormat::from_path(Path::new("paths")), None);
        assert_eq!(extension_of(Path::new("paths.plist")), "plist");
    }
}
