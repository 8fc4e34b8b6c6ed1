//! Where observation CSV payloads come from.

use std::fmt;
use std::path::{Path, PathBuf};

/// A remote URL or a local file holding one-minute ASOS CSV data.
///
/// Both carry the same payload shape and are parsed identically.
///
/// # Examples
///
/// ```
/// use meteogram::AsosSource;
/// use std::path::PathBuf;
///
/// let remote = AsosSource::from("https://mesonet.agron.iastate.edu/request/asos/1min_dl.php");
/// assert!(matches!(remote, AsosSource::Url(_)));
///
/// let local = AsosSource::from("staticdata/AMW_example_data.csv");
/// assert_eq!(local, AsosSource::Path(PathBuf::from("staticdata/AMW_example_data.csv")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AsosSource {
    Url(String),
    Path(PathBuf),
}

impl AsosSource {
    /// A short name for log lines and error messages.
    pub fn name(&self) -> String {
        match self {
            AsosSource::Url(url) => url.clone(),
            AsosSource::Path(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for AsosSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for AsosSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            AsosSource::Url(value.to_string())
        } else {
            AsosSource::Path(PathBuf::from(value))
        }
    }
}

impl From<String> for AsosSource {
    fn from(value: String) -> Self {
        AsosSource::from(value.as_str())
    }
}

impl From<&Path> for AsosSource {
    fn from(value: &Path) -> Self {
        AsosSource::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for AsosSource {
    fn from(value: PathBuf) -> Self {
        AsosSource::Path(value)
    }
}
