//! Explicit render settings, passed by value instead of held globally.

/// Suffix used when none is configured.
pub const DEFAULT_MARKER_SUFFIX: &str = ".ftl";

/// Settings shared by output naming and the file renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// File-name suffix marking a template; stripped from the output name.
    pub marker_suffix: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
        }
    }
}

impl RenderSettings {
    pub fn with_marker_suffix(suffix: impl Into<String>) -> Self {
        RenderSettings {
            marker_suffix: suffix.into(),
        }
    }

    /// Case-sensitive suffix check on a bare file name.
    pub fn is_marker(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.marker_suffix)
    }

    /// `file_name` without the marker suffix, or `None` if it is not a marker.
    pub fn strip_marker<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name.strip_suffix(self.marker_suffix.as_str())
    }
}
