//! Optional post-processing of the assembled document text.

use unicode_normalization::UnicodeNormalization;

/// Cleanup applied after assembly. Both steps are off by default so fragment
/// text reaches the output unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Lowercase everything
    pub lowercase: bool,
    /// Apply Unicode NFC normalization
    pub normalize_unicode: bool,
}

impl CleanupOptions {
    /// Create cleanup options with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Whether any step is enabled.
    pub fn is_noop(&self) -> bool {
        !self.lowercase && !self.normalize_unicode
    }

    /// Apply the enabled steps. Tabs and line breaks are left alone.
    pub fn apply(&self, text: &str) -> String {
        let mut output = if self.normalize_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        if self.lowercase {
            output = output.to_lowercase();
        }

        output
    }
}
