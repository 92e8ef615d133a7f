//! Rendering options and configuration.

/// Options for plain text rendering.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Render paragraph ends as spaces instead of line breaks
    pub ignore_line_breaks: bool,

    /// Only render text streams of this type
    pub stream_type: Option<String>,

    /// Text placed between consecutive text streams
    pub stream_separator: String,
}

impl TextOptions {
    /// Create new text options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable line break suppression.
    pub fn with_ignore_line_breaks(mut self, ignore: bool) -> Self {
        self.ignore_line_breaks = ignore;
        self
    }

    /// Restrict output to one text stream type.
    pub fn with_stream_type(mut self, stream_type: impl Into<String>) -> Self {
        self.stream_type = Some(stream_type.into());
        self
    }

    /// Set the separator between text streams.
    pub fn with_stream_separator(mut self, separator: impl Into<String>) -> Self {
        self.stream_separator = separator.into();
        self
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            ignore_line_breaks: false,
            stream_type: None,
            stream_separator: "\r\n\r\n".to_string(),
        }
    }
}
