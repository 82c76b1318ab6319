use crate::error::ProjectorError;

/// Limits and thresholds the projector applies while translating events.
///
/// None of these fields are loaded from environment or files here — that
/// remains the caller's job. This type only carries the already-resolved
/// values through to construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectorConfig {
    /// Maximum size, in characters, of a single `chunk.delta` slice for
    /// opaque base64 payloads (e.g. partial image previews).
    pub max_chunk_chars: usize,
    /// Maximum size, in characters, of a single `tool.arguments.delta` slice.
    pub tool_arguments_chunk_chars: usize,
    /// Maximum string length the sanitizer allows inside tool-call arguments
    /// before truncating, expressed in characters.
    pub max_string_chars_arguments: usize,
    /// Maximum string length the sanitizer allows inside tool-call output
    /// before truncating, expressed in characters.
    pub max_string_chars_tool_output: usize,
    /// Maximum number of file-search result entries kept per tool call.
    pub max_file_search_results: usize,
    /// Maximum length, in characters, of a file-search result's matched text.
    pub max_file_search_text_chars: usize,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 131_072,
            tool_arguments_chunk_chars: 2_000,
            max_string_chars_arguments: 4_000,
            max_string_chars_tool_output: 8_000,
            max_file_search_results: 10,
            max_file_search_text_chars: 2_000,
        }
    }
}

impl ProjectorConfig {
    /// Validates that every threshold is usable, returning an error that
    /// names the offending field rather than panicking or silently clamping.
    pub fn validated(self) -> Result<Self, ProjectorError> {
        if self.max_chunk_chars == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "max_chunk_chars",
            });
        }
        if self.tool_arguments_chunk_chars == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "tool_arguments_chunk_chars",
            });
        }
        if self.max_string_chars_arguments == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "max_string_chars_arguments",
            });
        }
        if self.max_string_chars_tool_output == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "max_string_chars_tool_output",
            });
        }
        if self.max_file_search_results == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "max_file_search_results",
            });
        }
        if self.max_file_search_text_chars == 0 {
            return Err(ProjectorError::InvalidConfig {
                field: "max_file_search_text_chars",
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let config = ProjectorConfig::default();
        assert_eq!(config.max_chunk_chars, 131_072);
        assert_eq!(config.tool_arguments_chunk_chars, 2_000);
        assert_eq!(config.max_string_chars_arguments, 4_000);
        assert_eq!(config.max_string_chars_tool_output, 8_000);
        assert_eq!(config.max_file_search_results, 10);
        assert_eq!(config.max_file_search_text_chars, 2_000);
    }

    #[test]
    fn zero_chunk_chars_is_rejected() {
        let config = ProjectorConfig {
            max_chunk_chars: 0,
            ..ProjectorConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn default_validates() {
        assert!(ProjectorConfig::default().validated().is_ok());
    }
}
