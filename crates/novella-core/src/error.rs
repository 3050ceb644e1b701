//! Content error types.

use thiserror::Error;

/// Top-level error type for content conversion and scene resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A malformed chapter or scene id, or use of a reserved id.
    #[error("validation error: {0}")]
    Validation(String),

    /// An unqualified scene reference matched scenes in more than one chapter.
    #[error("ambiguous scene reference '{reference}': found in chapters {}", chapters.join(", "))]
    AmbiguousReference {
        /// The reference as written by the author.
        reference: String,
        /// Every chapter that registers a scene with this short id, sorted.
        chapters: Vec<String>,
    },

    /// Chapter content could not be read or parsed.
    #[error("content source error: {0}")]
    Source(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_reference_message_lists_every_chapter() {
        // Arrange
        let err = ContentError::AmbiguousReference {
            reference: "x".to_owned(),
            chapters: vec!["A".to_owned(), "B".to_owned()],
        };

        // Act
        let message = err.to_string();

        // Assert
        assert_eq!(
            message,
            "ambiguous scene reference 'x': found in chapters A, B"
        );
    }
}
