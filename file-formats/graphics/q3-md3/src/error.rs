use std::io;
use thiserror::Error;

/// Error types for MD3 decoding, animation tables and character assembly
#[derive(Error, Debug)]
pub enum Md3Error {
    /// I/O error while reading a model, skin or animation file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in the file header
    #[error("Invalid magic number: expected '{expected}', got '{actual}'")]
    InvalidMagic { expected: String, actual: String },

    /// Unsupported file version
    #[error("Unsupported MD3 version: {0}")]
    UnsupportedVersion(i32),

    /// Truncated or internally inconsistent model data
    #[error("Malformed asset: {0}")]
    MalformedAsset(String),

    /// The animation description ran out of data lines
    #[error("Animation table incomplete: expected {expected} data lines, found {found}")]
    AnimationTableIncomplete { expected: usize, found: usize },

    /// A data line in the animation description could not be read
    #[error("Invalid animation line {line}: {reason}")]
    InvalidAnimationLine { line: usize, reason: String },

    /// No tag with the requested name exists on the parent model
    #[error("Unresolved attachment: no tag named '{tag}'")]
    UnresolvedAttachment { tag: String },

    /// A mesh named in a skin file does not exist in the model
    #[error("Unbound skin: no mesh named '{mesh}'")]
    UnboundSkin { mesh: String },

    /// A keyframe index falls outside the model's frame table
    #[error("Frame index {frame} out of range (model has {frame_count} frames)")]
    FrameIndexOutOfRange { frame: i64, frame_count: usize },

    /// Linking would make a model its own ancestor
    #[error("Attachment through '{tag}' would create a cycle")]
    AttachmentCycle { tag: String },

    /// The character manifest is missing entries
    #[error("Invalid character manifest: {0}")]
    InvalidManifest(String),
}

impl Md3Error {
    /// Fold end-of-stream I/O failures into [`Md3Error::MalformedAsset`].
    ///
    /// Offsets in an MD3 file are never cross-checked against each other, so a
    /// bad offset shows up as a short read.
    pub(crate) fn truncation_as_malformed(self) -> Self {
        match self {
            Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Self::MalformedAsset(format!("truncated stream: {err}"))
            }
            other => other,
        }
    }
}

/// Result type using Md3Error
pub type Result<T> = std::result::Result<T, Md3Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Md3Error::InvalidMagic {
            expected: "IDP3".to_string(),
            actual: "MD20".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid magic number: expected 'IDP3', got 'MD20'"
        );

        let error = Md3Error::FrameIndexOutOfRange {
            frame: 190,
            frame_count: 153,
        };
        assert_eq!(
            error.to_string(),
            "Frame index 190 out of range (model has 153 frames)"
        );
    }

    #[test]
    fn test_eof_becomes_malformed() {
        let eof = Md3Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(
            eof.truncation_as_malformed(),
            Md3Error::MalformedAsset(_)
        ));

        let other = Md3Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(other.truncation_as_malformed(), Md3Error::Io(_)));
    }
}
