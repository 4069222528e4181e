//! Error types for the image-embed crate.

use tract_onnx::prelude::TractError;

/// Wire tag reported when the image could not be fetched or decoded.
pub const TAG_IMAGE_LOAD_FAILED: &str = "image_load_failed";
/// Wire tag reported when model loading or inference failed.
pub const TAG_EMBED_FAILED: &str = "embed_failed";

/// Errors that can occur while acquiring an image or embedding it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An HTTP request failed (transport error, timeout, or non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The image bytes could not be decoded.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// An I/O error occurred while reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ONNX model could not be loaded or prepared for inference.
    #[error("model load error: {0}")]
    ModelLoad(TractError),

    /// The forward pass failed.
    #[error("inference error: {0}")]
    Inference(TractError),

    /// The model produced an empty feature tensor.
    #[error("model produced no usable features")]
    EmptyFeatures,
}

impl Error {
    /// The wire tag for this error, one of the two strings the calling
    /// pipeline recognizes: fetch/decode problems are `image_load_failed`,
    /// everything downstream of a valid bitmap is `embed_failed`.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Error::Http(_) | Error::Image(_) | Error::Io(_) => TAG_IMAGE_LOAD_FAILED,
            Error::ModelLoad(_) | Error::Inference(_) | Error::EmptyFeatures => TAG_EMBED_FAILED,
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let empty = Error::EmptyFeatures;
        assert!(empty.to_string().contains("features"));
    }

    #[test]
    fn load_errors_map_to_image_load_failed() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io_err.tag(), TAG_IMAGE_LOAD_FAILED);

        let img_err = Error::Image(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        )));
        assert_eq!(img_err.tag(), TAG_IMAGE_LOAD_FAILED);
    }

    #[test]
    fn model_errors_map_to_embed_failed() {
        let load = Error::ModelLoad(TractError::msg("bad graph"));
        assert_eq!(load.tag(), TAG_EMBED_FAILED);

        let infer = Error::Inference(TractError::msg("shape mismatch"));
        assert_eq!(infer.tag(), TAG_EMBED_FAILED);

        assert_eq!(Error::EmptyFeatures.tag(), TAG_EMBED_FAILED);
    }
}
