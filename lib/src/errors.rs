use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
  #[error("img read error: {0}")]
  ImgReadError(String),
  #[error("img write error: {0}")]
  ImgWriteError(String),
  #[error("img not found: {0}")]
  NotFound(String),
  #[error("input file is missing: {}", .0.display())]
  MissingInput(PathBuf),
  #[error("input contains unsupported image format")]
  UnsupportedFormat,
  #[error("failed to decode image: {0}")]
  DecodeError(String),
  #[error("invalid raw input: {0}")]
  InvalidRawInput(String),
  #[error("image dimensions are zero")]
  ZeroDimensions,
  #[error("invalid params: {0}")]
  InvalidParams(String),
  #[error("tolerance must be between 0 and 100, got {0}")]
  InvalidTolerance(u32),
  #[error("bbx worker failed: {0}")]
  WorkerError(String),
}

impl ImageError {
  /// Whether the error was caused by the caller's input rather than by storage or the worker.
  pub fn is_input_error(&self) -> bool {
    matches!(
      self,
      ImageError::MissingInput(_)
        | ImageError::UnsupportedFormat
        | ImageError::DecodeError(_)
        | ImageError::InvalidRawInput(_)
        | ImageError::ZeroDimensions
        | ImageError::InvalidTolerance(_)
        | ImageError::InvalidParams(_)
    )
  }
}
