use thiserror::Error;

/// Failure reported by an OCR or speech recognizer.
///
/// Distinct from recognizing empty text: an empty transcript is `Ok("")`.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The recognizer is not supported or not installed on this platform.
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    /// The recognizer ran and failed.
    #[error("recognition failed: {0}")]
    Failed(String),
}

impl RecognitionError {
    /// Both kinds leave no partial state behind, so the user may always retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RecognitionError::Unavailable(_) | RecognitionError::Failed(_)
        )
    }
}
