//! Recognition intake: recognizer output through the parser and resolver.

use serde::Serialize;
use ttm_core::KeyValueStore;

use crate::error::RecognitionError;
use crate::parse::{parse_ticket_text, ParseResult};
use crate::resolver::{Completion, Resolver, StopDraft};

/// External OCR or speech engine. An empty transcript is `Ok("")`, not an
/// error.
pub trait TextRecognizer {
    /// # Errors
    ///
    /// Returns [`RecognitionError`] when the engine is unavailable or fails.
    fn recognize(&self, input: &[u8]) -> Result<String, RecognitionError>;
}

/// Input that is already text (a transcript or pre-recognized ticket).
/// Invalid UTF-8 is replaced, never rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRecognizer;

impl TextRecognizer for PlainTextRecognizer {
    fn recognize(&self, input: &[u8]) -> Result<String, RecognitionError> {
        Ok(String::from_utf8_lossy(input).into_owned())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub raw_text: String,
    pub parsed: ParseResult,
    pub completion: Completion,
    /// Stop fields pre-filled from the ticket, not yet on the route.
    pub draft: StopDraft,
}

impl ScanOutcome {
    #[must_use]
    pub fn needs_disambiguation(&self) -> bool {
        self.completion.needs_disambiguation
    }
}

/// Recognize, parse and complete a ticket.
///
/// # Errors
///
/// Returns the recognizer's [`RecognitionError`] unchanged. Nothing is parsed
/// or stored in that case.
pub fn scan_ticket<R, S>(
    recognizer: &R,
    input: &[u8],
    resolver: &Resolver<S>,
) -> Result<ScanOutcome, RecognitionError>
where
    R: TextRecognizer + ?Sized,
    S: KeyValueStore,
{
    let raw_text = recognizer.recognize(input).inspect_err(|e| {
        tracing::warn!(error = %e, retryable = e.is_retryable(), "recognition failed");
    })?;

    let parsed = parse_ticket_text(&raw_text);
    let completion = resolver.auto_complete_address(parsed.partial_address());
    let draft = StopDraft {
        address: completion.address.clone(),
        city: Some(completion.city.clone()),
        phone: parsed.phone.clone(),
        time: parsed.time.clone(),
        notes: parsed.notes.clone(),
    };

    tracing::info!(
        confidence = parsed.confidence,
        score = completion.score,
        needs_disambiguation = completion.needs_disambiguation,
        "scanned ticket"
    );

    Ok(ScanOutcome {
        raw_text,
        parsed,
        completion,
        draft,
    })
}
