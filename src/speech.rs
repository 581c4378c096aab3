//! One-shot voice capture.
//!
//! A capture is a single short recording turned into one transcript. The
//! state machine is deliberately tiny: Idle or Listening, nothing else. Any
//! failure along the way (no transcriber configured, bad payload, service
//! error, silence) ends the capture quietly; voice input never raises a
//! user-facing error.

use base64::Engine as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Listening,
}

/// Per-session capture state. Guards against overlapping captures: while one
/// is in flight, further start requests are rejected.
#[derive(Debug)]
pub struct SpeechCapture {
    state: CaptureState,
}

impl SpeechCapture {
    pub fn new() -> Self {
        Self { state: CaptureState::Idle }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Move Idle -> Listening. Returns false (and changes nothing) when a
    /// capture is already running.
    pub fn begin(&mut self) -> bool {
        if self.state == CaptureState::Listening {
            return false;
        }
        self.state = CaptureState::Listening;
        true
    }

    /// Back to Idle. Called on every outcome, success or not.
    pub fn end(&mut self) {
        self.state = CaptureState::Idle;
    }
}

impl Default for SpeechCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanity-check an incoming audio payload before spending a service call on
/// it. Returns the decoded size in bytes, or None for empty/undecodable data.
pub fn validate_audio(audio_base64: &str) -> Option<usize> {
    let trimmed = audio_base64.trim();
    if trimmed.is_empty() {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .ok()
        .filter(|bytes| !bytes.is_empty())
        .map(|bytes| bytes.len())
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    #[test]
    fn capture_is_single_shot() {
        let mut capture = SpeechCapture::new();
        assert_eq!(capture.state(), CaptureState::Idle);

        assert!(capture.begin());
        assert_eq!(capture.state(), CaptureState::Listening);

        // second start while listening is rejected
        assert!(!capture.begin());
        assert_eq!(capture.state(), CaptureState::Listening);

        capture.end();
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.begin());
    }

    #[test]
    fn validate_audio_accepts_standard_base64() {
        let payload = base64::engine::general_purpose::STANDARD.encode(b"webm bytes");
        assert_eq!(validate_audio(&payload), Some(10));
    }

    #[test]
    fn validate_audio_rejects_empty_and_garbage() {
        assert_eq!(validate_audio(""), None);
        assert_eq!(validate_audio("   "), None);
        assert_eq!(validate_audio("!!not base64!!"), None);
    }
}
