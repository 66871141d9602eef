//! Two-slot sample buffer with the capture failure policy.

use super::AudioCaptureError;
use crate::params::CaptureErrorPolicy;

/// Captured blocks: the one on screen and the one being filled
#[derive(Debug, Default)]
pub struct SampleFrames {
    current: Vec<i16>,
    next: Vec<i16>,
}

impl SampleFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block currently presented
    pub fn current(&self) -> &[i16] {
        &self.current
    }

    /// Store a capture result and return the block to render
    ///
    /// A failed capture becomes an empty block (`Silence`), keeps the
    /// previous block (`Hold`), or is returned to the caller (`Abort`).
    pub fn advance(
        &mut self,
        captured: Result<Vec<i16>, AudioCaptureError>,
        policy: CaptureErrorPolicy,
    ) -> Result<&[i16], AudioCaptureError> {
        match captured {
            Ok(samples) => {
                self.next = samples;
                std::mem::swap(&mut self.current, &mut self.next);
            }
            Err(e) => match policy {
                CaptureErrorPolicy::Silence => {
                    log::debug!("Capture failed, rendering silence: {}", e);
                    self.next.clear();
                    std::mem::swap(&mut self.current, &mut self.next);
                }
                CaptureErrorPolicy::Hold => {
                    log::debug!("Capture failed, holding last block: {}", e);
                }
                CaptureErrorPolicy::Abort => return Err(e),
            },
        }
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout() -> Result<Vec<i16>, AudioCaptureError> {
        Err(AudioCaptureError::Timeout {
            wanted: 4,
            received: 0,
        })
    }

    #[test]
    fn test_successful_capture_is_presented() {
        let mut frames = SampleFrames::new();

        let shown = frames
            .advance(Ok(vec![1, 2, 3]), CaptureErrorPolicy::Silence)
            .unwrap();
        assert_eq!(shown, &[1, 2, 3]);

        let shown = frames
            .advance(Ok(vec![4, 5]), CaptureErrorPolicy::Silence)
            .unwrap();
        assert_eq!(shown, &[4, 5]);
    }

    #[test]
    fn test_silence_policy_clears_block() {
        let mut frames = SampleFrames::new();
        frames
            .advance(Ok(vec![7, 8]), CaptureErrorPolicy::Silence)
            .unwrap();

        let shown = frames
            .advance(timeout(), CaptureErrorPolicy::Silence)
            .unwrap();
        assert!(shown.is_empty());
    }

    #[test]
    fn test_hold_policy_keeps_block() {
        let mut frames = SampleFrames::new();
        frames.advance(Ok(vec![7, 8]), CaptureErrorPolicy::Hold).unwrap();

        let shown = frames.advance(timeout(), CaptureErrorPolicy::Hold).unwrap();
        assert_eq!(shown, &[7, 8]);
        assert_eq!(frames.current(), &[7, 8]);
    }

    #[test]
    fn test_abort_policy_propagates() {
        let mut frames = SampleFrames::new();
        frames.advance(Ok(vec![7, 8]), CaptureErrorPolicy::Abort).unwrap();

        let result = frames.advance(timeout(), CaptureErrorPolicy::Abort);
        assert!(matches!(result, Err(AudioCaptureError::Timeout { .. })));
        assert_eq!(frames.current(), &[7, 8]);
    }
}
