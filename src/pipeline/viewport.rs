//! Viewport width signal.
//!
//! Owns the process-wide width sample that breakpoint resolution reads.
//! The signal starts as `None` — "no width observed yet" — which is a
//! distinct state from a real width of 0: before the first sample, every
//! breakpoint table resolves to its configured default instead of
//! collapsing to its smallest tier.
//!
//! The host pushes samples in via [`set_viewport_width`] (from whatever
//! resize-notification source it has); terminal hosts can seed the signal
//! with [`detect_viewport_width`].

use std::io;

use spark_signals::{signal, Signal};

thread_local! {
    /// Current viewport width sample. `None` until the first sample arrives.
    static VIEWPORT_WIDTH: Signal<Option<f64>> = signal(None);
}

/// The viewport width signal (for reactive reads inside deriveds/effects).
pub fn viewport_width_signal() -> Signal<Option<f64>> {
    VIEWPORT_WIDTH.with(|s| s.clone())
}

/// Current width sample, if any has been observed.
pub fn viewport_width() -> Option<f64> {
    VIEWPORT_WIDTH.with(|s| s.get())
}

/// True once a width sample has been observed.
pub fn mounted() -> bool {
    viewport_width().is_some()
}

/// Publish a new width sample.
///
/// Non-finite or negative samples are normalized to 0.0 so breakpoint
/// comparisons never see NaN.
pub fn set_viewport_width(width: f64) {
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    VIEWPORT_WIDTH.with(|s| s.set(Some(width)));
}

/// Seed the width signal from the terminal size.
pub fn detect_viewport_width() -> io::Result<()> {
    let (width, _height) = crossterm::terminal::size()?;
    set_viewport_width(width as f64);
    Ok(())
}

/// Reset to the pre-first-sample state. Intended for tests.
pub fn reset_viewport() {
    VIEWPORT_WIDTH.with(|s| s.set(None));
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unmounted() {
        reset_viewport();
        assert_eq!(viewport_width(), None);
        assert!(!mounted());
    }

    #[test]
    fn test_set_and_read() {
        reset_viewport();
        set_viewport_width(1024.0);
        assert_eq!(viewport_width(), Some(1024.0));
        assert!(mounted());
    }

    #[test]
    fn test_zero_is_a_real_sample() {
        reset_viewport();
        set_viewport_width(0.0);
        assert_eq!(viewport_width(), Some(0.0));
        assert!(mounted());
    }

    #[test]
    fn test_malformed_samples_normalized() {
        reset_viewport();
        set_viewport_width(f64::NAN);
        assert_eq!(viewport_width(), Some(0.0));
        set_viewport_width(-300.0);
        assert_eq!(viewport_width(), Some(0.0));
    }
}
