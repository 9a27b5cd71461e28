//! Responsive host — binds the viewport to a controller.
//!
//! [`ResponsiveHost`] owns the subscription from the viewport width signal
//! to a [`Masonry`] controller: an effect reads the config derived and
//! pushes the resolved configuration into the controller, which restarts
//! its epoch only when a field actually differs.
//!
//! The subscription is scoped: it is released on [`ResponsiveHost::unmount`]
//! and, as a guarantee for all exit paths, on drop. After release, width
//! changes no longer reach the controller.

use spark_signals::{effect, flush_sync};

use super::config_derived::create_config_derived;
use super::controller::Masonry;

/// Handle owning the viewport→controller subscription.
///
/// Holds the stop function of the binding effect. Hold onto this for as
/// long as the masonry instance should respond to width changes; dropping
/// it tears the subscription down.
pub struct ResponsiveHost {
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl ResponsiveHost {
    /// Subscribe a controller to the viewport width signal.
    ///
    /// The binding effect is flushed once before this returns — before the
    /// first width sample it resolves every table to its default, which
    /// matches the controller's initial config, so mounting alone does not
    /// disturb the current epoch.
    ///
    /// Effects are batched: hosts that push width samples outside an
    /// effect flush cycle (event loops, tests) run them with
    /// `spark_signals::flush_sync()`, the same way the width sample itself
    /// is delivered.
    pub fn mount<T: 'static>(masonry: &Masonry<T>) -> Self {
        let config_derived = create_config_derived(masonry.options().clone());
        let controller = masonry.clone();

        // Reading the derived inside the effect creates the reactive
        // dependency chain back to the width signal.
        let stop_effect = effect(move || {
            let config = config_derived.get();
            controller.apply_config(config);
        });
        flush_sync();

        Self {
            stop_effect: Some(Box::new(stop_effect)),
        }
    }

    /// Release the subscription explicitly.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

impl Drop for ResponsiveHost {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Tests
// =============================================================================
