//! Config derived — reactive configuration resolution.
//!
//! Creates a Derived that resolves the column-count and gutter breakpoint
//! tables against the viewport width signal. Both fields are resolved from
//! the same width sample in the same computation, so a consumer can never
//! observe a half-updated configuration.

use spark_signals::{derived, Derived};

use crate::types::{MasonryOptions, ResolvedConfig};
use super::viewport::viewport_width_signal;

/// Resolve the configuration for a given width sample.
///
/// `None` (no sample yet) resolves both fields to their defaults. The
/// result is normalized: at least one column, finite non-negative gutter.
pub fn resolve_config(options: &MasonryOptions, width: Option<f64>) -> ResolvedConfig {
    let columns = options.columns_breakpoints.resolve(
        width,
        &options.default_columns,
        options.comparison,
    );
    let gutter = options.gutter_breakpoints.resolve(
        width,
        &options.default_gutter,
        options.comparison,
    );
    ResolvedConfig::new(columns, gutter).normalized()
}

/// Create the config derived.
///
/// Returns a Derived that re-resolves whenever the viewport width signal
/// changes. Reading the width inside the closure creates the reactive
/// dependency.
pub fn create_config_derived(
    options: MasonryOptions,
) -> Derived<ResolvedConfig> {
    let width_signal = viewport_width_signal();

    derived(move || {
        let width = width_signal.get();
        resolve_config(&options, width)
    })
}

// =============================================================================
// Tests
// =============================================================================
