//! Reactive Pipeline
//!
//! This module implements the reactive pipeline that connects the viewport
//! width signal to published layouts.
//!
//! # Pipeline Architecture
//!
//! ```text
//! viewport width signal → config derived → controller epoch → layout signal
//!                                               ↑
//!                                     items · retry tick (100ms)
//! ```
//!
//! ## Data Flow
//!
//! 1. **viewport** - Owns the width sample signal (`None` until mounted)
//! 2. **config_derived** - Pure resolution of both config fields from one
//!    width sample
//! 3. **controller** - Epoch state machine: round-robin immediately,
//!    height-balanced once measurable, retrying while Settling
//! 4. **responsive** - Scoped subscription binding the derived to the
//!    controller
//!
//! ## Key Design Principles
//!
//! - **Pure deriveds**: config resolution is a pure computation
//! - **Side effects in the controller**: only controller entry points set
//!   the output signals
//! - **Epoch cancellation**: a stale retry can never publish over a newer
//!   layout

pub mod config_derived;
pub mod controller;
pub mod responsive;
pub mod viewport;

// Re-exports
pub use config_derived::{create_config_derived, resolve_config};
pub use controller::{Masonry, RETRY_INTERVAL};
pub use responsive::ResponsiveHost;
pub use viewport::{
    detect_viewport_width, mounted, reset_viewport, set_viewport_width, viewport_width,
    viewport_width_signal,
};
