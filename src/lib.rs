//! # masonry-flow
//!
//! Reactive masonry column layout engine for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! masonry-flow distributes a sequence of variable-height items into a
//! fixed number of vertical columns so column heights stay balanced,
//! re-flowing as the viewport width crosses breakpoint boundaries.
//!
//! The pipeline is derived-based:
//! ```text
//! viewport width signal → config derived → controller epoch → layout signal
//! ```
//!
//! Two placement strategies back every layout. Round-robin places items by
//! order alone and publishes synchronously, so something always renders
//! before item heights can be measured. Height-balanced placement runs once
//! every item reports a usable size, retrying on a fixed interval while the
//! host's measurement capability warms up. Item payloads pass through
//! untouched — a layout is columns of item identities (positions in the
//! original sequence).
//!
//! ## Modules
//!
//! - [`types`] - Core types (Layout, ResolvedConfig, MasonryOptions, etc.)
//! - [`breakpoints`] - Width-threshold tables and comparison policies
//! - [`columns`] - The two column assignment strategies
//! - [`measure`] - Measurement capability, handles, readiness gate
//! - [`pipeline`] - Viewport signal, config derived, controller, host

pub mod breakpoints;
pub mod columns;
pub mod measure;
pub mod pipeline;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use breakpoints::{Breakpoints, Comparison};

pub use columns::{assign_balanced, assign_round_robin};

pub use measure::{all_ready, collect_heights, HandleRegistry, MeasureFn, MeasureHandle};

pub use pipeline::{
    create_config_derived, detect_viewport_width, mounted, resolve_config, set_viewport_width,
    viewport_width, viewport_width_signal, Masonry, ResponsiveHost, RETRY_INTERVAL,
};
