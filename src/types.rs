//! Core types for masonry-flow.
//!
//! These types define the foundation that everything builds on.
//! They flow through the reactive pipeline and define what the host
//! understands: a resolved configuration (column count + gutter) and a
//! layout (ordered columns of item identities).

use crate::breakpoints::{Breakpoints, Comparison};

// =============================================================================
// Defaults
// =============================================================================

/// Column count used when no width sample exists and no threshold matches.
pub const DEFAULT_COLUMNS: usize = 3;

/// Gutter spacing used when no width sample exists and no threshold matches.
pub const DEFAULT_GUTTER: f64 = 10.0;

// =============================================================================
// Strategy
// =============================================================================

/// Which placement strategy produced a [`Layout`].
///
/// Round-robin is the always-available, order-only placement shown before
/// item heights can be measured. Balanced is the height-aware placement
/// published once every tracked item reports a usable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Order-only placement: i-th valid item into column `i % columns`.
    #[default]
    RoundRobin,
    /// Greedy height-balancing placement in arrival order.
    Balanced,
}

// =============================================================================
// ResolvedConfig
// =============================================================================

/// Configuration derived from the current viewport width.
///
/// Both fields are always recomputed together from the same width sample so
/// hosts never observe a column count from one width paired with a gutter
/// from another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    /// Number of columns. Normalized to at least 1.
    pub columns: usize,
    /// Spacing between columns (and between items within a column).
    pub gutter: f64,
}

impl ResolvedConfig {
    /// Create a config. Call [`ResolvedConfig::normalized`] before use if
    /// the values come from an untrusted breakpoint table.
    pub const fn new(columns: usize, gutter: f64) -> Self {
        Self { columns, gutter }
    }

    /// Clamp degenerate values: zero columns becomes 1, non-finite or
    /// negative gutter becomes 0.0.
    pub fn normalized(self) -> Self {
        Self {
            columns: self.columns.max(1),
            gutter: if self.gutter.is_finite() {
                self.gutter.max(0.0)
            } else {
                0.0
            },
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            gutter: DEFAULT_GUTTER,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// A partition of the item sequence into ordered columns.
///
/// Each column holds item identities: positions in the original item
/// sequence. The multiset union of all columns equals exactly the valid
/// items of the input — no duplication, no loss. A layout is produced fresh
/// on every epoch and never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    /// Columns in index order 0..columns-1.
    pub columns: Vec<Vec<usize>>,
    /// The strategy that produced this layout.
    pub strategy: Strategy,
}

impl Layout {
    /// Create a layout from pre-assigned columns.
    pub fn new(columns: Vec<Vec<usize>>, strategy: Strategy) -> Self {
        Self { columns, strategy }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of placed items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// True if no items have been placed.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    /// The identities in one column, or an empty slice for an out-of-range
    /// column index.
    pub fn column(&self, index: usize) -> &[usize] {
        self.columns.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

// =============================================================================
// ChangeFlags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// What a controller operation changed, as a bitfield.
    ///
    /// Combine with bitwise OR: `ChangeFlags::ITEMS | ChangeFlags::LAYOUT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChangeFlags: u8 {
        const NONE = 0;
        /// The item sequence was replaced.
        const ITEMS = 1 << 0;
        /// The resolved column count changed.
        const COLUMNS = 1 << 1;
        /// The resolved gutter changed.
        const GUTTER = 1 << 2;
        /// A layout was published to the layout signal.
        const LAYOUT = 1 << 3;
        /// A height-balanced layout was published (distributed flag set).
        const DISTRIBUTED = 1 << 4;
    }
}

// =============================================================================
// MasonryOptions
// =============================================================================

/// Configuration surface for a masonry instance.
///
/// Defaults match the stock responsive tiers: one column under 750, two up
/// to 900, three beyond, with gutters widening alongside.
#[derive(Debug, Clone)]
pub struct MasonryOptions {
    /// Width thresholds resolving to a column count.
    pub columns_breakpoints: Breakpoints<usize>,
    /// Width thresholds resolving to a gutter.
    pub gutter_breakpoints: Breakpoints<f64>,
    /// Column count when no width sample exists or no threshold matches.
    pub default_columns: usize,
    /// Gutter when no width sample exists or no threshold matches.
    pub default_gutter: f64,
    /// When true, only round-robin layouts are ever published; height
    /// balancing is permanently disabled for this instance.
    pub sequential: bool,
    /// Whether a threshold exactly at the width sample adopts the new tier
    /// (inclusive) or keeps the previous one (strict).
    pub comparison: Comparison,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            columns_breakpoints: Breakpoints::from([(350.0, 1), (750.0, 2), (900.0, 3)]),
            gutter_breakpoints: Breakpoints::from([(350.0, 10.0), (750.0, 15.0), (900.0, 20.0)]),
            default_columns: DEFAULT_COLUMNS,
            default_gutter: DEFAULT_GUTTER,
            sequential: false,
            comparison: Comparison::Inclusive,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
