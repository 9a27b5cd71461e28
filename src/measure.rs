//! Item measurement — gate and handle ownership.
//!
//! The core never measures anything itself. The host supplies a
//! [`MeasureFn`] capability that answers "how tall is this item right now?"
//! with `Some(height)` or `None` (not yet laid out). The answer may change
//! between calls without any event, so readiness is re-evaluated on demand
//! and never cached.
//!
//! # Handle ownership
//!
//! Each occupied slot in the item sequence owns one [`MeasureHandle`],
//! keyed by its sequence position and stamped with the epoch that created
//! it. The [`HandleRegistry`] is rebuilt — not mutated — whenever the item
//! sequence or configuration changes, so a handle from a previous epoch is
//! never reused for a new one.

use std::rc::Rc;

// =============================================================================
// Measurement capability
// =============================================================================

/// Host-supplied measurement capability.
///
/// Invoked on demand; side-effect-free from the core's perspective. `None`
/// means the item cannot be measured yet. Must not call back into the
/// controller that owns the handle.
pub type MeasureFn = Rc<dyn Fn(&MeasureHandle) -> Option<f64>>;

/// Identity handle for measuring one item.
///
/// `seq` is the item's position in the original sequence (its identity);
/// `epoch` stamps which layout epoch the handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasureHandle {
    seq: usize,
    epoch: u64,
}

impl MeasureHandle {
    /// The item's position in the original sequence.
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// The epoch that created this handle.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

// =============================================================================
// Handle registry
// =============================================================================

/// Ownership map from item identity to measurement handle.
///
/// Holds one handle per occupied slot. Rebuilt wholesale on every epoch.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    epoch: u64,
    handles: Vec<Rc<MeasureHandle>>,
}

impl HandleRegistry {
    /// Create an empty registry (epoch 0, no handles).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all handles with fresh ones for the given item sequence.
    ///
    /// Vacant slots get no handle; occupied slots get a handle carrying
    /// their original sequence position.
    pub fn rebuild<T>(&mut self, items: &[Option<T>], epoch: u64) {
        self.epoch = epoch;
        self.handles = items
            .iter()
            .enumerate()
            .filter_map(|(seq, slot)| {
                slot.as_ref().map(|_| Rc::new(MeasureHandle { seq, epoch }))
            })
            .collect();
    }

    /// The epoch the current handles belong to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Handles for all occupied slots, in sequence order.
    pub fn handles(&self) -> &[Rc<MeasureHandle>] {
        &self.handles
    }

    /// Number of tracked (occupied) items.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True if no items are tracked.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

// =============================================================================
// Readiness gate
// =============================================================================

/// Whether a reported height counts as a usable size.
///
/// Exactly zero counts as not-ready: the node exists but has not been laid
/// out yet.
#[inline]
pub fn is_ready(height: Option<f64>) -> bool {
    matches!(height, Some(h) if h.is_finite() && h > 0.0)
}

/// True if every tracked item currently reports a usable size.
///
/// An empty set of handles is vacuously ready. The capability is queried
/// fresh for each handle on every call.
pub fn all_ready(handles: &[Rc<MeasureHandle>], measure: &MeasureFn) -> bool {
    handles.iter().all(|handle| is_ready(measure(handle)))
}

/// Collect every tracked item's height, indexed by sequence position.
///
/// Returns `None` unless all items are ready. The returned vector has
/// length `sequence_len`; positions without a tracked item hold 0.0 and
/// are ignored by the balanced assigner.
pub fn collect_heights(
    handles: &[Rc<MeasureHandle>],
    measure: &MeasureFn,
    sequence_len: usize,
) -> Option<Vec<f64>> {
    let mut heights = vec![0.0f64; sequence_len];
    for handle in handles {
        let measured = measure(handle);
        if !is_ready(measured) {
            return None;
        }
        heights[handle.seq()] = measured.unwrap_or(0.0);
    }
    Some(heights)
}

// =============================================================================
// Tests
// =============================================================================
