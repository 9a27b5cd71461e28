//! Column assignment — the two placement strategies.
//!
//! Both strategies walk the item sequence strictly in original order and
//! partition the valid items into columns:
//!
//! - [`assign_round_robin`] ignores heights entirely. It is always
//!   available and is the layout shown before any measurement can occur.
//! - [`assign_balanced`] tracks an accumulated height per column and
//!   appends each item to the currently shortest column. Processing in
//!   arrival order (not sorted by size) keeps the result a deterministic
//!   greedy heuristic with a stable left-to-right reading order for
//!   same-height items, at O(n·columns) for a single pass.
//!
//! Vacant slots (`None`) are skipped during placement and do not count
//! toward column assignment, but identities recorded in the layout are
//! positions in the *original* sequence, so a vacant slot never shifts the
//! identity of the items after it.

use crate::types::{Layout, Strategy};

/// Assign items to columns in round-robin order.
///
/// The i-th valid item (0-indexed, counting only occupied slots) is
/// appended to column `i % columns`.
///
/// A column count of 0 is clamped to 1 rather than faulting; the original
/// behavior for this input is unguarded, so the clamp is this crate's
/// documented choice.
pub fn assign_round_robin<T>(items: &[Option<T>], columns: usize) -> Layout {
    let columns = columns.max(1);
    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); columns];

    let mut valid = 0usize;
    for (seq, slot) in items.iter().enumerate() {
        if slot.is_some() {
            assigned[valid % columns].push(seq);
            valid += 1;
        }
    }

    Layout::new(assigned, Strategy::RoundRobin)
}

/// Assign items to columns by greedy height balancing.
///
/// Each item goes to the column with the minimum accumulated height at the
/// moment it is processed, lowest column index winning ties. The item's
/// height is then added to that column's accumulator.
///
/// `heights` is indexed by sequence position and must cover every occupied
/// slot with a known height — callers gate this behind
/// [`crate::measure::all_ready`]. The assigner never guesses: a missing
/// entry contributes 0.0, exactly like an unmeasured node would.
///
/// Column count 0 clamps to 1, as in [`assign_round_robin`].
pub fn assign_balanced<T>(items: &[Option<T>], heights: &[f64], columns: usize) -> Layout {
    debug_assert_eq!(items.len(), heights.len());

    let columns = columns.max(1);
    let mut assigned: Vec<Vec<usize>> = vec![Vec::new(); columns];
    let mut accumulated = vec![0.0f64; columns];

    for (seq, slot) in items.iter().enumerate() {
        if slot.is_none() {
            continue;
        }

        // Lowest-index column among those with the minimum accumulated
        // height (indexOf-min semantics).
        let mut target = 0usize;
        for (index, height) in accumulated.iter().enumerate().skip(1) {
            if *height < accumulated[target] {
                target = index;
            }
        }

        assigned[target].push(seq);
        accumulated[target] += heights.get(seq).copied().unwrap_or(0.0);
    }

    Layout::new(assigned, Strategy::Balanced)
}

// =============================================================================
// Tests
// =============================================================================
