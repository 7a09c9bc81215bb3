//! Course-progress percentage.
//!
//! Progress is derived on every listing from the persisted
//! completed-item sets; the percentage itself is never stored.

/// `round(100 * completed / total)`, with 0 when `total` is 0.
///
/// `completed` may legitimately exceed `total` (content removed after
/// completion); the value is reported as-is rather than clamped.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}
