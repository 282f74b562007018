//! Trendify Core — weighted lottery ordering and trend-curve analysis.
//!
//! Two independent capabilities:
//! - Weighted draw without replacement: records with more tickets tend to
//!   come out earlier (`shuffle`, driven by an explicit generator from `rng`)
//! - Trend curves: a deterministic oscillating signal (`curve`) and its
//!   peak/trough partition (`segments`)
//!
//! Plus `trim` for capping a result list. Nothing here performs I/O.

pub mod curve;
pub mod record;
pub mod rng;
pub mod segments;
pub mod shuffle;
pub mod trim;

pub use curve::generate_trend_curve;
pub use record::{Entry, RecordError, WeightedRecord};
pub use rng::{entropy_seed, DrawRng, SeedHierarchy};
pub use segments::{localize_segments, Segment, SegmentError, SegmentKind};
pub use shuffle::{
    shuffle_segment, shuffle_with, validate_weights, weighted_shuffle, ShuffleError,
    ShuffleStrategy,
};
pub use trim::{trim, trim_slice};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: public types can cross thread boundaries.
    ///
    /// The runner moves records and generators into rayon workers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Entry>();
        require_sync::<Entry>();
        require_send::<DrawRng>();
        require_sync::<DrawRng>();
        require_send::<SeedHierarchy>();
        require_sync::<SeedHierarchy>();
        require_send::<Segment>();
        require_sync::<Segment>();
        require_send::<ShuffleStrategy>();
        require_sync::<ShuffleStrategy>();
        require_send::<shuffle::FenwickTree>();
        require_sync::<shuffle::FenwickTree>();
    }
}
