//! Peak/trough segment localization.
//!
//! Splits a curve into contiguous segments of alternating kind. Interior
//! samples are classified as:
//! - `Peak` at a local minimum (`c[i-1] > c[i] < c[i+1]`)
//! - `Trough` at a local maximum (`c[i-1] < c[i] > c[i+1]`)
//! - otherwise the kind of the currently open segment
//!
//! The first segment's kind comes from the first two samples and uses the
//! opposite convention: `Peak` when the curve rises into index 1. This is
//! existing behavior and is kept as is.
//!
//! Adjacent segments share their boundary index: a segment closed at `i` is
//! followed by one opened at `i`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("segment localization needs at least 2 samples, got {len}")]
    CurveTooShort { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Peak,
    Trough,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Peak => "peak",
            SegmentKind::Trough => "trough",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed index range `[start, end]` of one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
}

/// Partition `curve` into peak/trough segments covering `[0, len-1]`.
pub fn localize_segments(curve: &[f64]) -> Result<Vec<Segment>, SegmentError> {
    let len = curve.len();
    if len < 2 {
        return Err(SegmentError::CurveTooShort { len });
    }

    let initial = if curve[0] < curve[1] {
        SegmentKind::Peak
    } else {
        SegmentKind::Trough
    };
    let mut open = Segment {
        start: 0,
        end: 0,
        kind: initial,
    };
    let mut segments = Vec::new();

    for i in 1..len - 1 {
        let (prev, here, next) = (curve[i - 1], curve[i], curve[i + 1]);
        let kind = if prev > here && here < next {
            SegmentKind::Peak
        } else if prev < here && here > next {
            SegmentKind::Trough
        } else {
            open.kind
        };

        if kind != open.kind || i == len - 2 {
            open.end = i;
            segments.push(open);
            open = Segment {
                start: i,
                end: 0,
                kind,
            };
        }
    }

    open.end = len - 1;
    segments.push(open);
    Ok(segments)
}
