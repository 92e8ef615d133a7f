//! Bounding boxes in page image coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A rectangle on a page image, in pixels with the origin at the top-left.
///
/// `right` and `bottom` are exclusive. The textual form is
/// `[left,right,top,bottom]`, which is also the second half of a word's
/// local ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub left: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Top edge
    pub top: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Doubled center coordinates, kept integral.
    pub fn center2(&self) -> (i64, i64) {
        (
            self.left as i64 + self.right as i64,
            self.top as i64 + self.bottom as i64,
        )
    }

    /// Check whether the two boxes share any rows.
    pub fn overlaps_vertically(&self, other: &BoundingBox) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }

    /// Check whether the box has no area.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.left, self.right, self.top, self.bottom
        )
    }
}

impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        let coords = inner
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::parse("bounding box", s))?;

        match coords.as_slice() {
            &[left, right, top, bottom] => Ok(Self::new(left, right, top, bottom)),
            _ => Err(Error::parse("bounding box", s)),
        }
    }
}
