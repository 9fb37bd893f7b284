//! Coordinate value types.
//!
//! Geographic coordinates are in degrees. Pixel coordinates are grid indices
//! from the image's internal origin; no bound is enforced here, callers clamp
//! to their sensor grid with [`PixelBox::clamp`].

use serde::{Deserialize, Serialize};

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for GeoCoordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// An integer (column, row) pixel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub col: i64,
    pub row: i64,
}

impl PixelCoordinate {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

impl From<(i64, i64)> for PixelCoordinate {
    fn from((col, row): (i64, i64)) -> Self {
        Self { col, row }
    }
}

/// A fractional (column, row) position on the pixel grid.
///
/// Sub-pixel positions are meaningful: the transforms are continuous and
/// only [`PixelPosition::round`] quantizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    pub col: f64,
    pub row: f64,
}

impl PixelPosition {
    pub fn new(col: f64, row: f64) -> Self {
        Self { col, row }
    }

    /// Nearest integer pixel, halves rounded away from zero.
    #[inline]
    pub fn round(&self) -> PixelCoordinate {
        PixelCoordinate {
            col: self.col.round() as i64,
            row: self.row.round() as i64,
        }
    }
}

impl From<PixelCoordinate> for PixelPosition {
    fn from(p: PixelCoordinate) -> Self {
        Self {
            col: p.col as f64,
            row: p.row as f64,
        }
    }
}

impl From<(f64, f64)> for PixelPosition {
    fn from((col, row): (f64, f64)) -> Self {
        Self { col, row }
    }
}

/// Satellite viewing angles in radians.
///
/// `x` is the east-west scan angle, `y` the north-south one; both are zero
/// at the sub-satellite point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanAngle {
    pub x: f64,
    pub y: f64,
}

/// A rectangular window on the pixel grid given by two corner pixels.
///
/// The corners are kept as produced by the transform. Depending on the sign
/// of the scaling factors a geographic top-left corner may land on a larger
/// column or row than the bottom-right one, so use [`PixelBox::normalized`]
/// before slicing an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub top_left: PixelCoordinate,
    pub bottom_right: PixelCoordinate,
}

impl PixelBox {
    pub fn new(top_left: PixelCoordinate, bottom_right: PixelCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Reorder the corners so that `top_left` holds the minimum column and row.
    pub fn normalized(&self) -> PixelBox {
        PixelBox {
            top_left: PixelCoordinate {
                col: self.top_left.col.min(self.bottom_right.col),
                row: self.top_left.row.min(self.bottom_right.row),
            },
            bottom_right: PixelCoordinate {
                col: self.top_left.col.max(self.bottom_right.col),
                row: self.top_left.row.max(self.bottom_right.row),
            },
        }
    }

    /// Number of columns covered, both corners inclusive.
    pub fn width(&self) -> u64 {
        self.top_left.col.abs_diff(self.bottom_right.col) + 1
    }

    /// Number of rows covered, both corners inclusive.
    pub fn height(&self) -> u64 {
        self.top_left.row.abs_diff(self.bottom_right.row) + 1
    }

    /// Check if a pixel lies inside the box (corners inclusive).
    pub fn contains(&self, pixel: PixelCoordinate) -> bool {
        let b = self.normalized();
        pixel.col >= b.top_left.col
            && pixel.col <= b.bottom_right.col
            && pixel.row >= b.top_left.row
            && pixel.row <= b.bottom_right.row
    }

    /// Restrict the box to a `columns x rows` sensor grid.
    ///
    /// Returns the normalized, clamped box, or None if it lies entirely
    /// outside the grid.
    pub fn clamp(&self, columns: u32, rows: u32) -> Option<PixelBox> {
        if columns == 0 || rows == 0 {
            return None;
        }
        let b = self.normalized();
        let max_col = columns as i64 - 1;
        let max_row = rows as i64 - 1;

        if b.bottom_right.col < 0
            || b.bottom_right.row < 0
            || b.top_left.col > max_col
            || b.top_left.row > max_row
        {
            return None;
        }

        Some(PixelBox {
            top_left: PixelCoordinate {
                col: b.top_left.col.max(0),
                row: b.top_left.row.max(0),
            },
            bottom_right: PixelCoordinate {
                col: b.bottom_right.col.min(max_col),
                row: b.bottom_right.row.min(max_row),
            },
        })
    }
}
