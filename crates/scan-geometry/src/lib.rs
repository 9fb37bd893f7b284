//! Geostationary imager scan geometry.
//!
//! Converts geographic coordinates (longitude/latitude, degrees) to the
//! imager's fixed pixel grid (column/row) and back, with explicit visibility
//! tests for points on the far side of the Earth and pixels in space.
//!
//! ```
//! use scan_geometry::{PixelCoordinate, ScanGeometry};
//!
//! let msg = ScanGeometry::msg_vis_ir();
//! assert_eq!(msg.geo_to_pixel(0.0, 0.0).unwrap(), PixelCoordinate::new(1856, 1856));
//! assert!(msg.geo_to_pixel(179.0, 0.0).unwrap_err().is_out_of_view());
//! ```

pub mod batch;
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod longitude;

pub use batch::{
    disc_coverage, geo_grid_to_pixels, geo_to_pixel_batch, pixel_to_geo_batch, BatchSummary,
};
pub use config::ScanGeometryConfig;
pub use coords::{GeoCoordinate, PixelBox, PixelCoordinate, PixelPosition, ScanAngle};
pub use error::{GeometryError, GeometryResult, ViewTarget};
pub use geometry::ScanGeometry;
pub use longitude::{meshgrid, shift_lon, shift_lons, wrap_lon, LonRange};
