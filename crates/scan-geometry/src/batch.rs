//! Bulk transforms over many coordinates.
//!
//! Every element is transformed independently, so a failure (typically
//! `OutOfView` for part of a box that hangs off the disc) is reported in its
//! own slot and never aborts the batch. Output order always matches input
//! order. Large inputs are spread across the rayon thread pool.

use rayon::prelude::*;
use tracing::debug;

use crate::coords::{GeoCoordinate, PixelCoordinate, PixelPosition};
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::ScanGeometry;
use crate::longitude::meshgrid;

/// Minimum element count worth splitting across threads
const PARALLEL_THRESHOLD: usize = 4096;

/// Outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub visible: usize,
    pub out_of_view: usize,
    pub invalid: usize,
}

impl BatchSummary {
    /// Tally the outcomes of a batch.
    pub fn from_results<T>(results: &[GeometryResult<T>]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                Ok(_) => summary.visible += 1,
                Err(GeometryError::OutOfView(_)) => summary.out_of_view += 1,
                Err(_) => summary.invalid += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.visible + self.out_of_view + self.invalid
    }
}

fn map_elements<I, O, F>(items: &[I], f: F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Sync + Send,
{
    if items.len() >= PARALLEL_THRESHOLD {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Convert many geographic coordinates to pixels.
pub fn geo_to_pixel_batch(
    geometry: &ScanGeometry,
    coords: &[GeoCoordinate],
) -> Vec<GeometryResult<PixelCoordinate>> {
    let results = map_elements(coords, |c| geometry.geo_to_pixel(c.lon, c.lat));
    log_summary("geo_to_pixel", &results);
    results
}

/// Convert many pixel positions to geographic coordinates.
pub fn pixel_to_geo_batch(
    geometry: &ScanGeometry,
    pixels: &[PixelPosition],
) -> Vec<GeometryResult<GeoCoordinate>> {
    let results = map_elements(pixels, |p| geometry.pixel_to_geo(p.col, p.row));
    log_summary("pixel_to_geo", &results);
    results
}

/// Convert the mesh spanned by two coordinate vectors to pixels.
///
/// The result is row-major with one row per latitude:
/// element `j * lons.len() + i` is the pixel of `(lons[i], lats[j])`.
pub fn geo_grid_to_pixels(
    geometry: &ScanGeometry,
    lons: &[f64],
    lats: &[f64],
) -> Vec<GeometryResult<PixelCoordinate>> {
    let (xx, yy) = meshgrid(lons, lats);
    let coords: Vec<GeoCoordinate> = xx
        .into_iter()
        .zip(yy)
        .map(|(lon, lat)| GeoCoordinate { lon, lat })
        .collect();
    geo_to_pixel_batch(geometry, &coords)
}

/// Geolocate every pixel of a `columns x rows` grid.
///
/// Row-major; element `row * columns + col` holds the location of pixel
/// `(col, row)`, or None where the pixel lies in space. Fails with
/// `GridTooLarge` when `columns * rows` overflows `usize`.
pub fn disc_coverage(
    geometry: &ScanGeometry,
    columns: usize,
    rows: usize,
) -> GeometryResult<Vec<Option<GeoCoordinate>>> {
    let len = columns
        .checked_mul(rows)
        .ok_or(GeometryError::GridTooLarge { columns, rows })?;
    let mut output = vec![None; len];
    if len == 0 {
        return Ok(output);
    }

    let fill_row = |(row, line): (usize, &mut [Option<GeoCoordinate>])| {
        for (col, slot) in line.iter_mut().enumerate() {
            *slot = geometry.pixel_to_geo(col as f64, row as f64).ok();
        }
    };
    if len >= PARALLEL_THRESHOLD {
        output.par_chunks_mut(columns).enumerate().for_each(fill_row);
    } else {
        output.chunks_mut(columns).enumerate().for_each(fill_row);
    }

    let on_disc = output.iter().filter(|g| g.is_some()).count();
    debug!(columns, rows, on_disc, "Computed disc coverage");
    Ok(output)
}

fn log_summary<T>(operation: &str, results: &[GeometryResult<T>]) {
    let summary = BatchSummary::from_results(results);
    debug!(
        operation,
        total = summary.total(),
        visible = summary.visible,
        out_of_view = summary.out_of_view,
        invalid = summary.invalid,
        "Batch transform complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_order_and_per_element_errors() {
        let geom = ScanGeometry::msg_vis_ir();
        let coords = vec![
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(179.0, 0.0),
            GeoCoordinate::new(f64::NAN, 0.0),
            GeoCoordinate::new(10.0, 45.0),
        ];

        let results = geo_to_pixel_batch(&geom, &coords);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0], Ok(PixelCoordinate::new(1856, 1856)));
        assert!(results[1].as_ref().unwrap_err().is_out_of_view());
        assert!(results[2].as_ref().unwrap_err().is_invalid_input());
        assert_eq!(results[3], Ok(PixelCoordinate::new(1608, 3268)));

        let summary = BatchSummary::from_results(&results);
        assert_eq!(
            summary,
            BatchSummary {
                visible: 2,
                out_of_view: 1,
                invalid: 1
            }
        );
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let geom = ScanGeometry::msg_vis_ir();
        // Large enough to take the parallel path
        let coords: Vec<GeoCoordinate> = (0..10_000)
            .map(|i| GeoCoordinate::new(-100.0 + (i % 200) as f64, -85.0 + (i / 200) as f64 * 3.4))
            .collect();

        let results = geo_to_pixel_batch(&geom, &coords);
        for (c, r) in coords.iter().zip(&results) {
            assert_eq!(*r, geom.geo_to_pixel(c.lon, c.lat));
        }
    }

    #[test]
    fn test_geo_grid_layout() {
        let geom = ScanGeometry::msg_vis_ir();
        let lons = [-10.0, 0.0, 10.0];
        let lats = [45.0, 0.0];

        let results = geo_grid_to_pixels(&geom, &lons, &lats);
        assert_eq!(results.len(), 6);
        assert_eq!(results[0], Ok(PixelCoordinate::new(2104, 3268)));
        assert_eq!(results[2], Ok(PixelCoordinate::new(1608, 3268)));
        assert_eq!(results[4], Ok(PixelCoordinate::new(1856, 1856)));
    }

    #[test]
    fn test_disc_coverage_small_grid() {
        // Coarse 4x4 grid over the same disc: COFF/LOFF at the centre,
        // scale factors shrunk so the grid spans the full disc.
        let geom = crate::config::ScanGeometryConfig {
            column_offset: 1.5,
            row_offset: 1.5,
            column_scale_factor: -781648343.0 / 928.0,
            row_scale_factor: -781648343.0 / 928.0,
            ..Default::default()
        }
        .build()
        .unwrap();

        let coverage = disc_coverage(&geom, 4, 4).unwrap();
        assert_eq!(coverage.len(), 16);

        // Corners are in space, the four centre pixels are on the disc
        for idx in [0, 3, 12, 15] {
            assert!(coverage[idx].is_none(), "corner {} should be off-disc", idx);
        }
        for idx in [5, 6, 9, 10] {
            assert!(coverage[idx].is_some(), "centre {} should be on disc", idx);
        }

        assert!(disc_coverage(&geom, 0, 4).unwrap().is_empty());
        assert!(disc_coverage(&geom, 4, 0).unwrap().is_empty());
    }

    #[test]
    fn test_disc_coverage_rejects_overflowing_grid() {
        let geom = ScanGeometry::msg_vis_ir();
        assert_eq!(
            disc_coverage(&geom, usize::MAX, 2),
            Err(GeometryError::GridTooLarge {
                columns: usize::MAX,
                rows: 2
            })
        );
    }

    #[test]
    fn test_disc_coverage_parallel_matches_scalar() {
        // Full disc on a 64x64 grid
        let geom = crate::config::ScanGeometryConfig {
            column_offset: 31.5,
            row_offset: 31.5,
            column_scale_factor: -781648343.0 / 58.0,
            row_scale_factor: -781648343.0 / 58.0,
            ..Default::default()
        }
        .build()
        .unwrap();
        let (columns, rows) = (64, 64);
        assert!(columns * rows >= PARALLEL_THRESHOLD);

        let coverage = disc_coverage(&geom, columns, rows).unwrap();
        assert!(coverage[0].is_none());
        assert!(coverage[32 * columns + 32].is_some());
        for (idx, slot) in coverage.iter().enumerate() {
            let (col, row) = (idx % columns, idx / columns);
            assert_eq!(*slot, geom.pixel_to_geo(col as f64, row as f64).ok(), "pixel {}", idx);
        }
    }
}
