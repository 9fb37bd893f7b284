//! Longitude normalization and lon/lat mesh helpers.

/// Target range for [`wrap_lon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonRange {
    /// [-180, 180)
    Signed,
    /// [0, 360)
    Unsigned,
}

/// Re-centre a longitude (degrees) into `[lon_0 - 180, lon_0 + 180]`.
///
/// Shifts by at most one turn, so inputs are expected in a conventional
/// range such as [-180, 180] or [0, 360].
#[inline]
pub fn shift_lon(lon: f64, lon_0: f64) -> f64 {
    if lon > lon_0 + 180.0 {
        lon - 360.0
    } else if lon < lon_0 - 180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Re-centre a sequence of longitudes around `lon_0`.
pub fn shift_lons(lons: &[f64], lon_0: f64) -> Vec<f64> {
    lons.iter().map(|&lon| shift_lon(lon, lon_0)).collect()
}

/// Wrap any longitude (degrees) into the requested range.
#[inline]
pub fn wrap_lon(lon: f64, range: LonRange) -> f64 {
    match range {
        LonRange::Unsigned => wrap_turn(lon),
        LonRange::Signed => wrap_turn(lon + 180.0) - 180.0,
    }
}

/// `rem_euclid(360)` rounds tiny negative values up to exactly 360.
#[inline]
fn wrap_turn(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Expand 1-D coordinate vectors into a 2-D mesh.
///
/// Returns `(xx, yy)` in row-major order with one row per `ys` element:
/// `xx[j * xs.len() + i] == xs[i]` and `yy[j * xs.len() + i] == ys[j]`.
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = xs.len() * ys.len();
    let mut xx = Vec::with_capacity(n);
    let mut yy = Vec::with_capacity(n);

    for &y in ys {
        xx.extend_from_slice(xs);
        yy.extend(std::iter::repeat(y).take(xs.len()));
    }

    (xx, yy)
}
