//! # Equal-area projection of geodetic fixes
//!
//! Raw latitude/longitude fixes are normalized to a planar, area-preserving
//! frame before any density estimation: a Lambert azimuthal equal-area
//! projection on the authalic sphere, centered on the centroid of the data.
//!
//! ## Antimeridian handling
//! -----------------
//! When the longitudes of a data set span more than 180°, the set is
//! assumed to straddle the antimeridian and negative longitudes are
//! unwrapped by +360° before the centroid is computed. This keeps the
//! centroid inside the data instead of on the far side of the globe.
//!
//! ## Formulas
//! -----------------
//! With center `(λ0, φ0)` and point `(λ, φ)` in radians on a sphere of
//! radius `R`:
//!
//! ```text
//! k' = sqrt(2 / (1 + sin φ0 sin φ + cos φ0 cos φ cos(λ - λ0)))
//! x  = R k' cos φ sin(λ - λ0)
//! y  = R k' (cos φ0 sin φ - sin φ0 cos φ cos(λ - λ0))
//! ```
//!
//! The projection is exact-area on the sphere; distortion of shape grows
//! with distance from the center, which is immaterial for the
//! cumulative-mass thresholding downstream.

use crate::constants::{Degree, EARTH_AUTHALIC_RADIUS, Meter, EPS};
use crate::reprange_errors::RepRangeError;

/// Projection center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionCenter {
    pub lon: Degree,
    pub lat: Degree,
}

/// Unwrap longitudes in place when the set straddles the antimeridian.
///
/// Longitudes are expected in [-180, 180]. If their span exceeds 180°,
/// negative values are shifted by +360° so the set becomes contiguous.
pub fn unwrap_longitudes(lons: &mut [Degree]) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &l in lons.iter() {
        lo = lo.min(l);
        hi = hi.max(l);
    }
    if hi - lo > 180.0 {
        for l in lons.iter_mut() {
            if *l < 0.0 {
                *l += 360.0;
            }
        }
    }
}

/// Centroid of unwrapped geodetic fixes (arithmetic mean of lon/lat).
///
/// Good enough as a projection center; the equal-area property does not
/// depend on the center being a true spherical mean.
pub fn centroid(lons: &[Degree], lats: &[Degree]) -> Option<ProjectionCenter> {
    if lons.is_empty() || lons.len() != lats.len() {
        return None;
    }
    let n = lons.len() as f64;
    Some(ProjectionCenter {
        lon: lons.iter().sum::<f64>() / n,
        lat: lats.iter().sum::<f64>() / n,
    })
}

/// Forward Lambert azimuthal equal-area projection of one fix.
///
/// Arguments
/// -----------------
/// * `center`: projection center (degrees, unwrapped frame).
/// * `lon`, `lat`: fix coordinates (degrees, same unwrapped frame).
///
/// Return
/// ----------
/// * Planar `(x, y)` in meters, or an error when the fix is antipodal to
///   the center (the projection is singular there).
pub fn project(
    center: ProjectionCenter,
    lon: Degree,
    lat: Degree,
) -> Result<(Meter, Meter), RepRangeError> {
    let lam0 = center.lon.to_radians();
    let phi0 = center.lat.to_radians();
    let lam = lon.to_radians();
    let phi = lat.to_radians();

    let cos_dlam = (lam - lam0).cos();
    let denom = 1.0 + phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * cos_dlam;
    if denom <= EPS {
        return Err(RepRangeError::InvalidParameter(format!(
            "fix ({lon:.4}, {lat:.4}) is antipodal to the projection center"
        )));
    }
    let kp = (2.0 / denom).sqrt();

    let x = EARTH_AUTHALIC_RADIUS * kp * phi.cos() * (lam - lam0).sin();
    let y = EARTH_AUTHALIC_RADIUS
        * kp
        * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * cos_dlam);
    Ok((x, y))
}
