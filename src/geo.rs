use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_M, TRIM_FRACTION};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Smallest box holding every point, `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLon>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in iter {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.min_lon = bounds.min_lon.min(p.lon);
            bounds.max_lon = bounds.max_lon.max(p.lon);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Point reached after travelling `distance_m` from `origin` along `bearing_deg`
/// on a sphere of mean Earth radius.
pub fn destination_point(origin: LatLon, distance_m: f64, bearing_deg: f64) -> LatLon {
    let d = distance_m / EARTH_RADIUS_M;
    let brng = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

    LatLon::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Box holding the central 95% of the points.
///
/// Latitudes and longitudes are sorted and trimmed independently, `floor(n * 2.5%)`
/// values from each end, so a point with a central latitude and an extreme
/// longitude can still stretch the box along one axis.
pub fn trimmed_bounds(points: &[LatLon]) -> Option<Bounds> {
    if points.is_empty() {
        return None;
    }

    let mut lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
    let mut lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
    lats.sort_by(f64::total_cmp);
    lons.sort_by(f64::total_cmp);

    let trim = (points.len() as f64 * TRIM_FRACTION).floor() as usize;
    let lats = &lats[trim..lats.len() - trim];
    let lons = &lons[trim..lons.len() - trim];

    Some(Bounds {
        min_lat: *lats.first()?,
        max_lat: *lats.last()?,
        min_lon: *lons.first()?,
        max_lon: *lons.last()?,
    })
}
