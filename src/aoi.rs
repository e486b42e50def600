use crate::error::{FetchError, Result};

/// A validated area of interest. Coordinates are WGS84 degrees; polygon
/// rings are (longitude, latitude) pairs and must be explicitly closed.
#[derive(Clone, Debug, PartialEq)]
pub enum AreaOfInterest {
    Point { latitude: f64, longitude: f64 },
    Polygon(Vec<(f64, f64)>),
}

impl AreaOfInterest {
    pub fn point(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinate(latitude, longitude)?;
        Ok(AreaOfInterest::Point {
            latitude,
            longitude,
        })
    }

    pub fn polygon(ring: Vec<(f64, f64)>) -> Result<Self> {
        if ring.len() < 4 {
            return Err(FetchError::InvalidAoi(format!(
                "polygon ring needs at least 4 points, got {}",
                ring.len()
            )));
        }

        if ring.first() != ring.last() {
            return Err(FetchError::InvalidAoi(
                "polygon ring is not closed (first and last point differ)".into(),
            ));
        }

        for &(lon, lat) in &ring {
            check_coordinate(lat, lon)?;
        }

        Ok(AreaOfInterest::Polygon(ring))
    }

    /// Resolve the raw request payload shape: either a lat/lon pair or a
    /// GeoJSON-style ring of [lon, lat] positions, never both.
    pub fn resolve(
        latitude: Option<f64>,
        longitude: Option<f64>,
        polygon: Option<&[[f64; 2]]>,
    ) -> Result<Self> {
        match (latitude, longitude, polygon) {
            (Some(lat), Some(lon), None) => Self::point(lat, lon),
            (None, None, Some(ring)) => {
                Self::polygon(ring.iter().map(|p| (p[0], p[1])).collect())
            }
            (None, None, None) => Err(FetchError::InvalidAoi(
                "missing area of interest: provide latitude/longitude or polygon".into(),
            )),
            _ => Err(FetchError::InvalidAoi(
                "provide either latitude/longitude or polygon, not both".into(),
            )),
        }
    }

    /// Well-known-text footprint for the catalog's spatial filter.
    pub fn to_wkt(&self) -> String {
        match self {
            AreaOfInterest::Point {
                latitude,
                longitude,
            } => format!("POINT({} {})", longitude, latitude),
            AreaOfInterest::Polygon(ring) => {
                let coords: Vec<String> = ring
                    .iter()
                    .map(|(lon, lat)| format!("{} {}", lon, lat))
                    .collect();
                format!("POLYGON(({}))", coords.join(","))
            }
        }
    }
}

fn check_coordinate(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(FetchError::InvalidAoi(format!(
            "latitude {} out of range [-90, 90]",
            lat
        )));
    }

    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(FetchError::InvalidAoi(format!(
            "longitude {} out of range [-180, 180]",
            lon
        )));
    }

    Ok(())
}
