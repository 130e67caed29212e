//! Stream reach reference points and delineation regions, with the `rstar`
//! implementations used for nearest-reach queries.

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A reach id with a representative coordinate on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachPoint {
    pub reach_id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl RTreeObject for ReachPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

/// Planar distance in degrees, matching how the nearest reach is chosen.
impl PointDistance for ReachPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.lat - point[0];
        let d_lon = self.lon - point[1];
        d_lat * d_lat + d_lon * d_lon
    }
}

/// Bounding box of a delineation region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl RegionBounds {
    /// Strictly inside; points on the edge belong to no region.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.min_lat && lat < self.max_lat && lon > self.min_lon && lon < self.max_lon
    }
}

/// The reference points of one delineation region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionReaches {
    /// API region name, e.g. `south_america-geoglows`.
    pub name: String,
    pub bounds: RegionBounds,
    pub reaches: Vec<ReachPoint>,
}

/// Result of locating the reach nearest to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReachLookup {
    Found {
        reach_id: i64,
        region: String,
        distance_degrees: f64,
        distance_km: f64,
    },
    /// The nearest reach is more than [`crate::MAX_REACH_DISTANCE_DEGREES`] away.
    NoNearbyStream,
}
