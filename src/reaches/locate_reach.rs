use crate::reaches::error::LocateReachError;
use crate::types::reach::{ReachLookup, ReachPoint, RegionBounds, RegionReaches};
use haversine::{distance, Location as HaversineLocation, Units};
use log::debug;
use polars::prelude::*;
use rstar::RTree;
use std::io::Cursor;

/// Beyond this many degrees the nearest reach is unlikely to be the stream the caller meant.
pub const MAX_REACH_DISTANCE_DEGREES: f64 = 0.11;

impl RegionReaches {
    /// Reads reference points from a `comid,Lat,Lon` CSV. Extra columns are ignored.
    pub fn from_csv(
        name: impl Into<String>,
        bounds: RegionBounds,
        body: &[u8],
    ) -> Result<Self, LocateReachError> {
        let name = name.into();
        let csv_error = |source| LocateReachError::Csv {
            region: name.clone(),
            source,
        };
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(body))
            .finish()
            .map_err(csv_error)?;

        let column = |column: &'static str, dtype: &DataType| -> Result<Series, LocateReachError> {
            df.column(column)
                .map_err(|_| LocateReachError::MissingColumn {
                    region: name.clone(),
                    column,
                })?
                .as_materialized_series()
                .cast(dtype)
                .map_err(csv_error)
        };
        let ids = column("comid", &DataType::Int64)?;
        let lats = column("Lat", &DataType::Float64)?;
        let lons = column("Lon", &DataType::Float64)?;

        let ids = ids.i64().map_err(csv_error)?;
        let lats = lats.f64().map_err(csv_error)?;
        let lons = lons.f64().map_err(csv_error)?;

        let reaches = ids
            .into_iter()
            .zip(lats)
            .zip(lons)
            .enumerate()
            .map(|(row, ((id, lat), lon))| match (id, lat, lon) {
                (Some(reach_id), Some(lat), Some(lon)) => Ok(ReachPoint { reach_id, lat, lon }),
                _ => Err(LocateReachError::MissingValue {
                    region: name.clone(),
                    row,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            bounds,
            reaches,
        })
    }
}

#[derive(Debug, Clone)]
struct IndexedRegion {
    name: String,
    bounds: RegionBounds,
    rtree: RTree<ReachPoint>,
}

/// Finds the stream reach nearest to a coordinate.
#[derive(Debug, Clone)]
pub struct ReachLocator {
    regions: Vec<IndexedRegion>,
}

impl ReachLocator {
    /// Regions are searched in the given order.
    pub fn new(regions: Vec<RegionReaches>) -> Self {
        let regions = regions
            .into_iter()
            .map(|region| IndexedRegion {
                name: region.name,
                bounds: region.bounds,
                rtree: RTree::bulk_load(region.reaches),
            })
            .collect();
        Self { regions }
    }

    /// Name of the first region whose bounding box contains the point.
    pub fn region_of(&self, lat: f64, lon: f64) -> Option<&str> {
        self.regions
            .iter()
            .find(|region| region.bounds.contains(lat, lon))
            .map(|region| region.name.as_str())
    }

    /// Locates the reach nearest to `(lat, lon)` within the region containing it.
    ///
    /// # Errors
    ///
    /// [`LocateReachError::OutsideRegions`] if no region contains the point.
    pub fn locate(&self, lat: f64, lon: f64) -> Result<ReachLookup, LocateReachError> {
        let region = self
            .regions
            .iter()
            .find(|region| region.bounds.contains(lat, lon))
            .ok_or(LocateReachError::OutsideRegions { lat, lon })?;

        let Some((nearest, distance_2)) = region.rtree.nearest_neighbor_iter_with_distance_2(&[lat, lon]).next()
        else {
            return Ok(ReachLookup::NoNearbyStream);
        };
        let distance_degrees = distance_2.sqrt();
        if distance_degrees > MAX_REACH_DISTANCE_DEGREES {
            debug!(
                "Nearest reach {} in {} is {:.3} degrees away",
                nearest.reach_id, region.name, distance_degrees
            );
            return Ok(ReachLookup::NoNearbyStream);
        }

        let distance_km = distance(
            HaversineLocation {
                latitude: lat,
                longitude: lon,
            },
            HaversineLocation {
                latitude: nearest.lat,
                longitude: nearest.lon,
            },
            Units::Kilometers,
        );
        Ok(ReachLookup::Found {
            reach_id: nearest.reach_id,
            region: region.name.clone(),
            distance_degrees,
            distance_km,
        })
    }
}
