//! Map points, extents and centers for mappable fires.

use fire_stats_analytics_models::{MapBounds, MapPoint};
use fire_stats_fire_models::{Coordinates, FireRecord};
use geo::{BoundingRect, Centroid, MultiPoint, Point};

/// Fires with a point of origin, in input order.
#[must_use]
pub fn map_points(records: &[FireRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|record| {
            let point = record.location.coordinates?;
            Some(MapPoint {
                id: record.id.clone(),
                latitude: point.latitude,
                longitude: point.longitude,
                size_acres: record.size_acres,
                cause: record.cause.clone(),
            })
        })
        .collect()
}

fn multi_point(records: &[FireRecord]) -> MultiPoint<f64> {
    records
        .iter()
        .filter_map(|r| r.location.coordinates)
        .map(|c| Point::new(c.longitude, c.latitude))
        .collect()
}

/// Bounding box of every mappable fire, or `None` when no fire has a point.
#[must_use]
pub fn map_bounds(records: &[FireRecord]) -> Option<MapBounds> {
    let rect = multi_point(records).bounding_rect()?;
    Some(MapBounds {
        min_latitude: rect.min().y,
        min_longitude: rect.min().x,
        max_latitude: rect.max().y,
        max_longitude: rect.max().x,
    })
}

/// Centroid of every mappable fire, or `None` when no fire has a point.
#[must_use]
pub fn map_center(records: &[FireRecord]) -> Option<Coordinates> {
    let center = multi_point(records).centroid()?;
    Coordinates::new(center.y(), center.x())
}
