//! Real Seoul locations for realistic test fixtures.
//!
//! Coordinates are station entrances, routable by the Kakao directions API.

use carpool_planner::traits::{Coordinate, Point};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    pub fn point(&self) -> Point {
        Point::new(self.name, self.coordinate())
    }
}

pub const SEOUL_STATION: Location = Location::new("seoul_station", 37.5547, 126.9707);

/// Stops clustered around Gangnam, far from the start: detours are cheap.
pub const GANGNAM_CLUSTER: &[Location] = &[
    Location::new("gangnam", 37.4979, 127.0276),
    Location::new("sinnonhyeon", 37.5045, 127.0250),
    Location::new("yeoksam", 37.5006, 127.0364),
    Location::new("seolleung", 37.5045, 127.0490),
];

/// Stops in opposite directions: sharing a ride makes no sense.
pub const SPREAD_OUT: &[Location] = &[
    Location::new("gangnam", 37.4979, 127.0276),
    Location::new("incheon", 37.4563, 126.7052),
    Location::new("uijeongbu", 37.7381, 127.0338),
];

pub fn points(locations: &[Location]) -> Vec<Point> {
    locations.iter().map(Location::point).collect()
}
