//! True lengths and areas of annotation geometry, plus the label formatting
//! used by the measurement elements.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Coordinate};

/// Mean earth radius used for spherical measurement, in meters.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Half the circumference of the web-mercator square, in meters.
const MERCATOR_HALF_SIZE: f64 = std::f64::consts::PI * 6_378_137.0;

/// How map coordinates relate to the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    /// Coordinates are already ground units; plain Euclidean measurement.
    Planar,
    /// Longitude/latitude in degrees.
    Geographic,
    /// Spherical web-mercator meters, the host map's default.
    #[default]
    WebMercator,
}

impl Projection {
    /// Longitude/latitude in degrees for a coordinate in this projection.
    fn to_lon_lat(self, c: Coordinate) -> Coordinate {
        match self {
            Projection::Planar | Projection::Geographic => c,
            Projection::WebMercator => {
                let lon = c.x / MERCATOR_HALF_SIZE * 180.0;
                let lat = (2.0 * (c.y / 6_378_137.0).exp().atan() - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                Coordinate::new(lon, lat)
            }
        }
    }

    /// Length of a polyline in meters (or planar units).
    pub fn length(self, path: &[Coordinate]) -> f64 {
        match self {
            Projection::Planar => path.windows(2).map(|w| geometry::distance(w[0], w[1])).sum(),
            _ => path
                .windows(2)
                .map(|w| haversine(self.to_lon_lat(w[0]), self.to_lon_lat(w[1])))
                .sum(),
        }
    }

    /// Unsigned area enclosed by a ring in square meters (or planar units).
    pub fn area(self, ring: &[Coordinate]) -> f64 {
        if ring.len() < 3 {
            return 0.0;
        }

        match self {
            Projection::Planar => shoelace(ring).abs(),
            _ => {
                let lon_lat: Vec<_> = ring.iter().map(|c| self.to_lon_lat(*c)).collect();
                spherical_ring_area(&lon_lat).abs()
            }
        }
    }
}

fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x - a.x).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

fn shoelace(ring: &[Coordinate]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

fn spherical_ring_area(ring: &[Coordinate]) -> f64 {
    let n = ring.len();
    let total: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            (b.x - a.x).to_radians() * (2.0 + a.y.to_radians().sin() + b.y.to_radians().sin())
        })
        .sum();
    total * EARTH_RADIUS * EARTH_RADIUS / 2.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Lengths above 100 are shown in kilometers, otherwise meters.
pub fn format_length(length: f64) -> String {
    if length > 100.0 {
        format!("{} km", round2(length / 1000.0))
    } else {
        format!("{} m", round2(length))
    }
}

/// Areas above 10 000 are shown in square kilometers, otherwise square meters.
pub fn format_area(area: f64) -> String {
    if area > 10_000.0 {
        format!("{} km²", round2(area / 1_000_000.0))
    } else {
        format!("{} m²", round2(area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_switches_unit_above_one_hundred() {
        assert_eq!(format_length(50.0), "50 m");
        assert_eq!(format_length(100.0), "100 m");
        assert_eq!(format_length(1500.0), "1.5 km");
        assert_eq!(format_length(12.346), "12.35 m");
    }

    #[test]
    fn area_switches_unit_above_ten_thousand() {
        assert_eq!(format_area(5000.0), "5000 m²");
        assert_eq!(format_area(20000.0), "0.02 km²");
    }

    #[test]
    fn planar_measurement() {
        let square = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
        ];
        assert_eq!(Projection::Planar.area(&square), 100.0);
        assert_eq!(Projection::Planar.length(&square), 30.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let path = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
        let length = Projection::Geographic.length(&path);
        assert!((length - 111_195.0).abs() < 10.0, "got {length}");
    }

    #[test]
    fn web_mercator_origin_maps_to_null_island() {
        let c = Projection::WebMercator.to_lon_lat(Coordinate::new(0.0, 0.0));
        assert!(c.x.abs() < 1e-12 && c.y.abs() < 1e-12);

        let east = Projection::WebMercator.to_lon_lat(Coordinate::new(MERCATOR_HALF_SIZE, 0.0));
        assert!((east.x - 180.0).abs() < 1e-9);
    }
}
