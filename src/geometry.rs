use serde::{Deserialize, Serialize};

/// Number of sides used when approximating an ellipse with a polygon ring.
pub const ELLIPSE_SIDES: usize = 100;

/// A map coordinate in the units of the host projection.
///
/// Serialized as a `[x, y]` array. Short or empty arrays read back as
/// zeros instead of failing, so a malformed feature degrades to `[0, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Coordinate) -> f64 {
        distance(self, other)
    }
}

impl From<Vec<f64>> for Coordinate {
    fn from(values: Vec<f64>) -> Self {
        Self {
            x: values.first().copied().unwrap_or_default(),
            y: values.get(1).copied().unwrap_or_default(),
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Bounding box of `coordinates`, or `None` when there are none.
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Option<Self> {
        let first = coordinates.first()?;
        let mut extent = Extent {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for c in &coordinates[1..] {
            extent.min_x = extent.min_x.min(c.x);
            extent.min_y = extent.min_y.min(c.y);
            extent.max_x = extent.max_x.max(c.x);
            extent.max_y = extent.max_y.max(c.y);
        }
        Some(extent)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Euclidean distance between two coordinates.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

pub fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Coordinate::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Center of the bounding box of `coordinates`; `[0, 0]` when empty.
pub fn extent_center(coordinates: &[Coordinate]) -> Coordinate {
    Extent::from_coordinates(coordinates)
        .map(|e| e.center())
        .unwrap_or_default()
}

/// The four corners of the axis-aligned rectangle spanned by two opposite
/// corners, ordered top-left, top-right, bottom-right, bottom-left.
pub fn rectangle_corners(a: Coordinate, b: Coordinate) -> [Coordinate; 4] {
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);

    [
        Coordinate::new(min_x, max_y),
        Coordinate::new(max_x, max_y),
        Coordinate::new(max_x, min_y),
        Coordinate::new(min_x, min_y),
    ]
}

/// Closed polygon ring approximating an axis-aligned ellipse.
///
/// The ring has `ELLIPSE_SIDES + 1` coordinates, the last repeating the first.
pub fn ellipse_ring(center: Coordinate, major_radius: f64, minor_radius: f64) -> Vec<Coordinate> {
    let mut ring = Vec::with_capacity(ELLIPSE_SIDES + 1);
    for i in 0..ELLIPSE_SIDES {
        let angle = i as f64 * 2.0 * std::f64::consts::PI / ELLIPSE_SIDES as f64;
        ring.push(Coordinate::new(
            center.x + major_radius * angle.cos(),
            center.y + minor_radius * angle.sin(),
        ));
    }
    ring.push(ring[0]);
    ring
}

pub fn translate_all(coordinates: &[Coordinate], dx: f64, dy: f64) -> Vec<Coordinate> {
    coordinates.iter().map(|c| c.offset(dx, dy)).collect()
}

/// Distance from `point` to the segment `start`..`end`.
pub fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let (vx, vy) = (end.x - start.x, end.y - start.y);
    let len_sq = vx * vx + vy * vy;
    if len_sq == 0.0 {
        return distance(point, start);
    }

    let t = (((point.x - start.x) * vx + (point.y - start.y) * vy) / len_sq).clamp(0.0, 1.0);
    distance(point, Coordinate::new(start.x + vx * t, start.y + vy * t))
}

/// Shortest distance from `point` to a polyline. Infinite when empty.
pub fn distance_to_path(point: Coordinate, path: &[Coordinate]) -> f64 {
    match path {
        [] => f64::INFINITY,
        [single] => distance(point, *single),
        _ => path
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Even-odd ray cast. The ring does not need to repeat its first coordinate.
pub fn ring_contains(ring: &[Coordinate], point: Coordinate) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// The ring closed back onto its first coordinate, for boundary tests.
pub(crate) fn closed(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut path = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            path.push(*first);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_corners_are_ordered_clockwise_from_top_left() {
        let corners = rectangle_corners(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 5.0));
        assert_eq!(
            corners,
            [
                Coordinate::new(0.0, 5.0),
                Coordinate::new(10.0, 5.0),
                Coordinate::new(10.0, 0.0),
                Coordinate::new(0.0, 0.0),
            ]
        );
        assert_eq!(extent_center(&corners), Coordinate::new(5.0, 2.5));
    }

    #[test]
    fn ellipse_ring_is_closed_and_touches_both_radii() {
        let ring = ellipse_ring(Coordinate::new(1.0, 1.0), 4.0, 2.0);
        assert_eq!(ring.len(), ELLIPSE_SIDES + 1);
        assert_eq!(ring.first(), ring.last());

        let extent = Extent::from_coordinates(&ring).unwrap();
        assert!((extent.max_x - 5.0).abs() < 1e-9);
        assert!((extent.min_x + 3.0).abs() < 1e-9);
        assert!((extent.max_y - 3.0).abs() < 1e-9);
        assert!((extent.min_y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn short_coordinate_arrays_default_to_zero() {
        let c: Coordinate = serde_json::from_str("[]").unwrap();
        assert_eq!(c, Coordinate::ZERO);
        let c: Coordinate = serde_json::from_str("[3.5]").unwrap();
        assert_eq!(c, Coordinate::new(3.5, 0.0));
        assert_eq!(serde_json::to_string(&Coordinate::new(1.0, 2.5)).unwrap(), "[1.0,2.5]");
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Coordinate::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Coordinate::new(13.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn ray_cast_handles_open_rings() {
        let square = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(4.0, 0.0),
            Coordinate::new(4.0, 4.0),
            Coordinate::new(0.0, 4.0),
        ];
        assert!(ring_contains(&square, Coordinate::new(2.0, 2.0)));
        assert!(!ring_contains(&square, Coordinate::new(5.0, 2.0)));
    }
}
