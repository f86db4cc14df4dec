use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{self, Coordinate, Extent};

/// The ten annotation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotType {
    Point,
    Line,
    Polygon,
    Circle,
    Ellipse,
    Rectangle,
    Text,
    Arrow,
    MeasureDistance,
    MeasureArea,
}

impl PlotType {
    pub const ALL: [PlotType; 10] = [
        PlotType::Point,
        PlotType::Line,
        PlotType::Polygon,
        PlotType::Circle,
        PlotType::Ellipse,
        PlotType::Rectangle,
        PlotType::Text,
        PlotType::Arrow,
        PlotType::MeasureDistance,
        PlotType::MeasureArea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlotType::Point => "POINT",
            PlotType::Line => "LINE",
            PlotType::Polygon => "POLYGON",
            PlotType::Circle => "CIRCLE",
            PlotType::Ellipse => "ELLIPSE",
            PlotType::Rectangle => "RECTANGLE",
            PlotType::Text => "TEXT",
            PlotType::Arrow => "ARROW",
            PlotType::MeasureDistance => "MEASURE_DISTANCE",
            PlotType::MeasureArea => "MEASURE_AREA",
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown plot type: {s}"))
    }
}

/// Stable identity of a feature, and of the element wrapping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(Uuid);

impl FeatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Backing geometry of a feature on the working layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    Polygon(Vec<Vec<Coordinate>>),
    Circle { center: Coordinate, radius: f64 },
}

impl Geometry {
    /// The empty geometry a freshly drawn element of `plot_type` starts from.
    pub fn for_type(plot_type: PlotType) -> Self {
        match plot_type {
            PlotType::Point | PlotType::Circle | PlotType::Ellipse | PlotType::Text => {
                Geometry::Point(Coordinate::ZERO)
            }
            PlotType::Line | PlotType::Arrow | PlotType::MeasureDistance => Geometry::LineString(Vec::new()),
            PlotType::Polygon | PlotType::Rectangle | PlotType::MeasureArea => Geometry::Polygon(Vec::new()),
        }
    }

    /// Every coordinate of the geometry, polygon rings concatenated.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        match self {
            Geometry::Point(c) => vec![*c],
            Geometry::LineString(path) => path.clone(),
            Geometry::Polygon(rings) => rings.concat(),
            Geometry::Circle { center, .. } => vec![*center],
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Circle { center, radius } => Some(Extent {
                min_x: center.x - radius,
                min_y: center.y - radius,
                max_x: center.x + radius,
                max_y: center.y + radius,
            }),
            _ => Extent::from_coordinates(&self.coordinates()),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Geometry::Point(c) => *c = c.offset(dx, dy),
            Geometry::LineString(path) => *path = geometry::translate_all(path, dx, dy),
            Geometry::Polygon(rings) => {
                for ring in rings.iter_mut() {
                    *ring = geometry::translate_all(ring, dx, dy);
                }
            }
            Geometry::Circle { center, .. } => *center = center.offset(dx, dy),
        }
    }

    /// Whether `coordinate` lies on the geometry, within `tolerance` map units.
    /// Closed shapes also count their interior.
    pub fn hit_test(&self, coordinate: Coordinate, tolerance: f64) -> bool {
        match self {
            Geometry::Point(c) => geometry::distance(*c, coordinate) <= tolerance,
            Geometry::LineString(path) => geometry::distance_to_path(coordinate, path) <= tolerance,
            Geometry::Polygon(rings) => match rings.first() {
                Some(ring) => {
                    geometry::ring_contains(ring, coordinate)
                        || geometry::distance_to_path(coordinate, &geometry::closed(ring)) <= tolerance
                }
                None => false,
            },
            Geometry::Circle { center, radius } => {
                geometry::distance(*center, coordinate) <= radius + tolerance
            }
        }
    }
}

/// Type-specific properties carried next to the geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Coordinate>>,
}

/// A geometry plus its properties: the handle an element keeps in sync with
/// its anchor points.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    plot_type: PlotType,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(plot_type: PlotType, geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            id: FeatureId::new(),
            plot_type,
            geometry,
            properties,
        }
    }

    /// A feature with the starting geometry for `plot_type` and no properties.
    pub fn empty(plot_type: PlotType) -> Self {
        Self::new(plot_type, Geometry::for_type(plot_type), FeatureProperties::default())
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }
}
