//! GeoJSON import and export of the annotation set.
//!
//! Each feature carries its plot type in `properties.type`. Circles and
//! ellipses travel as their center point plus radii, and rectangles as an
//! empty polygon plus the two corner coordinates.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::element::factory::{self, FactoryOptions};
use crate::element::{Element, PlotElement};
use crate::error::PlotResult;
use crate::feature::{FeatureProperties, Geometry, PlotType};
use crate::geometry::Coordinate;

fn feature_collection_kind() -> String {
    "FeatureCollection".to_owned()
}

fn feature_kind() -> String {
    "Feature".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_kind")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<GeoJsonFeature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: feature_collection_kind(),
            features: Vec::new(),
        }
    }
}

impl FeatureCollection {
    pub fn from_json(json: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PlotResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<GeoJsonProperties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonProperties {
    /// Plot type tag such as `"POLYGON"`.
    #[serde(rename = "type", default)]
    pub plot_type: String,
    #[serde(flatten)]
    pub values: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        #[serde(default)]
        coordinates: Coordinate,
    },
    LineString {
        #[serde(default)]
        coordinates: Vec<Coordinate>,
    },
    Polygon {
        #[serde(default)]
        coordinates: Vec<Vec<Coordinate>>,
    },
    #[serde(other)]
    Unsupported,
}

impl GeoJsonGeometry {
    fn into_geometry(self) -> Option<Geometry> {
        match self {
            GeoJsonGeometry::Point { coordinates } => Some(Geometry::Point(coordinates)),
            GeoJsonGeometry::LineString { coordinates } => Some(Geometry::LineString(coordinates)),
            GeoJsonGeometry::Polygon { coordinates } => Some(Geometry::Polygon(coordinates)),
            GeoJsonGeometry::Unsupported => None,
        }
    }
}

fn plot_feature(geometry: GeoJsonGeometry, plot_type: PlotType, values: FeatureProperties) -> GeoJsonFeature {
    GeoJsonFeature {
        kind: feature_kind(),
        geometry: Some(geometry),
        properties: Some(GeoJsonProperties {
            plot_type: plot_type.as_str().to_owned(),
            values,
        }),
    }
}

/// Serialize one element, or `None` for a line-like element with no vertices.
fn to_feature(element: &PlotElement) -> Option<GeoJsonFeature> {
    let plot_type = element.plot_type();
    let properties = &element.feature().properties;
    let geometry = element.geometry();
    let point = || GeoJsonGeometry::Point {
        coordinates: element.center_point(),
    };

    let feature = match plot_type {
        PlotType::Point => plot_feature(
            point(),
            plot_type,
            FeatureProperties {
                icon: properties.icon.clone(),
                ..Default::default()
            },
        ),
        PlotType::Text => plot_feature(
            point(),
            plot_type,
            FeatureProperties {
                text: properties.text.clone(),
                ..Default::default()
            },
        ),
        PlotType::Line | PlotType::Arrow | PlotType::MeasureDistance => {
            let coordinates = geometry.coordinates();
            if coordinates.is_empty() {
                return None;
            }
            plot_feature(GeoJsonGeometry::LineString { coordinates }, plot_type, FeatureProperties::default())
        }
        PlotType::Polygon | PlotType::MeasureArea => {
            let rings = match geometry {
                Geometry::Polygon(rings) => rings.clone(),
                other => vec![other.coordinates()],
            };
            if plot_type == PlotType::MeasureArea && rings.iter().all(Vec::is_empty) {
                return None;
            }
            plot_feature(GeoJsonGeometry::Polygon { coordinates: rings }, plot_type, FeatureProperties::default())
        }
        PlotType::Circle => plot_feature(
            point(),
            plot_type,
            FeatureProperties {
                radius: properties.radius,
                ..Default::default()
            },
        ),
        PlotType::Ellipse => {
            let center = properties.center.unwrap_or_else(|| element.center_point());
            plot_feature(
                GeoJsonGeometry::Point { coordinates: center },
                plot_type,
                FeatureProperties {
                    center: Some(center),
                    major_radius: properties.major_radius,
                    minor_radius: properties.minor_radius,
                    ..Default::default()
                },
            )
        }
        PlotType::Rectangle => plot_feature(
            GeoJsonGeometry::Polygon { coordinates: Vec::new() },
            plot_type,
            FeatureProperties {
                coordinates: properties.coordinates.clone(),
                ..Default::default()
            },
        ),
    };

    Some(feature)
}

/// Serialize the elements in collection order.
pub fn to_collection(elements: &[PlotElement]) -> FeatureCollection {
    FeatureCollection {
        kind: feature_collection_kind(),
        features: elements.iter().filter_map(to_feature).collect(),
    }
}

/// Build elements from a collection. Features with an unknown type or an
/// unsupported geometry are skipped.
pub fn from_collection(collection: &FeatureCollection, options: &FactoryOptions<'_>) -> Vec<PlotElement> {
    let mut elements = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let Some(properties) = &feature.properties else {
            warn!("feature {index} has no properties, skipped");
            continue;
        };
        let geometry = match feature.geometry.clone().map(GeoJsonGeometry::into_geometry) {
            Some(Some(geometry)) => geometry,
            Some(None) => {
                warn!("feature {index} has an unsupported geometry, skipped");
                continue;
            }
            None => Geometry::Point(Coordinate::ZERO),
        };

        match factory::create_element(&properties.plot_type, geometry, properties.values.clone(), options) {
            Some(element) => elements.push(element),
            None => debug!("feature {index} has unknown type {:?}, skipped", properties.plot_type),
        }
    }

    elements
}
