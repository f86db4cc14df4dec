use std::collections::HashMap;

use crate::element::{AnchorPoint, Element, ElementBase};
use crate::feature::{Feature, Geometry};
use crate::geometry::Coordinate;

/// Maps icon names used by POINT features to image sources.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    icons: HashMap<String, String>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace entries. Existing names not in `icons` are kept.
    pub fn register<K, V>(&mut self, icons: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, source) in icons {
            self.icons.insert(name.into(), source.into());
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Marker at a single coordinate, drawn with a named icon.
#[derive(Debug, Clone)]
pub struct PointElement {
    base: ElementBase,
    icon_source: Option<String>,
}

impl PointElement {
    pub(crate) fn new(mut feature: Feature, icons: &IconRegistry) -> Self {
        let icon_source = feature
            .properties
            .icon
            .as_deref()
            .and_then(|name| icons.resolve(name))
            .map(str::to_owned);

        feature.geometry = Geometry::Point(single_coordinate(&feature.geometry));

        let mut point = Self {
            base: ElementBase::new(feature),
            icon_source,
        };
        point.init_control_points();
        point
    }

    pub fn icon(&self) -> Option<&str> {
        self.base.feature.properties.icon.as_deref()
    }

    /// Image source the icon name resolved to when the element was built.
    pub fn icon_source(&self) -> Option<&str> {
        self.icon_source.as_deref()
    }

    pub fn position(&self) -> Coordinate {
        single_coordinate(&self.base.feature.geometry)
    }
}

/// First coordinate of any geometry, origin when there is none.
pub(crate) fn single_coordinate(geometry: &Geometry) -> Coordinate {
    match geometry {
        Geometry::Point(c) => *c,
        other => other.coordinates().first().copied().unwrap_or_default(),
    }
}

impl Element for PointElement {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn init_control_points(&mut self) {
        self.base.anchor_points.clear();
        self.base.center_point = self.position();
    }

    fn set_anchor_points(&mut self, _points: Vec<AnchorPoint>, _update_ghost: bool) {}

    fn set_center_point(&mut self, center: Coordinate, _anchors: Option<Vec<AnchorPoint>>) {
        self.base.center_point = center;
        self.base.feature.geometry = Geometry::Point(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureProperties, PlotType};

    #[test]
    fn resolves_icon_from_registry() {
        let mut icons = IconRegistry::new();
        icons.register([("qidian", "images/start.png")]);

        let properties = FeatureProperties {
            icon: Some("qidian".into()),
            ..Default::default()
        };
        let feature = Feature::new(PlotType::Point, Geometry::Point(Coordinate::new(3.0, 4.0)), properties);
        let point = PointElement::new(feature, &icons);

        assert_eq!(point.icon_source(), Some("images/start.png"));
        assert_eq!(point.center_point(), Coordinate::new(3.0, 4.0));
        assert!(point.anchor_points().is_empty());
    }

    #[test]
    fn anchor_updates_are_ignored() {
        let mut point = PointElement::new(Feature::empty(PlotType::Point), &IconRegistry::new());
        point.set_anchor_points(vec![AnchorPoint::anchor(Coordinate::new(1.0, 1.0))], true);
        assert!(point.anchor_points().is_empty());
        assert_eq!(point.geometry(), &Geometry::Point(Coordinate::ZERO));
    }
}
