//! Label visibility rules for the map, modelled on map-SDK style arrays.

use serde::{Deserialize, Serialize};

/// Kind of map feature a rule or a place belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    All,
    Country,
    Province,
    Locality,
    Road,
}

impl FeatureType {
    fn matches(self, feature: FeatureType) -> bool {
        self == FeatureType::All || self == feature
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    All,
    Geometry,
    Labels,
}

impl ElementType {
    fn matches(self, element: ElementType) -> bool {
        self == ElementType::All || self == element
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRule {
    pub feature: FeatureType,
    pub element: ElementType,
    pub visible: bool,
}

const fn rule(feature: FeatureType, element: ElementType, visible: bool) -> StyleRule {
    StyleRule {
        feature,
        element,
        visible,
    }
}

/// Everything on, for the street-level hold at the origin.
const INITIAL: &[StyleRule] = &[
    rule(FeatureType::All, ElementType::Labels, true),
    rule(FeatureType::Road, ElementType::All, true),
];

/// Only town, state and country names, for the zoomed-out part of a flight.
const MINIMAL: &[StyleRule] = &[
    rule(FeatureType::All, ElementType::Labels, false),
    rule(FeatureType::Locality, ElementType::Labels, true),
    rule(FeatureType::Province, ElementType::Labels, true),
    rule(FeatureType::Country, ElementType::Labels, true),
];

/// Minimal plus road names, once the camera is over the destination.
const ROAD_VISIBLE: &[StyleRule] = &[
    rule(FeatureType::All, ElementType::Labels, false),
    rule(FeatureType::Locality, ElementType::Labels, true),
    rule(FeatureType::Province, ElementType::Labels, true),
    rule(FeatureType::Country, ElementType::Labels, true),
    rule(FeatureType::Road, ElementType::Labels, true),
];

/// The three style arrays a flight switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleSet {
    #[default]
    Initial,
    Minimal,
    RoadVisible,
}

impl StyleSet {
    pub fn rules(self) -> &'static [StyleRule] {
        match self {
            StyleSet::Initial => INITIAL,
            StyleSet::Minimal => MINIMAL,
            StyleSet::RoadVisible => ROAD_VISIBLE,
        }
    }

    /// Later rules win; anything no rule mentions stays visible.
    pub fn is_visible(self, feature: FeatureType, element: ElementType) -> bool {
        self.rules()
            .iter()
            .rev()
            .find(|rule| rule.feature.matches(feature) && rule.element.matches(element))
            .is_none_or(|rule| rule.visible)
    }
}
