use geo_types::LineString;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Coimbatore city centre, where the preview map opens before a route is drawn.
pub const DEFAULT_MAP_CENTER: Coordinates = Coordinates::new(11.0168, 76.9558);
pub const DEFAULT_MAP_ZOOM: u8 = 12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Provider formatted, e.g. "12.3 km".
    pub text: String,
    pub meters: u64,
}

impl Distance {
    pub fn km(&self) -> f64 {
        self.meters as f64 / 1000.0
    }
}

/// An origin/destination pair as typed or picked by the customer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: String,
    pub weight: u8,
    pub opacity: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#FDB813".into(),
            weight: 6,
            opacity: 0.95,
        }
    }
}

/// A driving route ready to be drawn on the preview map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePreview {
    pub route: RouteRequest,
    pub path: LineString<f64>,
    pub center: Coordinates,
    pub zoom: u8,
    pub stroke: StrokeStyle,
}

impl RoutePreview {
    pub fn new(route: RouteRequest, path: LineString<f64>) -> Self {
        Self {
            route,
            path,
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
            stroke: StrokeStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_converts_meters_to_km() {
        let distance = Distance {
            text: "6.2 km".into(),
            meters: 6200,
        };
        assert!((distance.km() - 6.2).abs() < f64::EPSILON);
    }
}
