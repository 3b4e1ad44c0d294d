//! Configuration options for mesh analysis.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshLensError, Result};

/// How face planarity deviation is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlanarityMetric {
    /// Absolute perpendicular distance from the best-fit plane.
    Distance,
    /// Perpendicular distance divided by the face's characteristic size.
    Relative,
    /// Elevation angle in degrees of each vertex above the plane, seen from the centroid.
    #[default]
    Angle,
}

/// Threshold above which a face is reported as non-planar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarityThreshold {
    /// Deviation metric.
    pub metric: PlanarityMetric,
    /// Maximum allowed deviation, in the metric's unit.
    pub value: f32,
}

impl Default for PlanarityThreshold {
    fn default() -> Self {
        Self {
            metric: PlanarityMetric::Angle,
            value: 5.0,
        }
    }
}

impl PlanarityThreshold {
    /// Absolute distance threshold.
    pub fn distance(value: f32) -> Self {
        Self {
            metric: PlanarityMetric::Distance,
            value,
        }
    }

    /// Distance threshold relative to face size.
    pub fn relative(value: f32) -> Self {
        Self {
            metric: PlanarityMetric::Relative,
            value,
        }
    }

    /// Angular threshold in degrees.
    pub fn angle(degrees: f32) -> Self {
        Self {
            metric: PlanarityMetric::Angle,
            value: degrees,
        }
    }
}

/// Thresholds read by the classifiers at refresh time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Non-planar face threshold.
    pub planarity: PlanarityThreshold,

    /// Faces with area below this are degenerate.
    pub degenerate_area_epsilon: f32,

    /// Consecutive face corners closer than this coincide.
    pub coincident_epsilon: f32,

    /// Above this many vertices + edges + faces, the fan-connectivity and
    /// planarity passes are replaced by cheaper approximations.
    pub large_mesh_element_limit: Option<usize>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            planarity: PlanarityThreshold::default(),
            degenerate_area_epsilon: 1e-8,
            coincident_epsilon: 1e-6,
            large_mesh_element_limit: None,
        }
    }
}

impl AnalysisOptions {
    /// Returns a copy with a different planarity threshold.
    #[must_use]
    pub fn with_planarity(mut self, planarity: PlanarityThreshold) -> Self {
        self.planarity = planarity;
        self
    }

    /// Returns a copy with an element-count ceiling for large meshes.
    #[must_use]
    pub fn with_element_limit(mut self, limit: usize) -> Self {
        self.large_mesh_element_limit = Some(limit);
        self
    }

    /// Checks every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_threshold("planarity.value", self.planarity.value)?;
        check_threshold("degenerate_area_epsilon", self.degenerate_area_epsilon)?;
        check_threshold("coincident_epsilon", self.coincident_epsilon)?;
        Ok(())
    }

    /// Parses and validates options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads and validates options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn check_threshold(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MeshLensError::InvalidConfiguration(format!(
            "{name} must be a finite, non-negative number (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = AnalysisOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.planarity.metric, PlanarityMetric::Angle);
        assert!(options.large_mesh_element_limit.is_none());
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let options = AnalysisOptions::default().with_planarity(PlanarityThreshold::distance(-1.0));
        assert!(matches!(
            options.validate(),
            Err(MeshLensError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let options = AnalysisOptions {
            coincident_epsilon: f32::NAN,
            ..AnalysisOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_is_valid() {
        let options = AnalysisOptions::default().with_planarity(PlanarityThreshold::distance(0.0));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_with_partial_input() {
        let options =
            AnalysisOptions::from_json(r#"{ "large_mesh_element_limit": 5000 }"#).unwrap();
        assert_eq!(options.large_mesh_element_limit, Some(5000));
        assert_eq!(options.planarity, PlanarityThreshold::default());

        let json = options.to_json().unwrap();
        assert_eq!(AnalysisOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let json = r#"{ "planarity": { "metric": "Distance", "value": -0.5 } }"#;
        assert!(matches!(
            AnalysisOptions::from_json(json),
            Err(MeshLensError::InvalidConfiguration(_))
        ));
    }
}
