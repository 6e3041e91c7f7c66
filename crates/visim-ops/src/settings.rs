//! YAML settings.
//!
//! Every field has a default, so an empty document is valid:
//!
//! ```yaml
//! deficiency: deuteranope
//! daltonize:
//!   lm_stretch: 0.5
//!   lum_scale: 0.75
//!   s_scale: 0.25
//! tuning:
//!   gain: 1.35
//! age: week8
//! geometry:
//!   display_width_cm: 50
//!   view_dist_cm: 60
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AgePreset, DaltonizeParams, DaltonizeTuning, Daltonizer, DeficiencyType, InfantVision,
    OpsResult, ViewingGeometry,
};

/// Parameters for all three transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deficiency for simulation and the corrected preview.
    pub deficiency: DeficiencyType,
    /// Daltonize strengths.
    pub daltonize: DaltonizeParams,
    /// Daltonize constants.
    pub tuning: DaltonizeTuning,
    /// Infant-vision age.
    pub age: AgePreset,
    /// Infant-vision viewing geometry.
    pub geometry: ViewingGeometry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deficiency: DeficiencyType::Deuteranope,
            daltonize: DaltonizeParams::default(),
            tuning: DaltonizeTuning::default(),
            age: AgePreset::Week8,
            geometry: ViewingGeometry::default(),
        }
    }
}

impl Settings {
    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a YAML error for malformed input or unknown selector names.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// I/O or YAML errors.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading settings");
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serializes to YAML.
    ///
    /// # Errors
    ///
    /// Only if serialization itself fails.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks strengths, tuning and geometry.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for the first bad value.
    pub fn validate(&self) -> OpsResult<()> {
        self.daltonize.validate()?;
        self.tuning.validate()?;
        self.geometry.validate()?;
        Ok(())
    }

    /// Daltonize corrector configured from these settings.
    pub fn daltonizer(&self) -> Daltonizer {
        Daltonizer::new(self.daltonize).with_tuning(self.tuning)
    }

    /// Infant-vision simulator configured from these settings.
    pub fn infant_vision(&self) -> InfantVision {
        InfantVision::new(self.age, self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document() {
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml_str("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_document() {
        let s = Settings::from_yaml_str(
            "deficiency: tritanope\nage: week24\ndaltonize:\n  lum_scale: 1.0\ngeometry:\n  view_dist_cm: 30\n",
        )
        .unwrap();
        assert_eq!(s.deficiency, DeficiencyType::Tritanope);
        assert_eq!(s.age, AgePreset::Week24);
        assert_eq!(s.daltonize.lum_scale, 1.0);
        assert_eq!(s.daltonize.s_scale, 0.5);
        assert_eq!(s.geometry.view_dist_cm, 30.0);
        assert_eq!(s.geometry.display_width_cm, 50.0);
        assert_eq!(s.tuning, DaltonizeTuning::default());
    }

    #[test]
    fn test_unknown_selector() {
        assert!(Settings::from_yaml_str("deficiency: achromat").is_err());
        assert!(Settings::from_yaml_str("age: week3").is_err());
    }

    #[test]
    fn test_yaml_roundtrip_and_file() {
        let mut s = Settings::default();
        s.tuning.max_projection = 2.0;
        s.age = AgePreset::Adult;
        let yaml = s.to_yaml_string().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let loaded = Settings::from_file(file.path()).unwrap();
        assert_eq!(loaded, s);
        assert_eq!(loaded.daltonizer().tuning().max_projection, 2.0);
        assert_eq!(loaded.infant_vision().age(), AgePreset::Adult);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, crate::OpsError::Io(_)));
    }

    #[test]
    fn test_validate() {
        let mut s = Settings::default();
        assert!(s.validate().is_ok());
        s.geometry.view_dist_cm = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        let s = Settings::from_yaml_str("tuning:\n  max_projection: .nan\n").unwrap();
        let err = s.validate().unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(visim_core::Error::InvalidParameter(m)) if m.contains("max_projection")
        ));

        let s = Settings::from_yaml_str("tuning:\n  std_floor: 0\n").unwrap();
        assert!(s.validate().is_err());
    }
}
