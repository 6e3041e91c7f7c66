//! Color-vision deficiency selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use visim_core::Error;

/// Which cone class is missing, if any.
///
/// Parsed from the lowercase names used in settings files and on the
/// command line:
///
/// ```rust
/// use visim_ops::DeficiencyType;
///
/// let t: DeficiencyType = "deuteranope".parse().unwrap();
/// assert_eq!(t, DeficiencyType::Deuteranope);
/// assert!("achromat".parse::<DeficiencyType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficiencyType {
    /// Trichromat; every transform is the identity.
    #[default]
    Normal,
    /// No L cones.
    Protanope,
    /// No M cones.
    Deuteranope,
    /// No S cones.
    Tritanope,
}

impl DeficiencyType {
    /// All selectors in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Normal,
        Self::Protanope,
        Self::Deuteranope,
        Self::Tritanope,
    ];

    /// Selector name as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Protanope => "protanope",
            Self::Deuteranope => "deuteranope",
            Self::Tritanope => "tritanope",
        }
    }
}

impl fmt::Display for DeficiencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeficiencyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == key)
            .ok_or_else(|| Error::UnknownDeficiencyType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for t in DeficiencyType::ALL {
            assert_eq!(t.to_string().parse::<DeficiencyType>().unwrap(), t);
        }
        assert_eq!(" Tritanope ".parse::<DeficiencyType>().unwrap(), DeficiencyType::Tritanope);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "protan".parse::<DeficiencyType>().unwrap_err();
        assert_eq!(err, Error::UnknownDeficiencyType("protan".into()));
    }

    #[test]
    fn test_serde_lowercase() {
        let t: DeficiencyType = serde_yaml::from_str("protanope").unwrap();
        assert_eq!(t, DeficiencyType::Protanope);
        assert_eq!(serde_yaml::to_string(&t).unwrap().trim(), "protanope");
    }
}
