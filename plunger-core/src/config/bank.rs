//! Bank configuration
//!
//! A bank is the set of solenoids driven by one controller. Interlocks are
//! configured by name and must resolve within the same bank.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ConfigError, SolenoidConfig, MAX_SOLENOIDS};

/// Complete bank configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BankConfig {
    /// Solenoid definitions (`[[solenoid]]` tables in TOML)
    #[cfg_attr(feature = "serde", serde(rename = "solenoid", default))]
    pub solenoids: Vec<SolenoidConfig, MAX_SOLENOIDS>,
}

impl BankConfig {
    /// Create an empty bank config
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a solenoid definition
    pub fn push(&mut self, solenoid: SolenoidConfig) -> Result<(), ConfigError> {
        self.solenoids
            .push(solenoid)
            .map_err(|_| ConfigError::TooManySolenoids)
    }

    /// Find a solenoid definition by name
    pub fn find(&self, name: &str) -> Option<&SolenoidConfig> {
        self.solenoids.iter().find(|s| s.name.as_str() == name)
    }

    /// Position of a named solenoid
    pub fn position(&self, name: &str) -> Option<usize> {
        self.solenoids.iter().position(|s| s.name.as_str() == name)
    }

    /// Validate every solenoid plus cross-references between them
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, solenoid) in self.solenoids.iter().enumerate() {
            if let Err(e) = solenoid.validate() {
                log_error!("Solenoid '{}' invalid: {:?}", solenoid.name.as_str(), e);
                return Err(e);
            }

            if self.solenoids[..i].iter().any(|s| s.name == solenoid.name) {
                log_error!("Solenoid '{}' defined twice", solenoid.name.as_str());
                return Err(ConfigError::DuplicateName);
            }

            for peer in solenoid.interlock.iter() {
                if self.find(peer.as_str()).is_none() {
                    log_error!(
                        "Solenoid '{}' interlocks unknown '{}'",
                        solenoid.name.as_str(),
                        peer.as_str()
                    );
                    return Err(ConfigError::UnknownInterlock);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolenoidKind;
    use heapless::String;

    fn label(s: &str) -> String<{ crate::config::MAX_LABEL_LEN }> {
        String::try_from(s).unwrap()
    }

    #[test]
    fn test_find_and_position() {
        let mut bank = BankConfig::new();
        bank.push(SolenoidConfig::new("front", SolenoidKind::Ac)).unwrap();
        bank.push(SolenoidConfig::new("back", SolenoidKind::Dc)).unwrap();

        assert_eq!(bank.find("back").unwrap().kind, SolenoidKind::Dc);
        assert_eq!(bank.position("front"), Some(0));
        assert!(bank.find("side").is_none());
    }

    #[test]
    fn test_too_many_solenoids() {
        let mut bank = BankConfig::new();
        for _ in 0..MAX_SOLENOIDS {
            bank.push(SolenoidConfig::new("z", SolenoidKind::Ac)).unwrap();
        }
        assert_eq!(
            bank.push(SolenoidConfig::new("z", SolenoidKind::Ac)),
            Err(ConfigError::TooManySolenoids)
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut bank = BankConfig::new();
        bank.push(SolenoidConfig::new("zone", SolenoidKind::Ac)).unwrap();
        bank.push(SolenoidConfig::new("zone", SolenoidKind::Dc)).unwrap();
        assert_eq!(bank.validate(), Err(ConfigError::DuplicateName));
    }

    #[test]
    fn test_interlock_must_resolve() {
        let mut a = SolenoidConfig::new("a", SolenoidKind::Ac);
        a.interlock.push(label("b")).unwrap();
        let mut bank = BankConfig::new();
        bank.push(a).unwrap();
        assert_eq!(bank.validate(), Err(ConfigError::UnknownInterlock));

        bank.push(SolenoidConfig::new("b", SolenoidKind::Ac)).unwrap();
        assert!(bank.validate().is_ok());
    }

    #[test]
    fn test_self_interlock_allowed() {
        let mut a = SolenoidConfig::new("a", SolenoidKind::Ac);
        a.interlock.push(label("a")).unwrap();
        let mut bank = BankConfig::new();
        bank.push(a).unwrap();
        assert!(bank.validate().is_ok());
    }
}
