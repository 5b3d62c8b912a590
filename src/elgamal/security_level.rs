use std::fmt;
use std::str::FromStr;
use crate::crypto_error::CryptoError;

/// Niveau de sécurité du moteur. Détermine ce que `check_security()` vérifie :
///   - HIGH   : p safe prime (p et q = (p-1)/2 premiers)
///   - MEDIUM : p premier
///   - LOW    : aucune vérification, aucune garantie algébrique
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    #[default]
    High,
    Medium,
    Low,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityLevel::High   => "HIGH",
            SecurityLevel::Medium => "MEDIUM",
            SecurityLevel::Low    => "LOW",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Canonicalisation insensible à la casse : "medium", "Medium", "MEDIUM" → Medium
impl FromStr for SecurityLevel {
    type Err = CryptoError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.trim().to_ascii_uppercase().as_str() {
            "HIGH"   => Ok(SecurityLevel::High),
            "MEDIUM" => Ok(SecurityLevel::Medium),
            "LOW"    => Ok(SecurityLevel::Low),
            _        => Err(CryptoError::InvalidLevel(level.to_string())),
        }
    }
}
