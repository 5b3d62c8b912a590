use std::fmt;
use num_bigint::BigUint;
use crate::elgamal::security_level::SecurityLevel;

/// État exporté du moteur, réimportable via `ElGamalEngine::import()`.
///
/// `x` n'est présent que si le moteur était au niveau LOW ; `r` seulement si
/// l'export demandait la révélation de la dernière clé éphémère.
/// L'état de validation n'est jamais exporté : un moteur importé doit être
/// revalidé par `check_security()`.
#[derive(Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub p: BigUint,
    pub g: BigUint,
    pub y: BigUint,
    pub security_level: SecurityLevel,
    pub x: Option<BigUint>,
    pub r: Option<BigUint>,
}

// Debug manuel : les secrets n'apparaissent jamais dans les logs
impl fmt::Debug for EngineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSnapshot")
            .field("p", &self.p)
            .field("g", &self.g)
            .field("y", &self.y)
            .field("security_level", &self.security_level)
            .field("x", &self.x.as_ref().map(|_| "<secret>"))
            .field("r", &self.r.as_ref().map(|_| "<secret>"))
            .finish()
    }
}
