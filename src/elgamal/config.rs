use crate::math::MILLER_RABIN_ROUNDS;

/// Réglages propres à une instance du moteur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rounds Miller-Rabin pour check_security() et la génération de groupe.
    /// Probabilité de faux positif <= 4^-primality_rounds.
    pub primality_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { primality_rounds: MILLER_RABIN_ROUNDS }
    }
}
