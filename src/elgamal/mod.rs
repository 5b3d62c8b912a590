pub mod ciphertext;
pub mod config;
pub mod engine;
pub mod params;
pub mod security_level;
pub mod snapshot;

// Réexportations pratiques pour l'utilisateur du module
pub use ciphertext::{CipherText, Plaintext};
pub use config::EngineConfig;
pub use engine::ElGamalEngine;
pub use params::{parse_parameter, EngineParams, Param, MAX_DECIMAL_DIGITS};
pub use security_level::SecurityLevel;
pub use snapshot::EngineSnapshot;
