// Déclaration des modules
pub mod crypto_error;
pub mod math;
pub mod randomness;
pub mod group;
pub mod elgamal;
pub mod group_source;
pub mod key_management;

// Primitives de théorie des nombres et d'aléa
pub use crate::math::{is_probable_prime, mod_inverse, MILLER_RABIN_ROUNDS};
pub use crate::randomness::{probable_prime_candidate, secure_random_bytes, uniform_in_range, PrimeSearch};

// Génération de groupe
pub use crate::group::{
    find_generator, generate_group, generate_safe_group, GroupParameters, SafePrimePair,
    DEFAULT_ORDER_BITS, MIN_ORDER_BITS,
};

// Moteur ElGamal
pub use crate::elgamal::{
    CipherText, ElGamalEngine, EngineConfig, EngineParams, EngineSnapshot, Param, Plaintext,
    SecurityLevel,
};

// Collaborateurs : source distante et magasin hors-ligne
pub use crate::group_source::{GroupSource, OfflineGroupStore, RemoteGroupSource};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Accès sérialisé multi-thread, sans instance globale
pub use key_management::SharedEngine;
