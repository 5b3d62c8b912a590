pub mod randomness;
pub mod prime_producer;

// Réexportations pratiques
pub use randomness::{secure_random_bytes, uniform_in_range};
pub use prime_producer::{probable_prime_candidate, PrimeSearch, MIN_PRIME_BITS};
