// ===========================================================================
// Recherche de nombre premier probable en arrière-plan
//
// Chaque requête lance son propre thread, attend l'unique résultat, puis le
// thread se termine. Pas de pool : la seule donnée partagée est le couple
// (bit_length, rounds) en entrée et le premier trouvé en sortie.
// ===========================================================================

use std::thread::{self, JoinHandle};
use log::debug;
use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::math::is_probable_prime;
use crate::randomness::randomness::random_bits;

/// Un premier a au moins 2 bits (2 ou 3).
pub const MIN_PRIME_BITS: u64 = 2;

/// Recherche en cours dans un thread dédié. `wait()` consomme la tâche.
pub struct PrimeSearch {
    bit_length: u64,
    handle: JoinHandle<Result<BigUint, CryptoError>>,
}

impl PrimeSearch {
    /// Lance la recherche d'un premier probable d'exactement `bit_length` bits.
    pub fn spawn(bit_length: u64, rounds: u32) -> Result<Self, CryptoError> {
        if bit_length < MIN_PRIME_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: bit_length,
                minimum: MIN_PRIME_BITS,
            });
        }

        let handle = thread::Builder::new()
            .name(format!("prime-search-{bit_length}"))
            .spawn(move || search_prime(bit_length, rounds))
            .map_err(|_| CryptoError::PrimeSearchAborted)?;

        Ok(PrimeSearch { bit_length, handle })
    }

    /// Bloque jusqu'au résultat ; le thread est libéré au retour.
    pub fn wait(self) -> Result<BigUint, CryptoError> {
        let prime = self
            .handle
            .join()
            .map_err(|_| CryptoError::PrimeSearchAborted)??;
        debug!("premier probable de {} bits trouvé", self.bit_length);
        Ok(prime)
    }
}

/// Tire un candidat aléatoire (bit de poids fort et bit de poids faible forcés)
/// puis avance de 2 en 2 jusqu'à ce que Miller-Rabin l'accepte.
pub fn probable_prime_candidate(bit_length: u64, rounds: u32) -> Result<BigUint, CryptoError> {
    PrimeSearch::spawn(bit_length, rounds)?.wait()
}

fn search_prime(bit_length: u64, rounds: u32) -> Result<BigUint, CryptoError> {
    loop {
        let mut candidate = random_bits(bit_length)?;
        candidate.set_bit(bit_length - 1, true);
        candidate.set_bit(0, true);

        // Si +2 déborde de la longueur demandée, on repart d'un nouveau tirage
        while candidate.bits() == bit_length {
            if is_probable_prime(&candidate, rounds) {
                return Ok(candidate);
            }
            candidate += 2u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::MILLER_RABIN_ROUNDS;

    #[test]
    fn test_exact_bit_length() {
        for bits in [2u64, 3, 8, 17, 64, 128] {
            let prime = probable_prime_candidate(bits, MILLER_RABIN_ROUNDS).unwrap();
            assert_eq!(prime.bits(), bits);
            assert!(is_probable_prime(&prime, MILLER_RABIN_ROUNDS));
        }
    }

    #[test]
    fn test_too_short_is_rejected() {
        assert!(matches!(
            probable_prime_candidate(1, MILLER_RABIN_ROUNDS),
            Err(CryptoError::KeySizeTooSmall { requested: 1, minimum: 2 })
        ));
    }

    #[test]
    fn test_concurrent_searches_are_independent() {
        let searches: Vec<_> = (0..4)
            .map(|_| PrimeSearch::spawn(96, MILLER_RABIN_ROUNDS).unwrap())
            .collect();
        for search in searches {
            let prime = search.wait().unwrap();
            assert_eq!(prime.bits(), 96);
        }
    }
}
