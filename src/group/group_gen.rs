use log::debug;
use num_bigint::BigUint;
use num_traits::One;
use crate::crypto_error::CryptoError;
use crate::group::group_params::{is_valid_generator, GroupParameters, SafePrimePair};
use crate::math::is_probable_prime;
use crate::randomness::{probable_prime_candidate, uniform_in_range};

// Taille minimale du module accepté par le générateur.
// En dessous, le sous-groupe d'ordre q peut ne contenir aucun générateur
// satisfaisant les conditions de divisibilité (ex. p = 7).
pub const MIN_ORDER_BITS: u64 = 16;

// Taille par défaut du module pour generate_keys()
pub const DEFAULT_ORDER_BITS: u64 = 4096;

// ---------------------------------------------------------------------------
// Génération d'un safe prime p = 2q + 1 de `order_bits` bits
//
// q est produit par un thread de recherche dédié (order_bits - 1 bits) ;
// on recommence tant que 2q + 1 n'est pas premier. Nombre moyen d'essais
// proportionnel à ln(2^order_bits) par densité des premiers.
// ---------------------------------------------------------------------------
pub fn generate_safe_group(order_bits: u64, rounds: u32) -> Result<SafePrimePair, CryptoError> {
    if order_bits < MIN_ORDER_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: order_bits,
            minimum: MIN_ORDER_BITS,
        });
    }

    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let q = probable_prime_candidate(order_bits - 1, rounds)?;
        let p = (&q << 1u32) + BigUint::one();

        if is_probable_prime(&p, rounds) {
            debug!("safe prime de {} bits accepté après {} essai(s)", p.bits(), attempts);
            return Ok(SafePrimePair { p, q });
        }
    }
}

// ---------------------------------------------------------------------------
// Recherche d'un générateur du sous-groupe d'ordre q
//
// g = 2^e mod p avec e uniforme dans [3, p) : base fixe, exposant aléatoire.
// Chaque rejet retire un nouvel exposant.
//
// Sous MIN_ORDER_BITS la boucle peut ne jamais terminer (p = 5, p = 7 n'ont
// aucun élément valide) : ces modules sont refusés avant la recherche.
// ---------------------------------------------------------------------------
pub fn find_generator(p: &BigUint, q: &BigUint) -> Result<BigUint, CryptoError> {
    if p.bits() < MIN_ORDER_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: p.bits(),
            minimum: MIN_ORDER_BITS,
        });
    }

    let three = BigUint::from(3u32);

    let base = BigUint::from(2u32);
    loop {
        let exponent = uniform_in_range(&three, p)?;
        let g = base.modpow(&exponent, p);
        if is_valid_generator(&g, p, q) {
            return Ok(g);
        }
    }
}

/// Safe prime + générateur : paramètres complets d'un nouveau groupe.
pub fn generate_group(order_bits: u64, rounds: u32) -> Result<GroupParameters, CryptoError> {
    let pair = generate_safe_group(order_bits, rounds)?;
    let g = find_generator(&pair.p, &pair.q)?;
    GroupParameters::new(pair, g, rounds).ok_or(CryptoError::Consistency)
}
