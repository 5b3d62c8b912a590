use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::OsRng;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin par défaut
//
// Probabilité de faux positif <= 4^-rounds pour un composé quelconque.
// Surchargeable par moteur via EngineConfig::primality_rounds.
// ---------------------------------------------------------------------------
pub const MILLER_RABIN_ROUNDS: u32 = 40;

// ---------------------------------------------------------------------------
// Petits premiers pour la division d'essai préliminaire
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u32] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
    73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151,
    157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311, 313, 317,
    331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503,
    509, 521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701,
    709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911,
    919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

/// Reste de `n` modulo un petit premier, sans allouer de BigUint pour le diviseur.
fn small_remainder(n: &BigUint, divisor: u32) -> u32 {
    let digits = (n % divisor).to_u32_digits();
    digits.first().copied().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Test de primalité probabiliste (division d'essai + Miller-Rabin)
//
// Ne lève jamais d'erreur : un composé donne false, un premier donne true
// avec une probabilité d'erreur <= 4^-rounds.
// ---------------------------------------------------------------------------
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    for &sp in SMALL_PRIMES {
        if n == &BigUint::from(sp) {
            return true;
        }
        if small_remainder(n, sp) == 0 {
            return false;
        }
    }

    // Ici n est impair et > 997, donc n - 2 > 2 : la plage des témoins est non vide
    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let mut rng = OsRng;
    let upper = n - &two;

    'witness: for _ in 0..rounds.max(1) {
        let a = rng.gen_biguint_range(&two, &upper);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n (algorithme d'Euclide étendu).
// Retourne Err(CryptoError::NoModularInverse) si gcd(a, n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Result<BigUint, CryptoError> {
    if modulus.is_zero() {
        return Err(CryptoError::NoModularInverse);
    }

    let m = BigInt::from(modulus.clone());
    let (gcd, coefficient) = extended_euclid(BigInt::from(a % modulus), m.clone());
    if !gcd.is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    coefficient
        .mod_floor(&m)
        .to_biguint()
        .ok_or(CryptoError::NoModularInverse)
}

/// Retourne (gcd(a, b), s) tel que a·s ≡ gcd (mod b).
fn extended_euclid(a: BigInt, b: BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r, old_s)
}
