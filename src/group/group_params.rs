use std::fmt;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use crate::math::{is_probable_prime, mod_inverse};

// ============================================================================
// Couple (p, q) de safe prime : forme commune à la génération locale, à la
// source distante et au magasin hors-ligne
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafePrimePair {
    pub p: BigUint,
    pub q: BigUint,
}

/// Raison du rejet d'un couple (p, q) reçu d'un collaborateur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairDefect {
    NotSafeForm,
    CompositeModulus,
    CompositeOrder,
    UnexpectedSize { expected: u64, actual: u64 },
}

impl fmt::Display for PairDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairDefect::NotSafeForm      => write!(f, "p != 2q + 1"),
            PairDefect::CompositeModulus => write!(f, "p n'est pas premier"),
            PairDefect::CompositeOrder   => write!(f, "q n'est pas premier"),
            PairDefect::UnexpectedSize { expected, actual } => {
                write!(f, "p fait {actual} bits au lieu des {expected} demandés")
            }
        }
    }
}

impl SafePrimePair {
    pub fn new(p: BigUint, q: BigUint) -> Self {
        SafePrimePair { p, q }
    }

    /// Vérifie p = 2q + 1 puis la primalité de p et de q.
    pub fn check(&self, rounds: u32) -> Result<(), PairDefect> {
        if (&self.q << 1u32) + BigUint::one() != self.p {
            return Err(PairDefect::NotSafeForm);
        }
        if !is_probable_prime(&self.p, rounds) {
            return Err(PairDefect::CompositeModulus);
        }
        if !is_probable_prime(&self.q, rounds) {
            return Err(PairDefect::CompositeOrder);
        }
        Ok(())
    }

    /// Vérifie que p a exactement la taille demandée à la source.
    pub fn check_size(&self, order_bits: u64) -> Result<(), PairDefect> {
        let actual = self.p.bits();
        if actual != order_bits {
            return Err(PairDefect::UnexpectedSize { expected: order_bits, actual });
        }
        Ok(())
    }

    /// Clé de déduplication : concaténation décimale p‖q.
    pub fn dedup_key(&self) -> String {
        format!("{}{}", self.p, self.q)
    }
}

// ============================================================================
// Paramètres de groupe validés, immuables
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl GroupParameters {
    /// Construit les paramètres seulement si (p, q) est un safe prime et g un
    /// générateur valide du sous-groupe d'ordre q.
    pub fn new(pair: SafePrimePair, g: BigUint, rounds: u32) -> Option<Self> {
        pair.check(rounds).ok()?;
        if !is_valid_generator(&g, &pair.p, &pair.q) {
            return None;
        }
        Some(GroupParameters { p: pair.p, q: pair.q, g })
    }

    pub fn p(&self) -> &BigUint { &self.p }
    pub fn q(&self) -> &BigUint { &self.q }
    pub fn g(&self) -> &BigUint { &self.g }

    pub fn into_parts(self) -> (BigUint, BigUint, BigUint) {
        (self.p, self.q, self.g)
    }
}

// ---------------------------------------------------------------------------
// Conditions d'acceptation d'un générateur :
//   g^q mod p = 1, g^2 mod p != 1, (p-1) mod g != 0, (p-1) mod g^-1 != 0
// ---------------------------------------------------------------------------
pub fn is_valid_generator(g: &BigUint, p: &BigUint, q: &BigUint) -> bool {
    let one = BigUint::one();
    if g <= &one || g >= p {
        return false;
    }
    if !g.modpow(q, p).is_one() {
        return false;
    }
    if g.modpow(&BigUint::from(2u32), p).is_one() {
        return false;
    }

    let p_minus_1 = p - &one;
    if (&p_minus_1 % g).is_zero() {
        return false;
    }
    match mod_inverse(g, p) {
        Ok(inverse) if !inverse.is_zero() => !(&p_minus_1 % &inverse).is_zero(),
        _ => false,
    }
}
