// ===========================================================================
// Moteur ElGamal sur le sous-groupe d'ordre premier q d'un safe prime p
//
// Machine d'état de validation :
//   NON VALIDÉ --check_security()--> SÉCURISÉ | NON SÉCURISÉ
// Toute modification de p, q, g, y, x ou du niveau ramène à NON VALIDÉ.
//
// Une instance n'est pas faite pour des mutations concurrentes non
// coordonnées : encrypt() enregistre la clé éphémère, export() la purge.
// Voir SharedEngine pour un accès sérialisé entre threads.
// ===========================================================================

use std::fmt;
use log::{debug, warn};
use num_bigint::BigUint;
use num_traits::{CheckedSub, One, Zero};
use crate::crypto_error::CryptoError;
use crate::elgamal::ciphertext::{CipherText, Plaintext};
use crate::elgamal::config::EngineConfig;
use crate::elgamal::params::{EngineParams, Param};
use crate::elgamal::security_level::SecurityLevel;
use crate::elgamal::snapshot::EngineSnapshot;
use crate::group::{
    find_generator, generate_group, PairDefect, SafePrimePair, DEFAULT_ORDER_BITS, MIN_ORDER_BITS,
};
use crate::group_source::GroupSource;
use crate::math::{is_probable_prime, mod_inverse};
use crate::randomness::uniform_in_range;

#[derive(Default)]
pub struct ElGamalEngine {
    p: Option<BigUint>,
    // q explicite (génération, source externe, setter) ; sinon dérivé de p
    q: Option<BigUint>,
    g: Option<BigUint>,
    y: Option<BigUint>,
    x: Option<BigUint>,
    security_level: SecurityLevel,
    is_secure: bool,
    last_encryption_key: Option<BigUint>,
    config: EngineConfig,
}

/// q = (p - 1) / 2, absent si p = 0.
fn derive_order(p: &BigUint) -> Option<BigUint> {
    p.checked_sub(&BigUint::one()).map(|v| v >> 1u32)
}

fn resolve(param: Option<Param>, field: &'static str) -> Result<Option<BigUint>, CryptoError> {
    param.map(|p| p.resolve(field)).transpose()
}

impl ElGamalEngine {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Moteur vide, niveau HIGH, non validé.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        ElGamalEngine { config, ..Self::default() }
    }

    /// Construit le moteur à partir de p, g, y, x optionnels (décimal ou BigUint).
    /// Un littéral invalide donne Err(Parameter).
    pub fn from_params(params: EngineParams) -> Result<Self, CryptoError> {
        Self::from_params_with_config(params, EngineConfig::default())
    }

    pub fn from_params_with_config(
        params: EngineParams,
        config: EngineConfig,
    ) -> Result<Self, CryptoError> {
        Ok(ElGamalEngine {
            p: resolve(params.p, "p")?,
            g: resolve(params.g, "g")?,
            y: resolve(params.y, "y")?,
            x: resolve(params.x, "x")?,
            config,
            ..Self::default()
        })
    }

    // -----------------------------------------------------------------------
    // État
    // -----------------------------------------------------------------------

    pub fn security_level(&self) -> SecurityLevel { self.security_level }

    pub fn is_secure(&self) -> bool { self.is_secure }

    pub fn config(&self) -> EngineConfig { self.config }

    /// p, g, y et x sont tous présents. Ne dit rien de la sécurité.
    pub fn is_ready(&self) -> bool {
        self.p.is_some() && self.g.is_some() && self.y.is_some() && self.x.is_some()
    }

    /// Accepte "HIGH", "MEDIUM" ou "LOW" sans tenir compte de la casse.
    /// Changer de niveau invalide la validation précédente.
    pub fn set_security_level(&mut self, level: &str) -> Result<(), CryptoError> {
        self.security_level = level.parse()?;
        self.is_secure = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation selon le niveau de sécurité
    //
    // Un test raté donne Ok(false) ; seuls un module absent ou un couple
    // (p, q) incohérent donnent une erreur. is_secure n'est jamais laissé à
    // true sur un chemin d'échec.
    // -----------------------------------------------------------------------
    pub fn check_security(&mut self) -> Result<bool, CryptoError> {
        self.is_secure = false;
        let rounds = self.config.primality_rounds;

        match self.security_level {
            SecurityLevel::High => {
                let p = self.p.as_ref().ok_or(CryptoError::NotInitialized)?;
                let q = match &self.q {
                    Some(q) => {
                        if (q << 1u32) + BigUint::one() != *p {
                            return Err(CryptoError::Consistency);
                        }
                        q.clone()
                    }
                    None => match derive_order(p) {
                        Some(q) => q,
                        None => return Ok(false),
                    },
                };
                if !is_probable_prime(p, rounds) || !is_probable_prime(&q, rounds) {
                    return Ok(false);
                }
            }
            SecurityLevel::Medium => {
                let p = self.p.as_ref().ok_or(CryptoError::NotInitialized)?;
                if !is_probable_prime(p, rounds) {
                    return Ok(false);
                }
            }
            SecurityLevel::Low => {
                warn!("niveau de sécurité LOW : aucune garantie algébrique sur le groupe");
            }
        }

        self.is_secure = true;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Génération de clés
    // -----------------------------------------------------------------------

    /// Génère un nouveau groupe de `order_bits` bits (safe prime + générateur),
    /// tire x uniforme dans [2, p-2] et calcule y = g^x mod p.
    pub fn generate_keys(&mut self, order_bits: u64) -> Result<(), CryptoError> {
        let group = generate_group(order_bits, self.config.primality_rounds)?;
        let (p, q, g) = group.into_parts();
        self.install_group(p, q, g)
    }

    /// generate_keys() avec un module de 4096 bits.
    pub fn generate_default_keys(&mut self) -> Result<(), CryptoError> {
        self.generate_keys(DEFAULT_ORDER_BITS)
    }

    /// Initialise le moteur à partir d'un couple (p, q) déjà calculé
    /// (magasin hors-ligne, paramètres publiés...). Le couple est revérifié.
    pub fn initialize_with_pair(&mut self, pair: SafePrimePair) -> Result<(), CryptoError> {
        pair.check(self.config.primality_rounds).map_err(|defect| match defect {
            PairDefect::NotSafeForm => CryptoError::Consistency,
            other => CryptoError::Parameter { field: "p", reason: other.to_string() },
        })?;
        if pair.p.bits() < MIN_ORDER_BITS {
            return Err(CryptoError::KeySizeTooSmall {
                requested: pair.p.bits(),
                minimum: MIN_ORDER_BITS,
            });
        }
        let g = find_generator(&pair.p, &pair.q)?;
        self.install_group(pair.p, pair.q, g)
    }

    /// Initialise le moteur à partir d'un collaborateur (service distant,
    /// magasin hors-ligne). Aucun calcul de safe prime local.
    pub fn initialize_from_source(
        &mut self,
        source: &dyn GroupSource,
        order_bits: u64,
    ) -> Result<(), CryptoError> {
        let pair = source.fetch_pair(order_bits)?;
        self.initialize_with_pair(pair)
    }

    fn install_group(&mut self, p: BigUint, q: BigUint, g: BigUint) -> Result<(), CryptoError> {
        let upper = &p - BigUint::one();
        let x = uniform_in_range(&BigUint::from(2u32), &upper)?;
        let y = g.modpow(&x, &p);
        debug!("clés ElGamal générées sur un groupe de {} bits", p.bits());

        self.p = Some(p);
        self.q = Some(q);
        self.g = Some(g);
        self.y = Some(y);
        self.x = Some(x);
        self.last_encryption_key = None;
        self.is_secure = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Chiffrement / déchiffrement
    // -----------------------------------------------------------------------

    fn ready_parts(&self) -> Result<(&BigUint, &BigUint, &BigUint, &BigUint), CryptoError> {
        if !self.is_secure {
            return Err(CryptoError::InsecureEngine);
        }
        match (&self.p, &self.g, &self.y, &self.x) {
            (Some(p), Some(g), Some(y), Some(x)) => Ok((p, g, y, x)),
            _ => Err(CryptoError::NotReady),
        }
    }

    /// Chiffre un élément du groupe : c1 = g^r, c2 = y^r · m (mod p),
    /// r uniforme dans [1, p-2]. r est conservé comme dernière clé éphémère.
    pub fn encrypt(&mut self, message: impl Into<Plaintext>) -> Result<CipherText, CryptoError> {
        let (p, _, _, _) = self.ready_parts()?;
        let m = match message.into() {
            Plaintext::Integer(m) if &m >= p => return Err(CryptoError::MessageOutOfRange),
            Plaintext::Integer(m)            => m,
            Plaintext::Text(_)               => return Err(CryptoError::UnsupportedMessageType),
        };

        let r = uniform_in_range(&BigUint::one(), &(p - BigUint::one()))?;
        self.encrypt_with_ephemeral(&m, r)
    }

    pub(crate) fn encrypt_with_ephemeral(
        &mut self,
        message: &BigUint,
        r: BigUint,
    ) -> Result<CipherText, CryptoError> {
        let (p, g, y, _) = self.ready_parts()?;
        let c1 = g.modpow(&r, p);
        let c2 = (y.modpow(&r, p) * message) % p;
        self.last_encryption_key = Some(r);
        Ok(CipherText { c1, c2 })
    }

    /// m = c2 · (c1^x)^-1 mod p
    pub fn decrypt(&self, cipher: &CipherText) -> Result<BigUint, CryptoError> {
        let (p, _, _, x) = self.ready_parts()?;
        if cipher.c1.is_zero() || &cipher.c1 >= p || &cipher.c2 >= p {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        let shared_secret = cipher.c1.modpow(x, p);
        let inverse = mod_inverse(&shared_secret, p)?;
        Ok((&cipher.c2 * inverse) % p)
    }

    // -----------------------------------------------------------------------
    // Arithmétique de groupe, indépendante des clés et de is_secure
    // -----------------------------------------------------------------------

    fn require_modulus(&self) -> Result<&BigUint, CryptoError> {
        match &self.p {
            None => Err(CryptoError::NotInitialized),
            Some(p) if p.is_zero() => Err(CryptoError::Parameter {
                field: "p",
                reason: "module nul".into(),
            }),
            Some(p) => Ok(p),
        }
    }

    fn require_generator(&self) -> Result<(&BigUint, &BigUint), CryptoError> {
        let p = self.require_modulus()?;
        let g = self.g.as_ref().ok_or(CryptoError::NotReady)?;
        Ok((p, g))
    }

    /// g^e mod p avec e uniforme dans [3, p).
    pub fn random_group_element(&self) -> Result<BigUint, CryptoError> {
        let (p, g) = self.require_generator()?;
        let exponent = uniform_in_range(&BigUint::from(3u32), p)?;
        Ok(g.modpow(&exponent, p))
    }

    /// g^exponent mod p
    pub fn power(&self, exponent: &BigUint) -> Result<BigUint, CryptoError> {
        let (p, g) = self.require_generator()?;
        Ok(g.modpow(exponent, p))
    }

    /// (a + b) mod p
    pub fn add(&self, a: &BigUint, b: &BigUint) -> Result<BigUint, CryptoError> {
        let p = self.require_modulus()?;
        Ok((a + b) % p)
    }

    /// (a · b) mod p
    pub fn multiply(&self, a: &BigUint, b: &BigUint) -> Result<BigUint, CryptoError> {
        let p = self.require_modulus()?;
        Ok((a * b) % p)
    }

    // -----------------------------------------------------------------------
    // Export / import
    // -----------------------------------------------------------------------

    /// Exporte p, g, y = g^x mod p (recalculé) et le niveau. x n'est inclus
    /// qu'au niveau LOW. Un module nul donne Err(Parameter). Si `reveal_ephemeral`, la dernière clé éphémère est
    /// révélée puis retirée du moteur.
    pub fn export(&mut self, reveal_ephemeral: bool) -> Result<EngineSnapshot, CryptoError> {
        let (p, g) = self.require_generator()?;
        let x = self.x.as_ref().ok_or(CryptoError::NotReady)?;

        let snapshot = EngineSnapshot {
            p: p.clone(),
            g: g.clone(),
            y: g.modpow(x, p),
            security_level: self.security_level,
            x: (self.security_level == SecurityLevel::Low).then(|| x.clone()),
            r: None,
        };

        let r = if reveal_ephemeral { self.last_encryption_key.take() } else { None };
        Ok(EngineSnapshot { r, ..snapshot })
    }

    /// Restaure p, g, y, x et le niveau. Le moteur repasse toujours en
    /// NON VALIDÉ : la validation ne traverse pas la sérialisation.
    pub fn import(&mut self, snapshot: &EngineSnapshot) {
        self.p = Some(snapshot.p.clone());
        self.q = None;
        self.g = Some(snapshot.g.clone());
        self.y = Some(snapshot.y.clone());
        self.x = snapshot.x.clone();
        self.security_level = snapshot.security_level;
        self.last_encryption_key = None;
        self.is_secure = false;
    }

    // -----------------------------------------------------------------------
    // Accesseurs : copies, jamais de référence mutable vers les clés
    // -----------------------------------------------------------------------

    pub fn modulus(&self) -> Option<BigUint> { self.p.clone() }

    pub fn generator(&self) -> Option<BigUint> { self.g.clone() }

    pub fn public_key(&self) -> Option<BigUint> { self.y.clone() }

    pub fn group_order(&self) -> Option<BigUint> {
        self.q.clone().or_else(|| self.p.as_ref().and_then(derive_order))
    }

    /// Clé privée, seulement au niveau LOW.
    pub fn private_key(&self) -> Result<BigUint, CryptoError> {
        if self.security_level != SecurityLevel::Low {
            return Err(CryptoError::PrivateKeyWithheld);
        }
        self.x.clone().ok_or(CryptoError::NotReady)
    }

    pub fn set_modulus(&mut self, p: impl Into<Param>) -> Result<(), CryptoError> {
        self.p = Some(p.into().resolve("p")?);
        self.q = None;
        self.is_secure = false;
        Ok(())
    }

    pub fn set_group_order(&mut self, q: impl Into<Param>) -> Result<(), CryptoError> {
        self.q = Some(q.into().resolve("q")?);
        self.is_secure = false;
        Ok(())
    }

    pub fn set_generator(&mut self, g: impl Into<Param>) -> Result<(), CryptoError> {
        self.g = Some(g.into().resolve("g")?);
        self.is_secure = false;
        Ok(())
    }

    pub fn set_public_key(&mut self, y: impl Into<Param>) -> Result<(), CryptoError> {
        self.y = Some(y.into().resolve("y")?);
        self.is_secure = false;
        Ok(())
    }

    pub fn set_private_key(&mut self, x: impl Into<Param>) -> Result<(), CryptoError> {
        self.x = Some(x.into().resolve("x")?);
        self.is_secure = false;
        Ok(())
    }
}

// Debug manuel : x et la clé éphémère ne sont jamais affichés
impl fmt::Debug for ElGamalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElGamalEngine")
            .field("p", &self.p)
            .field("g", &self.g)
            .field("y", &self.y)
            .field("x", &self.x.as_ref().map(|_| "<secret>"))
            .field("security_level", &self.security_level)
            .field("is_secure", &self.is_secure)
            .finish()
    }
}
