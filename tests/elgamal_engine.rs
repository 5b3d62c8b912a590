//! Scénarios de bout en bout sur l'API publique du moteur ElGamal :
//! génération locale, collaborateurs (magasin hors-ligne, source en mémoire),
//! snapshots et qualité du tirage uniforme.

use std::cell::Cell;
use std::fs;

use elgamal_crypto::key_management::{snapshot_from_str, snapshot_to_string};
use elgamal_crypto::{
    generate_safe_group, uniform_in_range, CipherText, CryptoError, ElGamalEngine, EngineParams,
    GroupSource, OfflineGroupStore, SafePrimePair, SecurityLevel, MILLER_RABIN_ROUNDS,
};
use num_bigint::BigUint;
use num_traits::One;
use tempfile::TempDir;

/// Source de test : sert toujours le même couple et compte les appels.
struct FixedSource {
    pair: SafePrimePair,
    calls: Cell<u32>,
}

impl GroupSource for FixedSource {
    fn fetch_pair(&self, _order_bits: u64) -> Result<SafePrimePair, CryptoError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.pair.clone())
    }
}

fn toy_engine() -> ElGamalEngine {
    ElGamalEngine::from_params(
        EngineParams::new().modulus("23").generator("4").public_key("2").private_key("6"),
    )
    .unwrap()
}

#[test]
fn test_generated_keys_round_trip() {
    let mut engine = ElGamalEngine::new();
    engine.generate_keys(64).unwrap();
    assert!(!engine.is_secure());
    assert!(engine.check_security().unwrap());

    for _ in 0..10 {
        let m = engine.random_group_element().unwrap();
        let cipher = engine.encrypt(m.clone()).unwrap();
        assert_eq!(engine.decrypt(&cipher).unwrap(), m);
    }
}

#[test]
fn test_high_level_subgroup_membership() {
    let mut engine = ElGamalEngine::new();
    engine.generate_keys(48).unwrap();
    assert!(engine.check_security().unwrap());
    assert_eq!(engine.security_level(), SecurityLevel::High);

    let p = engine.modulus().unwrap();
    let q = engine.group_order().unwrap();
    assert_eq!(&q * 2u32 + 1u32, p);

    // g, y et c1 appartiennent au sous-groupe d'ordre q
    let g = engine.generator().unwrap();
    let y = engine.public_key().unwrap();
    assert!(g.modpow(&q, &p).is_one());
    assert!(y.modpow(&q, &p).is_one());

    let cipher = engine.encrypt(5u32).unwrap();
    assert!(cipher.c1.modpow(&q, &p).is_one());

    // power(1) = g
    assert_eq!(engine.power(&BigUint::one()).unwrap(), g);
}

#[test]
fn test_toy_group_scenario() {
    let mut engine = toy_engine();
    assert_eq!(engine.encrypt(9u32), Err(CryptoError::InsecureEngine));
    assert!(engine.check_security().unwrap());

    let cipher = engine.encrypt(9u32).unwrap();
    assert_eq!(engine.decrypt(&cipher).unwrap(), BigUint::from(9u32));

    // Chiffré calculé à la main avec r = 3 : (4^3, 2^3 · 9) mod 23
    let fixed = CipherText { c1: BigUint::from(18u32), c2: BigUint::from(3u32) };
    assert_eq!(engine.decrypt(&fixed).unwrap(), BigUint::from(9u32));

    assert_eq!(engine.encrypt(23u32), Err(CryptoError::MessageOutOfRange));
    assert_eq!(engine.encrypt("bonjour"), Err(CryptoError::UnsupportedMessageType));
}

#[test]
fn test_snapshot_json_through_engine() {
    let mut engine = toy_engine();
    engine.set_security_level("low").unwrap();
    assert!(engine.check_security().unwrap());
    let cipher = engine.encrypt(7u32).unwrap();

    let snapshot = engine.export(true).unwrap();
    assert_eq!(snapshot.x, Some(BigUint::from(6u32)));
    assert!(snapshot.r.is_some());
    // r révélé une seule fois
    assert_eq!(engine.export(true).unwrap().r, None);

    let json = snapshot_to_string(&snapshot).unwrap();
    let mut restored = ElGamalEngine::new();
    restored.import(&snapshot_from_str(&json).unwrap());

    assert!(!restored.is_secure());
    assert_eq!(restored.decrypt(&cipher), Err(CryptoError::InsecureEngine));
    assert!(restored.check_security().unwrap());
    assert_eq!(restored.decrypt(&cipher).unwrap(), BigUint::from(7u32));
    assert_eq!(restored.private_key().unwrap(), BigUint::from(6u32));
}

#[test]
fn test_high_export_withholds_private_key() {
    let mut engine = toy_engine();
    assert!(engine.check_security().unwrap());
    let snapshot = engine.export(false).unwrap();
    assert_eq!(snapshot.x, None);
    assert_eq!(snapshot.r, None);
    assert_eq!(engine.private_key(), Err(CryptoError::PrivateKeyWithheld));

    let mut restored = ElGamalEngine::new();
    restored.import(&snapshot);
    assert!(restored.check_security().unwrap());
    // Sans x : encrypt/decrypt indisponibles
    assert_eq!(restored.encrypt(3u32), Err(CryptoError::NotReady));
}

#[test]
fn test_initialize_from_custom_source() {
    let pair = generate_safe_group(32, MILLER_RABIN_ROUNDS).unwrap();
    let source = FixedSource { pair: pair.clone(), calls: Cell::new(0) };

    let mut engine = ElGamalEngine::new();
    engine.initialize_from_source(&source, 32).unwrap();
    assert_eq!(source.calls.get(), 1);
    assert_eq!(engine.modulus(), Some(pair.p.clone()));
    assert_eq!(engine.group_order(), Some(pair.q.clone()));
    assert!(engine.check_security().unwrap());

    let cipher = engine.encrypt(1234u32).unwrap();
    assert_eq!(engine.decrypt(&cipher).unwrap(), BigUint::from(1234u32));
}

#[test]
fn test_initialize_rejects_unsafe_pair() {
    // 2·11 + 1 = 23 mais on annonce q = 13
    let source = FixedSource {
        pair: SafePrimePair::new(BigUint::from(23u32), BigUint::from(13u32)),
        calls: Cell::new(0),
    };
    let mut engine = ElGamalEngine::new();
    assert_eq!(engine.initialize_from_source(&source, 16), Err(CryptoError::Consistency));
    assert!(engine.modulus().is_none());
}

#[test]
fn test_offline_store_feeds_engine() {
    let dir = TempDir::new().unwrap();
    let store = OfflineGroupStore::new(dir.path());

    // Répertoire absent : erreur explicite, pas de panic
    assert!(matches!(store.fetch_pair(32), Err(CryptoError::GroupStore(_))));

    let pair = generate_safe_group(32, MILLER_RABIN_ROUNDS).unwrap();
    assert!(store.save_pair(32, &pair).unwrap());
    // Doublon ignoré
    assert!(!store.save_pair(32, &pair).unwrap());
    assert_eq!(store.load_pairs(32).unwrap().len(), 1);

    // Un fichier corrompu fait échouer le chargement entier
    let corrupt = store.bits_dir(32).join("zz.json");
    fs::write(&corrupt, "{\"p\":").unwrap();
    assert!(matches!(store.load_pairs(32), Err(CryptoError::GroupStore(_))));
    fs::remove_file(&corrupt).unwrap();
    assert_eq!(store.load_pairs(32).unwrap(), vec![pair.clone()]);

    let mut engine = ElGamalEngine::new();
    engine.initialize_from_source(&store, 32).unwrap();
    assert_eq!(engine.modulus(), Some(pair.p));
    assert!(engine.check_security().unwrap());
}

#[test]
fn test_uniform_in_range_chi_square() {
    // 10 classes, 20 000 tirages : χ² à 9 degrés de liberté.
    // Seuil 40 : largement au-delà du quantile 0.9999 (≈ 33.7).
    const BUCKETS: usize = 10;
    const DRAWS: usize = 20_000;

    let min = BigUint::from(500u32);
    let max = BigUint::from(510u32);
    let mut counts = [0usize; BUCKETS];
    for _ in 0..DRAWS {
        let v = uniform_in_range(&min, &max).unwrap() - &min;
        let idx = v.to_u32_digits().first().copied().unwrap_or(0) as usize;
        counts[idx] += 1;
    }

    let expected = (DRAWS / BUCKETS) as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum();
    assert!(chi2 < 40.0, "χ² = {chi2}, répartition : {counts:?}");
}
