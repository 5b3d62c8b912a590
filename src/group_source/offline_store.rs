// ===========================================================================
// Magasin hors-ligne de groupes pré-calculés
//
// Arborescence : <racine>/<bits>/<n>.json, un couple (p, q) par fichier, dans
// la même forme JSON que le service distant. Les doublons (clé p‖q) sont
// ignorés, et chaque couple est revérifié avant d'être servi.
// ===========================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use num_bigint::BigUint;
use crate::crypto_error::CryptoError;
use crate::group::SafePrimePair;
use crate::group_source::group_json::{decode_group_pair, pair_to_json};
use crate::group_source::GroupSource;
use crate::math::MILLER_RABIN_ROUNDS;
use crate::randomness::uniform_in_range;

/// Taille maximale d'un fichier de groupe (un couple 8192 bits fait ~5 Ko).
/// Vérifiée sur les métadonnées AVANT la lecture.
const MAX_GROUP_FILE_BYTES: u64 = 16 * 1024;

#[derive(Clone, Debug)]
pub struct OfflineGroupStore {
    root: PathBuf,
    rounds: u32,
}

fn store_error(path: &Path, reason: impl std::fmt::Display) -> CryptoError {
    CryptoError::GroupStore(format!("{} : {reason}", path.display()))
}

impl OfflineGroupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OfflineGroupStore { root: root.into(), rounds: MILLER_RABIN_ROUNDS }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn bits_dir(&self, order_bits: u64) -> PathBuf {
        self.root.join(order_bits.to_string())
    }

    /// Fichiers .json du répertoire, triés par nom.
    fn group_files(&self, order_bits: u64) -> Result<Vec<PathBuf>, CryptoError> {
        let dir = self.bits_dir(order_bits);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| store_error(&dir, e))? {
            let path = entry.map_err(|e| store_error(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_pair(&self, path: &Path, order_bits: u64) -> Result<SafePrimePair, CryptoError> {
        let meta = fs::metadata(path).map_err(|e| store_error(path, e))?;
        if meta.len() > MAX_GROUP_FILE_BYTES {
            return Err(store_error(
                path,
                format!("{} octets (maximum autorisé : {MAX_GROUP_FILE_BYTES})", meta.len()),
            ));
        }

        let raw = fs::read_to_string(path).map_err(|e| store_error(path, e))?;
        let pair = decode_group_pair(&raw).map_err(|e| store_error(path, e))?;
        pair.check_size(order_bits)
            .and_then(|_| pair.check(self.rounds))
            .map_err(|defect| store_error(path, format!("groupe rejeté : {defect}")))?;
        Ok(pair)
    }

    /// Tous les couples distincts stockés pour cette taille. Un fichier
    /// invalide, ou dont p n'a pas `order_bits` bits, fait échouer le
    /// chargement entier.
    pub fn load_pairs(&self, order_bits: u64) -> Result<Vec<SafePrimePair>, CryptoError> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for path in self.group_files(order_bits)? {
            let pair = self.read_pair(&path, order_bits)?;
            if seen.insert(pair.dedup_key()) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    /// Ajoute un couple validé. Retourne Ok(false) si un couple identique
    /// est déjà présent.
    pub fn save_pair(&self, order_bits: u64, pair: &SafePrimePair) -> Result<bool, CryptoError> {
        let dir = self.bits_dir(order_bits);
        pair.check_size(order_bits)
            .and_then(|_| pair.check(self.rounds))
            .map_err(|defect| store_error(&dir, format!("groupe rejeté : {defect}")))?;

        let existing = self.load_pairs(order_bits)?;
        if existing.iter().any(|known| known.dedup_key() == pair.dedup_key()) {
            return Ok(false);
        }

        fs::create_dir_all(&dir).map_err(|e| store_error(&dir, e))?;
        let index = self.group_files(order_bits)?.len();
        let path = dir.join(format!("{index}.json"));
        let json = serde_json::to_string_pretty(&pair_to_json(pair))
            .map_err(|e| store_error(&path, e))?;
        fs::write(&path, json).map_err(|e| store_error(&path, e))?;
        Ok(true)
    }
}

impl GroupSource for OfflineGroupStore {
    /// Couple choisi uniformément parmi ceux stockés pour `order_bits`.
    fn fetch_pair(&self, order_bits: u64) -> Result<SafePrimePair, CryptoError> {
        let mut pairs = self.load_pairs(order_bits)?;
        if pairs.is_empty() {
            return Err(CryptoError::GroupStore(format!(
                "aucun groupe de {order_bits} bits dans {}",
                self.root.display()
            )));
        }

        let index = uniform_in_range(&BigUint::from(0u32), &BigUint::from(pairs.len()))?;
        let index = index.to_u64_digits().first().copied().unwrap_or(0) as usize;
        Ok(pairs.swap_remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Safe primes de 16 bits (taille minimale d'un groupe)
    const SAFE_16: [(u32, u32); 3] = [(32843, 16421), (32987, 16493), (33107, 16553)];

    fn temp_store() -> (OfflineGroupStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (OfflineGroupStore::new(dir.path()), dir)
    }

    fn pair((p, q): (u32, u32)) -> SafePrimePair {
        SafePrimePair::new(BigUint::from(p), BigUint::from(q))
    }

    fn body((p, q): (u32, u32)) -> String {
        format!(r#"{{"p":{{"base10":"{p}"}},"q":{{"base10":"{q}"}}}}"#)
    }

    #[test]
    fn test_empty_store() {
        let (store, _dir) = temp_store();
        assert_eq!(store.load_pairs(2048), Ok(Vec::new()));
        assert!(matches!(store.fetch_pair(2048), Err(CryptoError::GroupStore(_))));
    }

    #[test]
    fn test_save_deduplicates() {
        let (store, _dir) = temp_store();
        assert_eq!(store.save_pair(16, &pair(SAFE_16[0])), Ok(true));
        assert_eq!(store.save_pair(16, &pair(SAFE_16[0])), Ok(false));
        assert_eq!(store.save_pair(16, &pair(SAFE_16[1])), Ok(true));
        assert_eq!(store.load_pairs(16).unwrap().len(), 2);
        assert!(store.bits_dir(16).join("1.json").is_file());
    }

    #[test]
    fn test_save_rejects_invalid_pair() {
        let (store, _dir) = temp_store();
        let not_safe = SafePrimePair::new(BigUint::from(32843u32), BigUint::from(16420u32));
        assert!(matches!(store.save_pair(16, &not_safe), Err(CryptoError::GroupStore(_))));
    }

    #[test]
    fn test_save_rejects_wrong_size() {
        let (store, _dir) = temp_store();
        assert!(matches!(store.save_pair(2048, &pair(SAFE_16[0])), Err(CryptoError::GroupStore(_))));
        assert!(!store.bits_dir(2048).exists());
    }

    #[test]
    fn test_duplicate_files_are_served_once() {
        let (store, _dir) = temp_store();
        let dir = store.bits_dir(16);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("0.json"), body(SAFE_16[2])).unwrap();
        fs::write(dir.join("1.json"), body(SAFE_16[2])).unwrap();
        fs::write(dir.join("notes.txt"), "ignoré").unwrap();

        assert_eq!(store.load_pairs(16).unwrap(), vec![pair(SAFE_16[2])]);
        assert_eq!(store.fetch_pair(16).unwrap(), pair(SAFE_16[2]));
    }

    #[test]
    fn test_fetch_picks_among_stored_pairs() {
        let (store, _dir) = temp_store();
        for p in SAFE_16 {
            store.save_pair(16, &pair(p)).unwrap();
        }
        for _ in 0..10 {
            let fetched = store.fetch_pair(16).unwrap();
            assert!(SAFE_16.iter().any(|&p| pair(p) == fetched));
        }
    }

    #[test]
    fn test_tampered_file_fails_loading() {
        let (store, _dir) = temp_store();
        let dir = store.bits_dir(16);
        fs::create_dir_all(&dir).unwrap();
        // q décalé d'une unité : p != 2q + 1
        fs::write(dir.join("0.json"), body((32843, 16422))).unwrap();
        assert!(matches!(store.load_pairs(16), Err(CryptoError::GroupStore(_))));
    }

    #[test]
    fn test_misfiled_small_pair_is_refused() {
        // (7, 3) est un couple sain, déposé dans le répertoire 16 bits
        let (store, _dir) = temp_store();
        let dir = store.bits_dir(16);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("0.json"), body((7, 3))).unwrap();
        assert!(matches!(store.fetch_pair(16), Err(CryptoError::GroupStore(_))));
    }

    #[test]
    fn test_oversized_file_is_refused() {
        let (store, _dir) = temp_store();
        let dir = store.bits_dir(16);
        fs::create_dir_all(&dir).unwrap();
        let padded = format!(
            r#"{{"p":{{"base10":"32843"}},"q":{{"base10":"16421"}},"pad":"{}"}}"#,
            "x".repeat(MAX_GROUP_FILE_BYTES as usize)
        );
        fs::write(dir.join("0.json"), padded).unwrap();
        assert!(matches!(store.load_pairs(16), Err(CryptoError::GroupStore(_))));
    }
}
