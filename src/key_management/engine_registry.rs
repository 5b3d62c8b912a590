// ============================================================================
// SharedEngine — accès sérialisé à un moteur partagé entre threads
//
// Un ElGamalEngine n'est pas prévu pour des mutations concurrentes :
// encrypt() écrit la clé éphémère, export() la purge, import() remplace
// tout. Quand plusieurs threads doivent servir le même utilisateur, on
// sérialise les appels derrière un Mutex (pas de RwLock : même encrypt()
// mute l'état).
//
// Aucune instance globale : chaque appelant construit son SharedEngine et le
// clone explicitement vers ses threads.
//
// Pattern "prêter sans cloner" : la closure reçoit &mut ElGamalEngine le
// temps de l'appel ; x ne sort jamais du verrou.
//   let c = shared.with_engine(|e| e.encrypt(m))??;
// ============================================================================

use std::sync::{Arc, Mutex, MutexGuard};
use crate::crypto_error::CryptoError;
use crate::elgamal::engine::ElGamalEngine;

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<ElGamalEngine>>,
}

impl SharedEngine {
    pub fn new(engine: ElGamalEngine) -> Self {
        SharedEngine { inner: Arc::new(Mutex::new(engine)) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ElGamalEngine>, CryptoError> {
        self.inner.lock().map_err(|_| CryptoError::LockPoisoned)
    }

    /// Exécute `f` avec un accès exclusif au moteur.
    pub fn with_engine<F, T>(&self, f: F) -> Result<T, CryptoError>
    where
        F: FnOnce(&mut ElGamalEngine) -> T,
    {
        let mut guard = self.lock()?;
        Ok(f(&mut *guard))
    }

    /// Remplace le moteur (rotation de clés). L'ancien est détruit.
    pub fn replace(&self, engine: ElGamalEngine) -> Result<(), CryptoError> {
        *self.lock()? = engine;
        Ok(())
    }

    pub fn is_secure(&self) -> bool {
        self.lock().map(|e| e.is_secure()).unwrap_or(false)
    }
}
