// ===========================================================================
// Source distante de groupes pré-calculés (HTTPS)
//
// GET {endpoint}/{bits} → {"p": {"base10": ...}, "q": {"base10": ...}}
// La réponse n'est jamais prise pour acquise : p = 2q + 1 et la primalité
// de p et q sont revérifiées localement. Tout échec → Err(RemoteSource).
// ===========================================================================

use std::io::Read;
use std::time::Duration;
use log::debug;
use crate::crypto_error::CryptoError;
use crate::group::SafePrimePair;
use crate::group_source::group_json::decode_group_pair;
use crate::group_source::GroupSource;
use crate::math::MILLER_RABIN_ROUNDS;

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://2ton.com.au/getprimes/random";

/// Taille maximale d'une réponse lue en mémoire (un couple 8192 bits fait ~5 Ko)
const MAX_RESPONSE_BYTES: u64 = 64 * 1024;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct RemoteGroupSource {
    endpoint: String,
    timeout: Duration,
    rounds: u32,
}

impl Default for RemoteGroupSource {
    fn default() -> Self {
        RemoteGroupSource::new(DEFAULT_REMOTE_ENDPOINT)
    }
}

impl RemoteGroupSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        RemoteGroupSource {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            rounds: MILLER_RABIN_ROUNDS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn url_for(&self, order_bits: u64) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), order_bits)
    }

    fn download(&self, url: &str) -> Result<String, CryptoError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .get(url)
            .call()
            .map_err(|e| CryptoError::RemoteSource(format!("requête échouée : {e}")))?;

        let mut body = String::new();
        response
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_string(&mut body)
            .map_err(|e| CryptoError::RemoteSource(format!("lecture de la réponse : {e}")))?;
        Ok(body)
    }
}

/// Décode et valide une réponse du service : forme, primalité, et taille de p
/// égale à `order_bits`.
pub fn validate_remote_response(
    body: &str,
    order_bits: u64,
    rounds: u32,
) -> Result<SafePrimePair, CryptoError> {
    let pair = decode_group_pair(body).map_err(CryptoError::RemoteSource)?;
    pair.check_size(order_bits)
        .and_then(|_| pair.check(rounds))
        .map_err(|defect| CryptoError::RemoteSource(format!("groupe rejeté : {defect}")))?;
    Ok(pair)
}

impl GroupSource for RemoteGroupSource {
    fn fetch_pair(&self, order_bits: u64) -> Result<SafePrimePair, CryptoError> {
        // Le transport doit être chiffré : pas de repli en clair
        if !self.endpoint.starts_with("https://") {
            return Err(CryptoError::RemoteSource(format!(
                "point d'accès non HTTPS refusé : {}",
                self.endpoint
            )));
        }

        let url = self.url_for(order_bits);
        let body = self.download(&url)?;
        let pair = validate_remote_response(&body, order_bits, self.rounds)?;
        debug!("groupe distant de {} bits reçu et validé", pair.p.bits());
        Ok(pair)
    }
}
