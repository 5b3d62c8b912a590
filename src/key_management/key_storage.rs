use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;
use crate::elgamal::params::parse_parameter;
use crate::elgamal::security_level::SecurityLevel;
use crate::elgamal::snapshot::EngineSnapshot;

// ============================================================================
// Protection DoS parsing
//
// Un snapshot JSON contient au plus 5 entiers décimaux bornés par
// MAX_DECIMAL_DIGITS. La longueur du document est vérifiée AVANT toute
// désérialisation.
// ============================================================================
const MAX_SNAPSHOT_BYTES: usize = 32_768;

// ============================================================================
// Forme sérialisée d'un snapshot : entiers en décimal
//
// x et r sont des secrets : la chaîne est effacée à la destruction.
// Les Option sont toujours écrites (null en JSON) pour que bincode, qui n'est
// pas auto-descriptif, relise le même nombre de champs.
// ============================================================================
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineSnapshotJson {
    pub p: String,
    pub g: String,
    pub y: String,
    pub security: String,
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub r: Option<String>,
}

impl Zeroize for EngineSnapshotJson {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.r.zeroize();
    }
}

impl Drop for EngineSnapshotJson {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Conversion snapshot ↔ forme sérialisée
// ============================================================================

pub fn snapshot_to_json(snapshot: &EngineSnapshot) -> EngineSnapshotJson {
    EngineSnapshotJson {
        p:        snapshot.p.to_str_radix(10),
        g:        snapshot.g.to_str_radix(10),
        y:        snapshot.y.to_str_radix(10),
        security: snapshot.security_level.as_str().to_string(),
        x:        snapshot.x.as_ref().map(|x| x.to_str_radix(10)),
        r:        snapshot.r.as_ref().map(|r| r.to_str_radix(10)),
    }
}

pub fn json_to_snapshot(json: &EngineSnapshotJson) -> Result<EngineSnapshot, CryptoError> {
    let security_level: SecurityLevel = json.security.parse()?;
    let x = json.x.as_deref().map(|x| parse_parameter("x", x)).transpose()?;

    // Une clé privée exportée hors niveau LOW signale un snapshot forgé
    if x.is_some() && security_level != SecurityLevel::Low {
        return Err(CryptoError::Snapshot(format!(
            "clé privée présente au niveau {security_level}"
        )));
    }

    Ok(EngineSnapshot {
        p: parse_parameter("p", &json.p)?,
        g: parse_parameter("g", &json.g)?,
        y: parse_parameter("y", &json.y)?,
        security_level,
        x,
        r: json.r.as_deref().map(|r| parse_parameter("r", r)).transpose()?,
    })
}

// ============================================================================
// Encodages texte (JSON) et binaire (bincode)
// ============================================================================

pub fn snapshot_to_string(snapshot: &EngineSnapshot) -> Result<String, CryptoError> {
    serde_json::to_string_pretty(&snapshot_to_json(snapshot))
        .map_err(|e| CryptoError::Snapshot(e.to_string()))
}

pub fn snapshot_from_str(raw: &str) -> Result<EngineSnapshot, CryptoError> {
    if raw.len() > MAX_SNAPSHOT_BYTES {
        return Err(CryptoError::Snapshot(format!(
            "{} octets (maximum autorisé : {MAX_SNAPSHOT_BYTES})",
            raw.len()
        )));
    }
    let json: EngineSnapshotJson =
        serde_json::from_str(raw).map_err(|e| CryptoError::Snapshot(e.to_string()))?;
    json_to_snapshot(&json)
}

pub fn snapshot_to_bytes(snapshot: &EngineSnapshot) -> Result<Vec<u8>, CryptoError> {
    bincode::serialize(&snapshot_to_json(snapshot))
        .map_err(|e| CryptoError::Snapshot(e.to_string()))
}

pub fn snapshot_from_bytes(raw: &[u8]) -> Result<EngineSnapshot, CryptoError> {
    if raw.len() > MAX_SNAPSHOT_BYTES {
        return Err(CryptoError::Snapshot(format!(
            "{} octets (maximum autorisé : {MAX_SNAPSHOT_BYTES})",
            raw.len()
        )));
    }
    let json: EngineSnapshotJson =
        bincode::deserialize(raw).map_err(|e| CryptoError::Snapshot(e.to_string()))?;
    json_to_snapshot(&json)
}
