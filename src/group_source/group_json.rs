use serde::{Deserialize, Serialize};
use crate::elgamal::params::parse_parameter;
use crate::group::SafePrimePair;

// ============================================================================
// Forme JSON d'un couple (p, q) :  {"p": {"base10": "..."}, "q": {"base10": "..."}}
//
// C'est la forme renvoyée par le service distant ; le magasin hors-ligne
// stocke la même. Les champs supplémentaires (base16...) sont ignorés.
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Base10Json {
    pub base10: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupPairJson {
    pub p: Base10Json,
    pub q: Base10Json,
}

pub fn pair_to_json(pair: &SafePrimePair) -> GroupPairJson {
    GroupPairJson {
        p: Base10Json { base10: pair.p.to_str_radix(10) },
        q: Base10Json { base10: pair.q.to_str_radix(10) },
    }
}

/// Décode un couple depuis un texte JSON. Le message d'erreur est remonté
/// tel quel ; chaque collaborateur l'enveloppe dans sa propre variante.
pub fn decode_group_pair(raw: &str) -> Result<SafePrimePair, String> {
    let json: GroupPairJson =
        serde_json::from_str(raw).map_err(|e| format!("JSON invalide : {e}"))?;
    let p = parse_parameter("p", &json.p.base10).map_err(|e| e.to_string())?;
    let q = parse_parameter("q", &json.q.base10).map_err(|e| e.to_string())?;
    Ok(SafePrimePair::new(p, q))
}
