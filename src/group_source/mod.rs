pub mod group_json;
pub mod remote_source;
pub mod offline_store;

use crate::crypto_error::CryptoError;
use crate::group::SafePrimePair;

/// Collaborateur fournissant des couples (p, q) de safe prime pré-calculés,
/// en alternative à la génération locale. L'implémentation valide le couple
/// avant de le rendre.
pub trait GroupSource {
    fn fetch_pair(&self, order_bits: u64) -> Result<SafePrimePair, CryptoError>;
}

pub use group_json::{decode_group_pair, pair_to_json, Base10Json, GroupPairJson};
pub use remote_source::{validate_remote_response, RemoteGroupSource, DEFAULT_REMOTE_ENDPOINT};
pub use offline_store::OfflineGroupStore;
