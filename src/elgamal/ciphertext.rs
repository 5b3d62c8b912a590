use num_bigint::BigUint;

/// Chiffré ElGamal : c1 = g^r mod p, c2 = y^r · m mod p.
/// Appartient à l'appelant ; le moteur ne le conserve pas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherText {
    pub c1: BigUint,
    pub c2: BigUint,
}

/// Message présenté à encrypt(). Seuls les entiers éléments du groupe sont
/// chiffrables ; le texte est refusé (pas d'encodage de messages).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plaintext {
    Integer(BigUint),
    Text(String),
}

impl From<BigUint> for Plaintext {
    fn from(m: BigUint) -> Self { Plaintext::Integer(m) }
}

impl From<&BigUint> for Plaintext {
    fn from(m: &BigUint) -> Self { Plaintext::Integer(m.clone()) }
}

impl From<u64> for Plaintext {
    fn from(m: u64) -> Self { Plaintext::Integer(BigUint::from(m)) }
}

impl From<u32> for Plaintext {
    fn from(m: u32) -> Self { Plaintext::Integer(BigUint::from(m)) }
}

impl From<&str> for Plaintext {
    fn from(m: &str) -> Self { Plaintext::Text(m.to_string()) }
}

impl From<String> for Plaintext {
    fn from(m: String) -> Self { Plaintext::Text(m) }
}
