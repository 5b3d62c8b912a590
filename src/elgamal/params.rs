use num_bigint::BigUint;
use num_traits::Num;
use crate::crypto_error::CryptoError;

// ============================================================================
// Protection DoS parsing
//
// BigUint::from_str_radix est quadratique en la taille de l'entrée : on borne
// la longueur AVANT la conversion. Un module de 8192 bits fait 2467 chiffres
// décimaux ; 4096 laisse une marge confortable.
// ============================================================================
pub const MAX_DECIMAL_DIGITS: usize = 4_096;

/// Convertit un littéral décimal en BigUint. Seul point d'entrée des chaînes
/// numériques dans le moteur.
pub fn parse_parameter(field: &'static str, text: &str) -> Result<BigUint, CryptoError> {
    let digits = text.trim();
    let reject = |reason: String| Err(CryptoError::Parameter { field, reason });

    if digits.is_empty() {
        return reject("littéral vide".into());
    }
    if digits.len() > MAX_DECIMAL_DIGITS {
        return reject(format!(
            "{} chiffres (maximum autorisé : {})",
            digits.len(),
            MAX_DECIMAL_DIGITS
        ));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return reject(format!("`{digits}` n'est pas un entier décimal positif"));
    }

    BigUint::from_str_radix(digits, 10).or_else(|e| reject(e.to_string()))
}

/// Paramètre numérique fourni soit déjà converti, soit en décimal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    Value(BigUint),
    Decimal(String),
}

impl Param {
    pub fn resolve(self, field: &'static str) -> Result<BigUint, CryptoError> {
        match self {
            Param::Value(v)   => Ok(v),
            Param::Decimal(s) => parse_parameter(field, &s),
        }
    }
}

impl From<BigUint> for Param {
    fn from(v: BigUint) -> Self { Param::Value(v) }
}

impl From<&BigUint> for Param {
    fn from(v: &BigUint) -> Self { Param::Value(v.clone()) }
}

impl From<u64> for Param {
    fn from(v: u64) -> Self { Param::Value(BigUint::from(v)) }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self { Param::Decimal(s.to_string()) }
}

impl From<String> for Param {
    fn from(s: String) -> Self { Param::Decimal(s) }
}

/// Paramètres optionnels de construction : module, générateur, clé publique, clé privée.
#[derive(Clone, Debug, Default)]
pub struct EngineParams {
    pub p: Option<Param>,
    pub g: Option<Param>,
    pub y: Option<Param>,
    pub x: Option<Param>,
}

impl EngineParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modulus(mut self, p: impl Into<Param>) -> Self {
        self.p = Some(p.into());
        self
    }

    pub fn generator(mut self, g: impl Into<Param>) -> Self {
        self.g = Some(g.into());
        self
    }

    pub fn public_key(mut self, y: impl Into<Param>) -> Self {
        self.y = Some(y.into());
        self
    }

    pub fn private_key(mut self, x: impl Into<Param>) -> Self {
        self.x = Some(x.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_literals() {
        assert_eq!(parse_parameter("p", "23"), Ok(BigUint::from(23u32)));
        assert_eq!(parse_parameter("p", "  0042\n"), Ok(BigUint::from(42u32)));
        let big = "32317006071311007300714876688669951960444102669715484032130345427524655138867890893197201411522913463688717960921898019494119559150490921095088152386448283120630877367300996091750197750389652106796057638384067568276792218642619756161838094338476170470581645852036305042887575891541065808607552399123930385521914333389668342420684974786564569494856176035326322058077805659331026192708460314150258592864177116725943603718461857357598351152301645904403697613233287231227125684710820209725157101726931323469678542580656697935045997268352998638215525166389437335543602135433229604645318478604952148193555853611059596230656";
        assert!(parse_parameter("p", big).is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "   ", "-5", "+5", "1_000", "12a", "0x1F", "1.5"] {
            assert!(
                matches!(parse_parameter("g", bad), Err(CryptoError::Parameter { field: "g", .. })),
                "`{bad}` aurait dû être rejeté"
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized() {
        let huge = "9".repeat(MAX_DECIMAL_DIGITS + 1);
        assert!(matches!(parse_parameter("x", &huge), Err(CryptoError::Parameter { field: "x", .. })));
    }

    #[test]
    fn test_param_resolution() {
        assert_eq!(Param::from(7u64).resolve("y"), Ok(BigUint::from(7u32)));
        assert_eq!(Param::from("7").resolve("y"), Ok(BigUint::from(7u32)));
        assert!(Param::from("sept").resolve("y").is_err());
    }
}
