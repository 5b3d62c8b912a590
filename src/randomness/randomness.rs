use num_bigint::BigUint;
use num_traits::One;
use rand_core::{OsRng, RngCore};
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Octets aléatoires cryptographiquement sûrs
//
// OsRng est la seule source d'aléa de la crate. Une défaillance de la source
// système remonte en Err(Entropy) au lieu du panic de fill_bytes().
// ---------------------------------------------------------------------------
pub fn secure_random_bytes(length: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buffer = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(buffer)
}

/// Entier aléatoire uniforme de `bits` bits au plus (bits de poids fort masqués).
pub(crate) fn random_bits(bits: u64) -> Result<BigUint, CryptoError> {
    let mut bytes = secure_random_bytes(bits.div_ceil(8) as usize)?;
    let raw = BigUint::from_bytes_be(&bytes);
    bytes.zeroize();
    let mask = (BigUint::one() << bits) - BigUint::one();
    Ok(raw & mask)
}

// ---------------------------------------------------------------------------
// Entier uniforme dans [min, max)  (max exclu)
//
// Échantillonnage par rejet : on tire bitlength(max - min - 1) bits, on ajoute
// min, et on recommence si le résultat atteint max. Le masque des bits en
// trop garantit une probabilité d'acceptation > 1/2 à chaque tirage.
// Jamais de réduction modulo : elle biaiserait la distribution.
// ---------------------------------------------------------------------------
pub fn uniform_in_range(min: &BigUint, max: &BigUint) -> Result<BigUint, CryptoError> {
    if max <= min {
        return Err(CryptoError::Parameter {
            field: "max",
            reason: format!("intervalle vide [{min}, {max})"),
        });
    }

    let range = max - min - BigUint::one();
    let bits = range.bits();

    loop {
        let candidate = random_bits(bits)? + min;
        if &candidate < max {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_random_bytes_length() {
        assert_eq!(secure_random_bytes(0).unwrap().len(), 0);
        assert_eq!(secure_random_bytes(48).unwrap().len(), 48);
        // 32 octets nuls consécutifs : probabilité 2^-256
        assert!(secure_random_bytes(32).unwrap().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_bits_bounded() {
        for bits in [1u64, 7, 8, 9, 63, 130] {
            let value = random_bits(bits).unwrap();
            assert!(value.bits() <= bits);
        }
    }

    #[test]
    fn test_uniform_in_range_bounds() {
        let min = BigUint::from(3u32);
        let max = BigUint::from(23u32);
        for _ in 0..500 {
            let v = uniform_in_range(&min, &max).unwrap();
            assert!(v >= min && v < max);
        }
    }

    #[test]
    fn test_uniform_in_range_singleton() {
        let min = BigUint::from(41u32);
        let max = BigUint::from(42u32);
        assert_eq!(uniform_in_range(&min, &max).unwrap(), min);
    }

    #[test]
    fn test_uniform_in_range_empty_is_error() {
        let a = BigUint::from(10u32);
        assert!(matches!(
            uniform_in_range(&a, &a),
            Err(CryptoError::Parameter { field: "max", .. })
        ));
        assert!(uniform_in_range(&a, &BigUint::from(2u32)).is_err());
    }

    #[test]
    fn test_uniform_in_range_covers_every_value() {
        // Plage de 300 valeurs : traverse une frontière d'octet (9 bits)
        let min = BigUint::from(1000u32);
        let max = BigUint::from(1300u32);
        let mut seen = vec![false; 300];
        for _ in 0..30_000 {
            let v = uniform_in_range(&min, &max).unwrap() - &min;
            let idx = v.to_u32_digits().first().copied().unwrap_or(0) as usize;
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
