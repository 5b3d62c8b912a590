// Réexporte les primitives de théorie des nombres

mod math;

pub use math::{is_probable_prime, mod_inverse, MILLER_RABIN_ROUNDS};
