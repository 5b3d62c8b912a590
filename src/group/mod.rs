pub mod group_params;
pub mod group_gen;

pub use group_params::{is_valid_generator, GroupParameters, PairDefect, SafePrimePair};
pub use group_gen::{
    find_generator, generate_group, generate_safe_group, DEFAULT_ORDER_BITS, MIN_ORDER_BITS,
};
