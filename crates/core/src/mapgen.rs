//! Half-map generation and the rule checks that gate it.

mod generator;
mod validator;

pub use generator::HalfMapGenerator;
pub use validator::validate_half_map;

use crate::state::HalfMap;
use crate::types::MapGenError;

pub fn generate_half_map(seed: u64) -> Result<HalfMap, MapGenError> {
    HalfMapGenerator::new(seed).generate()
}
