//! Randomized half-map construction with a validate-and-retry loop.

use std::collections::BTreeMap;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

use super::validator::validate_half_map;
use crate::state::{Field, HalfMap};
use crate::types::{CastleState, Coord, MapGenError, Terrain};

pub(crate) const MOUNTAIN_FIELDS: usize = 5;
pub(crate) const WATER_FIELDS: usize = 8;

/// Safety margin against a pathological rng stream, not a game rule; real
/// layouts validate within a handful of attempts.
const MAX_GENERATION_ATTEMPTS: u32 = 10_000;

pub struct HalfMapGenerator {
    rng: ChaCha8Rng,
}

impl HalfMapGenerator {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Builds candidate layouts until one satisfies every map rule.
    pub fn generate(&mut self) -> Result<HalfMap, MapGenError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let candidate = self.lay_out_half_map();
            if validate_half_map(&candidate) {
                return Ok(candidate);
            }
        }
        Err(MapGenError::AttemptBudgetExhausted { attempts: MAX_GENERATION_ATTEMPTS })
    }

    /// One unvalidated layout: a grass base, then mountains, water, and the
    /// castle placed by reject-and-retry random picks. Coordinates are
    /// assigned column-major (x outer, y inner), which fixes the cell order
    /// for a given rng stream.
    fn lay_out_half_map(&mut self) -> HalfMap {
        let mut fields = vec![Field::grass(); HalfMap::FIELD_COUNT];
        self.raise_mountains(&mut fields);
        self.sink_water(&mut fields);
        self.place_castle(&mut fields);

        let mut keyed = BTreeMap::new();
        let mut index = 0;
        for x in 0..HalfMap::WIDTH {
            for y in 0..HalfMap::HEIGHT {
                keyed.insert(Coord::new(x, y), fields[index]);
                index += 1;
            }
        }
        HalfMap::from_fields(keyed).expect("column-major fill covers exactly the half-map grid")
    }

    fn raise_mountains(&mut self, fields: &mut [Field]) {
        let mut placed = 0;
        while placed < MOUNTAIN_FIELDS {
            let pick = self.random_index(fields.len());
            if fields[pick].terrain == Terrain::Grass {
                fields[pick].terrain = Terrain::Mountain;
                placed += 1;
            }
        }
    }

    fn sink_water(&mut self, fields: &mut [Field]) {
        let mut placed = 0;
        while placed < WATER_FIELDS {
            let pick = self.random_index(fields.len());
            if fields[pick].terrain == Terrain::Grass {
                fields[pick].terrain = Terrain::Water;
                placed += 1;
            }
        }
    }

    fn place_castle(&mut self, fields: &mut [Field]) {
        loop {
            let pick = self.random_index(fields.len());
            if fields[pick].terrain == Terrain::Grass {
                fields[pick].castle = CastleState::MyCastle;
                return;
            }
        }
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.rng.next_u64() as usize % len
    }
}
