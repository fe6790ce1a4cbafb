pub mod game;
pub mod mapgen;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_support;

pub use game::{
    CASTLE_SEARCH_RADIUS, DecisionEngine, DecisionEvent, ENEMY_REVEAL_ROUND, MapSides, Objective,
    Route, plan_route,
};
pub use mapgen::{HalfMapGenerator, generate_half_map, validate_half_map};
pub use state::{Field, HalfMap, HalfSlot, Knowledge, Map, MapLayout};
pub use types::*;
