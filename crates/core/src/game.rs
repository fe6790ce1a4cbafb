//! Route planning and turn-by-turn decision logic over the merged map.

mod decision;
mod routing;
mod sides;
pub(crate) mod traversal;

pub use decision::{
    CASTLE_SEARCH_RADIUS, DecisionEngine, DecisionEvent, ENEMY_REVEAL_ROUND, Objective,
};
pub use routing::{Route, plan_route};
pub use sides::MapSides;
