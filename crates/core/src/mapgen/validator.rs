//! Pure rule checks over a half-map, shared by the generator's retry loop and
//! by rule enforcement on a half-map received from a peer.

use crate::game::traversal::reachable_from;
use crate::state::HalfMap;
use crate::types::{CastleState, Terrain};

pub(crate) const MIN_GRASS_FIELDS: usize = 15;
pub(crate) const MIN_MOUNTAIN_FIELDS: usize = 3;
pub(crate) const MIN_WATER_FIELDS: usize = 4;

const MAX_WATER_ON_LONG_EDGE: usize = 3;
const MAX_WATER_ON_SHORT_EDGE: usize = 1;

/// Conjunction of the four half-map rules; any violation is `false`, never an
/// error. Structural defects are ruled out by `HalfMap::from_fields`.
pub fn validate_half_map(map: &HalfMap) -> bool {
    minimum_terrain_rule(map)
        && border_water_rule(map)
        && castle_rule(map)
        && reachability_rule(map)
}

/// Every terrain type must appear: at least 15 grass, 3 mountain and 4 water
/// fields per half-map.
fn minimum_terrain_rule(map: &HalfMap) -> bool {
    map.terrain_count(Terrain::Grass) >= MIN_GRASS_FIELDS
        && map.terrain_count(Terrain::Mountain) >= MIN_MOUNTAIN_FIELDS
        && map.terrain_count(Terrain::Water) >= MIN_WATER_FIELDS
}

/// Each border may hold at most half its length in water (3 on the long
/// edges, 1 on the short ones) so a crossing between the joined halves stays
/// possible.
fn border_water_rule(map: &HalfMap) -> bool {
    let mut long_edge_top = 0;
    let mut long_edge_bottom = 0;
    let mut short_edge_left = 0;
    let mut short_edge_right = 0;

    for (coord, field) in map.fields() {
        if field.terrain != Terrain::Water {
            continue;
        }
        if coord.y == 0 {
            long_edge_top += 1;
        }
        if coord.y == HalfMap::HEIGHT - 1 {
            long_edge_bottom += 1;
        }
        if coord.x == 0 {
            short_edge_left += 1;
        }
        if coord.x == HalfMap::WIDTH - 1 {
            short_edge_right += 1;
        }
    }

    long_edge_top <= MAX_WATER_ON_LONG_EDGE
        && long_edge_bottom <= MAX_WATER_ON_LONG_EDGE
        && short_edge_left <= MAX_WATER_ON_SHORT_EDGE
        && short_edge_right <= MAX_WATER_ON_SHORT_EDGE
}

/// Exactly one castle, standing on grass.
fn castle_rule(map: &HalfMap) -> bool {
    let mut castles = map.fields().values().filter(|field| field.castle == CastleState::MyCastle);
    match (castles.next(), castles.next()) {
        (Some(castle), None) => castle.terrain == Terrain::Grass,
        _ => false,
    }
}

/// Every non-water field must be reachable from the castle without crossing
/// water; a flood fill seeded at the castle must visit exactly
/// `32 - water_count` fields.
fn reachability_rule(map: &HalfMap) -> bool {
    let Some(castle) = map.castle_coord() else {
        return false;
    };
    let accessible = HalfMap::FIELD_COUNT - map.terrain_count(Terrain::Water);
    reachable_from(map.fields(), castle).len() == accessible
}
