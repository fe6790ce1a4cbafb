//! Own/opponent partition of the merged map, derived from castle offsets.

use std::collections::{BTreeMap, BTreeSet};

use crate::state::{Field, HalfMap, Map};
use crate::types::{Coord, MapError, Terrain};

/// Splits the merged board into the own and opponent halves. The own
/// rectangle is located by comparing the castle's position on the merged
/// board with its position inside the half-map that was sent out.
#[derive(Clone, Debug)]
pub struct MapSides {
    own: BTreeMap<Coord, Field>,
    opponent: BTreeMap<Coord, Field>,
    own_min: Coord,
    own_max: Coord,
}

impl MapSides {
    pub fn try_new(map: &Map, half_map_castle: Coord) -> Result<Self, MapError> {
        let castle = map.own_castle();
        let own_min = Coord::new(castle.x - half_map_castle.x, castle.y - half_map_castle.y);
        let own_max =
            Coord::new(own_min.x + HalfMap::WIDTH - 1, own_min.y + HalfMap::HEIGHT - 1);
        if !map.in_bounds(own_min) || !map.in_bounds(own_max) {
            return Err(MapError::OutOfBounds {
                coord: half_map_castle,
                width: map.width(),
                height: map.height(),
            });
        }

        let mut own = BTreeMap::new();
        let mut opponent = BTreeMap::new();
        for (&coord, &field) in map.fields() {
            if in_rectangle(coord, own_min, own_max) {
                own.insert(coord, field);
            } else {
                opponent.insert(coord, field);
            }
        }

        Ok(Self { own, opponent, own_min, own_max })
    }

    pub fn own_side(&self) -> &BTreeMap<Coord, Field> {
        &self.own
    }

    pub fn opponent_side(&self) -> &BTreeMap<Coord, Field> {
        &self.opponent
    }

    pub fn is_own(&self, coord: Coord) -> bool {
        in_rectangle(coord, self.own_min, self.own_max)
    }

    /// Grass fields on the opponent-side line directly across the dividing
    /// edge: the cheapest places to enter the opponent's half.
    pub fn boundary_grass_targets(&self) -> BTreeSet<Coord> {
        self.opponent
            .iter()
            .filter(|&(&coord, ref field)| {
                self.on_boundary_line(coord) && field.terrain == Terrain::Grass
            })
            .map(|(&coord, _)| coord)
            .collect()
    }

    /// The own rectangle spans the full board in the unsplit axis, so only
    /// the line adjacent to the divider can hold opponent fields.
    fn on_boundary_line(&self, coord: Coord) -> bool {
        coord.x == self.own_max.x + 1
            || coord.x == self.own_min.x - 1
            || coord.y == self.own_max.y + 1
            || coord.y == self.own_min.y - 1
    }
}

fn in_rectangle(coord: Coord, min: Coord, max: Coord) -> bool {
    coord.x >= min.x && coord.x <= max.x && coord.y >= min.y && coord.y <= max.y
}
