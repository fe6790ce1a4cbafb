//! Shared fixtures for unit tests: hand-built half-maps from ASCII rows.

use std::collections::BTreeMap;

use crate::state::{Field, HalfMap};
use crate::types::{CastleState, Coord, Terrain, TreasureState};

/// Builds a half-map from four 8-character rows (y = 0 first).
/// 'g' grass, 'm' mountain, 'w' water, 'C' castle on grass, 't' treasure on
/// grass, 'M' castle on mountain (for rule-violation fixtures).
pub(crate) fn half_map_from_rows(rows: [&str; 4]) -> HalfMap {
    let mut fields = BTreeMap::new();
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), HalfMap::WIDTH as usize, "row {y} must have 8 cells");
        for (x, cell) in row.chars().enumerate() {
            let mut field = match cell {
                'g' | 'C' | 't' => Field::grass(),
                'm' | 'M' => Field::with_terrain(Terrain::Mountain),
                'w' => Field::with_terrain(Terrain::Water),
                other => panic!("unknown cell marker {other:?}"),
            };
            if cell == 'C' || cell == 'M' {
                field.castle = CastleState::MyCastle;
            }
            if cell == 't' {
                field.treasure = TreasureState::MyTreasure;
            }
            fields.insert(Coord::new(x as i32, y as i32), field);
        }
    }
    HalfMap::from_fields(fields).expect("fixture rows must describe a structurally valid half-map")
}
