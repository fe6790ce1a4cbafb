use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{AvatarState, CastleState, Coord, MapError, Terrain, TreasureState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub terrain: Terrain,
    pub castle: CastleState,
    pub treasure: TreasureState,
    pub avatar: AvatarState,
}

impl Field {
    pub fn grass() -> Self {
        Self::with_terrain(Terrain::Grass)
    }

    pub fn with_terrain(terrain: Terrain) -> Self {
        Self {
            terrain,
            castle: CastleState::None,
            treasure: TreasureState::None,
            avatar: AvatarState::None,
        }
    }
}

/// One player's 8x4 portion of the board. Terrain is fixed once constructed;
/// only markers evolve afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HalfMap {
    fields: BTreeMap<Coord, Field>,
}

impl HalfMap {
    pub const WIDTH: i32 = 8;
    pub const HEIGHT: i32 = 4;
    pub const FIELD_COUNT: usize = 32;

    pub fn from_fields(fields: BTreeMap<Coord, Field>) -> Result<Self, MapError> {
        if fields.len() != Self::FIELD_COUNT {
            return Err(MapError::WrongFieldCount {
                expected: Self::FIELD_COUNT,
                actual: fields.len(),
            });
        }
        for &coord in fields.keys() {
            if coord.x < 0 || coord.x >= Self::WIDTH || coord.y < 0 || coord.y >= Self::HEIGHT {
                return Err(MapError::OutOfBounds {
                    coord,
                    width: Self::WIDTH,
                    height: Self::HEIGHT,
                });
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &BTreeMap<Coord, Field> {
        &self.fields
    }

    pub fn field_at(&self, coord: Coord) -> Option<&Field> {
        self.fields.get(&coord)
    }

    pub fn castle_coord(&self) -> Option<Coord> {
        self.fields
            .iter()
            .find(|(_, field)| field.castle == CastleState::MyCastle)
            .map(|(&coord, _)| coord)
    }

    pub fn terrain_count(&self, terrain: Terrain) -> usize {
        self.fields.values().filter(|field| field.terrain == terrain).count()
    }

    /// Stable byte encoding of the half-map's persistent content, in sorted
    /// coordinate order. Avatar markers are transient and excluded.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::FIELD_COUNT * 3);
        for field in self.fields.values() {
            bytes.push(match field.terrain {
                Terrain::Grass => 0,
                Terrain::Mountain => 1,
                Terrain::Water => 2,
            });
            bytes.push(match field.castle {
                CastleState::None => 0,
                CastleState::MyCastle => 1,
                CastleState::EnemyCastle => 2,
            });
            bytes.push(match field.treasure {
                TreasureState::None => 0,
                TreasureState::MyTreasure => 1,
            });
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// How the two halves are stitched into a full board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapLayout {
    /// Side by side, 16x4.
    Wide,
    /// Stacked, 8x8.
    Stacked,
}

/// Which slot the own half occupies in the join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HalfSlot {
    First,
    Second,
}

/// The merged board as one player sees it: full terrain, own castle known,
/// the other half's castle and treasure stripped until revealed.
#[derive(Clone, Debug)]
pub struct Map {
    width: i32,
    height: i32,
    fields: BTreeMap<Coord, Field>,
    own_castle: Coord,
}

impl Map {
    pub fn join(
        own: &HalfMap,
        other: &HalfMap,
        layout: MapLayout,
        own_slot: HalfSlot,
    ) -> Result<Map, MapError> {
        let (shift_x, shift_y, width, height) = match layout {
            MapLayout::Wide => (HalfMap::WIDTH, 0, HalfMap::WIDTH * 2, HalfMap::HEIGHT),
            MapLayout::Stacked => (0, HalfMap::HEIGHT, HalfMap::WIDTH, HalfMap::HEIGHT * 2),
        };
        let (own_shift, other_shift) = match own_slot {
            HalfSlot::First => ((0, 0), (shift_x, shift_y)),
            HalfSlot::Second => ((shift_x, shift_y), (0, 0)),
        };

        let mut fields = BTreeMap::new();
        for (&coord, &field) in own.fields() {
            fields.insert(shifted(coord, own_shift), field);
        }
        for (&coord, &field) in other.fields() {
            let mut hidden = field;
            hidden.castle = CastleState::None;
            hidden.treasure = TreasureState::None;
            fields.insert(shifted(coord, other_shift), hidden);
        }

        let own_castle = own.castle_coord().ok_or(MapError::CastleMissing)?;
        Ok(Map { width, height, fields, own_castle: shifted(own_castle, own_shift) })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn fields(&self) -> &BTreeMap<Coord, Field> {
        &self.fields
    }

    pub fn field_at(&self, coord: Coord) -> Option<&Field> {
        self.fields.get(&coord)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// A field an avatar may stand on: present and not water.
    pub fn is_passable(&self, coord: Coord) -> bool {
        self.fields.get(&coord).is_some_and(|field| field.terrain != Terrain::Water)
    }

    /// The own castle's position on the merged board, tracked through the join.
    pub fn own_castle(&self) -> Coord {
        self.own_castle
    }

    pub fn set_castle(&mut self, coord: Coord, castle: CastleState) -> Result<(), MapError> {
        self.update_field(coord, |field| field.castle = castle)
    }

    pub fn set_treasure(&mut self, coord: Coord, treasure: TreasureState) -> Result<(), MapError> {
        self.update_field(coord, |field| field.treasure = treasure)
    }

    pub fn set_avatar(&mut self, coord: Coord, avatar: AvatarState) -> Result<(), MapError> {
        self.update_field(coord, |field| field.avatar = avatar)
    }

    fn update_field(
        &mut self,
        coord: Coord,
        apply: impl FnOnce(&mut Field),
    ) -> Result<(), MapError> {
        match self.fields.get_mut(&coord) {
            Some(field) => {
                apply(field);
                Ok(())
            }
            None => Err(MapError::OutOfBounds { coord, width: self.width, height: self.height }),
        }
    }

    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::with_capacity(self.fields.len() * 3 + 8);
        bytes.extend(self.width.to_le_bytes());
        bytes.extend(self.height.to_le_bytes());
        for field in self.fields.values() {
            bytes.push(field.terrain as u8);
            bytes.push(field.castle as u8);
            bytes.push(field.treasure as u8);
        }
        xxh3_64(&bytes)
    }
}

fn shifted(coord: Coord, shift: (i32, i32)) -> Coord {
    Coord::new(coord.x + shift.0, coord.y + shift.1)
}

/// Read-only snapshot of everything one player knows at the start of a tick.
/// Reveal is monotonic and owned by the caller; the decision engine never
/// mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knowledge {
    pub position: Coord,
    pub treasure_seen: Option<Coord>,
    pub enemy_castle_seen: Option<Coord>,
    pub enemy_position: Option<Coord>,
    pub round: u32,
    pub treasure_collected: bool,
}

impl Knowledge {
    pub fn at(position: Coord) -> Self {
        Self {
            position,
            treasure_seen: None,
            enemy_castle_seen: None,
            enemy_position: None,
            round: 0,
            treasure_collected: false,
        }
    }
}
