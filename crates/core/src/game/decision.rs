//! Phase-based per-tick policy that turns partial map knowledge into moves.

use std::collections::{BTreeMap, BTreeSet};

use super::routing::{Route, plan_route};
use super::sides::MapSides;
use super::traversal::frontier_candidates;
use crate::state::{Field, Knowledge, Map};
use crate::types::{Coord, Direction, Terrain};

/// Round after which collaborators reveal the opponent's approximate position.
pub const ENEMY_REVEAL_ROUND: u32 = 10;

/// Half-width of the castle search box around a sighted enemy position. Ten
/// rounds of grass-only moves cannot carry an avatar further from its castle.
pub const CASTLE_SEARCH_RADIUS: i32 = 2;

/// What the engine is currently steering toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    SightedTreasure,
    OwnFrontier,
    SightedCastle,
    CastleSearchArea,
    BorderCrossing,
    OpponentFrontier,
}

/// Pulled by collaborators for display and diagnostics; the engine itself
/// performs no I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecisionEvent {
    ObjectiveChanged { objective: Objective, destination: Coord, route_len: u16 },
    RouteDiscarded { position: Coord },
}

/// Per-player decision engine. Sequential by construction: one call to
/// [`DecisionEngine::next_move`] must complete before the next begins, since
/// the visited set and route cursor are read-modify-write state.
pub struct DecisionEngine {
    sides: MapSides,
    visited: BTreeSet<Coord>,
    current_route: Route,
    border_objective_set: bool,
    all_castle_positions_searched: bool,
    route_corrupted: bool,
    log: Vec<DecisionEvent>,
    last_objective: Option<(Objective, Coord)>,
}

impl DecisionEngine {
    pub fn new(sides: MapSides) -> Self {
        Self {
            sides,
            visited: BTreeSet::new(),
            current_route: Route::empty(),
            border_objective_set: false,
            all_castle_positions_searched: false,
            route_corrupted: false,
            log: Vec::new(),
            last_objective: None,
        }
    }

    /// Single per-tick entry point: selects a destination set for the current
    /// phase, replans when needed, and emits at most one directional command.
    /// `None` means "wait this tick"; a corrupted route is discarded here and
    /// replanned on the next call, never escalated.
    pub fn next_move(&mut self, knowledge: &Knowledge, map: &Map) -> Option<Direction> {
        self.visited.insert(knowledge.position);

        if self.route_corrupted {
            self.current_route = Route::empty();
            self.route_corrupted = false;
        }

        if knowledge.treasure_collected {
            self.plan_castle_hunt(knowledge, map);
        } else {
            self.plan_treasure_hunt(knowledge, map);
        }

        self.emit_move(knowledge.position, map)
    }

    pub fn current_route(&self) -> &Route {
        &self.current_route
    }

    pub fn visited(&self) -> &BTreeSet<Coord> {
        &self.visited
    }

    pub fn log(&self) -> &[DecisionEvent] {
        &self.log
    }

    /// Treasure phase: head straight for a sighted treasure, otherwise sweep
    /// the own half for the nearest unvisited grass.
    fn plan_treasure_hunt(&mut self, knowledge: &Knowledge, map: &Map) {
        if let Some(treasure) = knowledge.treasure_seen {
            let search = with_origin(self.sides.own_side(), knowledge.position, map);
            let route = plan_route(knowledge.position, &BTreeSet::from([treasure]), &search);
            self.adopt_route(Objective::SightedTreasure, route);
        } else if self.needs_replan(knowledge.position) {
            let search = with_origin(self.sides.own_side(), knowledge.position, map);
            let destinations = frontier_candidates(&search, knowledge.position, |coord, field| {
                !self.visited.contains(&coord) && field.terrain == Terrain::Grass
            });
            let route = plan_route(knowledge.position, &destinations, &search);
            self.adopt_route(Objective::OwnFrontier, route);
        }
    }

    /// Castle phase, one prioritized chain: a sighted castle beats the search
    /// box around a sighted enemy, which beats the one-off push to the border,
    /// which beats the frontier sweep of the opponent half.
    fn plan_castle_hunt(&mut self, knowledge: &Knowledge, map: &Map) {
        if let Some(castle) = knowledge.enemy_castle_seen {
            let route = plan_route(knowledge.position, &BTreeSet::from([castle]), map.fields());
            self.adopt_route(Objective::SightedCastle, route);
        } else if let Some(enemy) = knowledge.enemy_position
            && !self.all_castle_positions_searched
        {
            let destinations = self.castle_search_area(enemy);
            let route = plan_route(knowledge.position, &destinations, map.fields());
            self.adopt_route(Objective::CastleSearchArea, route);
            if destinations.len() <= 1 {
                self.all_castle_positions_searched = true;
            }
        } else if knowledge.enemy_position.is_none() && !self.border_objective_set {
            let destinations = self.sides.boundary_grass_targets();
            let route = plan_route(knowledge.position, &destinations, map.fields());
            self.adopt_route(Objective::BorderCrossing, route);
            self.border_objective_set = true;
        } else if self.needs_replan(knowledge.position) {
            // Candidates lie on the opponent half, but the sweep and the
            // route may cross the own half: the avatar can still be on its
            // way over, and a plan that cannot leave the own side would
            // strand it for the rest of the game.
            let destinations =
                frontier_candidates(map.fields(), knowledge.position, |coord, field| {
                    !self.visited.contains(&coord)
                        && field.terrain == Terrain::Grass
                        && !self.sides.is_own(coord)
                });
            let route = plan_route(knowledge.position, &destinations, map.fields());
            self.adopt_route(Objective::OpponentFrontier, route);
        }
    }

    /// Installs a freshly planned route and records the objective change, but
    /// only when objective or destination actually moved, so a stable plan
    /// does not flood the log.
    fn adopt_route(&mut self, objective: Objective, route: Route) {
        if let Some(destination) = route.destination()
            && self.last_objective != Some((objective, destination))
        {
            self.log.push(DecisionEvent::ObjectiveChanged {
                objective,
                destination,
                route_len: route.len() as u16,
            });
            self.last_objective = Some((objective, destination));
        }
        self.current_route = route;
    }

    fn needs_replan(&self, position: Coord) -> bool {
        self.current_route.is_empty() || self.current_route.destination() == Some(position)
    }

    /// Unvisited grass on the opponent half within the search box around the
    /// sighted enemy position. A sighting outside the board simply produces
    /// an empty set, which closes the search phase on the same call.
    fn castle_search_area(&self, enemy: Coord) -> BTreeSet<Coord> {
        self.sides
            .opponent_side()
            .iter()
            .filter(|&(&coord, ref field)| {
                !self.visited.contains(&coord)
                    && (coord.x - enemy.x).abs() <= CASTLE_SEARCH_RADIUS
                    && (coord.y - enemy.y).abs() <= CASTLE_SEARCH_RADIUS
                    && field.terrain == Terrain::Grass
            })
            .map(|(&coord, _)| coord)
            .collect()
    }

    /// Advances the route cursor only once arrival at its front is confirmed,
    /// then derives the cardinal direction to the new front. Anything that
    /// does not look like a unit step onto a passable neighbor flags the
    /// route as corrupted and waits.
    fn emit_move(&mut self, position: Coord, map: &Map) -> Option<Direction> {
        if self.current_route.is_empty() {
            self.route_corrupted = true;
            return None;
        }

        if self.current_route.front() == Some(position) {
            self.current_route.pop_front();
        }

        let Some(next) = self.current_route.front() else {
            self.route_corrupted = true;
            return None;
        };

        if !map.in_bounds(next) || !map.is_passable(next) {
            self.discard_route(position);
            return None;
        }

        let Some(direction) = Direction::between(position, next) else {
            self.discard_route(position);
            return None;
        };

        Some(direction)
    }

    fn discard_route(&mut self, position: Coord) {
        self.route_corrupted = true;
        self.log.push(DecisionEvent::RouteDiscarded { position });
    }

    #[cfg(test)]
    fn force_route(&mut self, route: Route) {
        self.current_route = route;
    }
}

/// The avatar may stand outside the side being searched (for example on the
/// own half while sweeping the opponent's); the search space must still
/// contain its field.
fn with_origin(
    side: &BTreeMap<Coord, Field>,
    origin: Coord,
    map: &Map,
) -> BTreeMap<Coord, Field> {
    let mut search = side.clone();
    if let Some(&field) = map.field_at(origin) {
        search.insert(origin, field);
    }
    search
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::state::{HalfMap, HalfSlot, MapLayout};
    use crate::test_support::half_map_from_rows;

    fn own_half() -> HalfMap {
        half_map_from_rows(["gggggggg", "ggwwwwgg", "mgwwwwgm", "gCgggmgg"])
    }

    fn other_half() -> HalfMap {
        half_map_from_rows(["gggggggg", "ggwwwwgg", "mgwwwwgm", "ggggCmgg"])
    }

    fn wide_setup() -> (Map, DecisionEngine, Coord) {
        let own = own_half();
        let map = Map::join(&own, &other_half(), MapLayout::Wide, HalfSlot::First).expect("join");
        let castle = map.own_castle();
        let sides = MapSides::try_new(&map, own.castle_coord().expect("castle")).expect("sides");
        (map, DecisionEngine::new(sides), castle)
    }

    #[test]
    fn first_tick_plans_toward_unvisited_grass() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        let direction = engine.next_move(&knowledge, &map).expect("move");
        let next = direction.step(castle);
        assert!(map.is_passable(next));
        assert!(engine.visited().contains(&castle));
    }

    #[test]
    fn sighted_treasure_is_planned_directly() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_seen = Some(Coord::new(4, 3));

        engine.next_move(&knowledge, &map).expect("move");
        assert_eq!(engine.current_route().destination(), Some(Coord::new(4, 3)));
    }

    #[test]
    fn stationary_calls_advance_the_cursor_at_most_once() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_seen = Some(Coord::new(4, 3));

        let first = engine.next_move(&knowledge, &map).expect("move");
        let route_len = engine.current_route().len();
        for _ in 0..3 {
            let again = engine.next_move(&knowledge, &map).expect("move");
            assert_eq!(again, first);
            assert_eq!(engine.current_route().len(), route_len);
        }
    }

    #[test]
    fn cursor_advances_only_after_arrival_is_confirmed() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_seen = Some(Coord::new(4, 3));

        let first = engine.next_move(&knowledge, &map).expect("move");
        let arrived = first.step(castle);

        knowledge.position = arrived;
        let second = engine.next_move(&knowledge, &map).expect("move");
        assert!(map.is_passable(second.step(arrived)));
        assert_ne!(engine.current_route().front(), Some(arrived));
    }

    #[test]
    fn non_neighbor_route_front_is_discarded_and_replanned() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        engine.force_route(Route::new(
            VecDeque::from([Coord::new(7, 0), Coord::new(6, 0)]),
            Coord::new(6, 0),
        ));

        assert_eq!(engine.next_move(&knowledge, &map), None);
        let direction = engine.next_move(&knowledge, &map).expect("replanned move");
        assert!(map.is_passable(direction.step(castle)));
    }

    #[test]
    fn out_of_bounds_route_front_is_corruption_not_a_crash() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        engine.force_route(Route::new(
            VecDeque::from([Coord::new(-1, 0)]),
            Coord::new(-1, 0),
        ));

        assert_eq!(engine.next_move(&knowledge, &map), None);
        assert!(engine.next_move(&knowledge, &map).is_some());
    }

    #[test]
    fn water_route_front_is_corruption() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        // (2, 1) is water on the own half.
        engine.force_route(Route::new(
            VecDeque::from([Coord::new(2, 1)]),
            Coord::new(2, 1),
        ));

        assert_eq!(engine.next_move(&knowledge, &map), None);
    }

    #[test]
    fn sighted_enemy_castle_is_planned_over_the_full_board() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_collected = true;
        knowledge.round = ENEMY_REVEAL_ROUND + 1;
        knowledge.enemy_castle_seen = Some(Coord::new(12, 3));

        engine.next_move(&knowledge, &map).expect("move");
        assert_eq!(engine.current_route().destination(), Some(Coord::new(12, 3)));
    }

    #[test]
    fn enemy_sighting_bounds_the_castle_search_area() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_collected = true;
        knowledge.round = ENEMY_REVEAL_ROUND + 1;
        knowledge.enemy_position = Some(Coord::new(12, 1));

        let area = engine.castle_search_area(Coord::new(12, 1));
        assert!(!area.is_empty());
        for coord in &area {
            assert!((coord.x - 12).abs() <= CASTLE_SEARCH_RADIUS);
            assert!((coord.y - 1).abs() <= CASTLE_SEARCH_RADIUS);
            assert!(!engine.sides.is_own(*coord));
        }

        engine.next_move(&knowledge, &map);
        let destination = engine.current_route().destination().expect("destination");
        assert!(area.contains(&destination));
    }

    #[test]
    fn exhausted_search_area_latches_and_falls_back_to_the_frontier() {
        let (map, mut engine, _castle) = wide_setup();
        // Standing on the own side of the divider, one step from enemy grass.
        let mut knowledge = Knowledge::at(Coord::new(7, 0));
        knowledge.treasure_collected = true;
        knowledge.round = ENEMY_REVEAL_ROUND + 1;
        // A sighting outside the board has no candidate cells around it.
        knowledge.enemy_position = Some(Coord::new(100, 100));

        assert_eq!(engine.next_move(&knowledge, &map), None);
        assert!(engine.all_castle_positions_searched);

        // The next tick falls through to the opponent-half frontier sweep.
        let direction = engine.next_move(&knowledge, &map).expect("frontier move");
        let next = direction.step(knowledge.position);
        assert!(!engine.sides.is_own(next));
        assert!(map.is_passable(next));
    }

    #[test]
    fn without_a_sighting_the_border_objective_is_planned_once() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_collected = true;

        engine.next_move(&knowledge, &map).expect("move");
        assert!(engine.border_objective_set);
        let destination = engine.current_route().destination().expect("destination");
        assert_eq!(destination.x, 8);

        // The objective is not replanned on later ticks.
        let route_before = engine.current_route().clone();
        engine.next_move(&knowledge, &map);
        assert_eq!(engine.current_route().destination(), route_before.destination());
    }

    #[test]
    fn visited_bookkeeping_is_idempotent() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        engine.next_move(&knowledge, &map);
        engine.next_move(&knowledge, &map);
        assert_eq!(engine.visited().iter().filter(|&&c| c == castle).count(), 1);
    }

    #[test]
    fn unchanged_objective_is_logged_once() {
        let (map, mut engine, castle) = wide_setup();
        let mut knowledge = Knowledge::at(castle);
        knowledge.treasure_seen = Some(Coord::new(4, 3));

        engine.next_move(&knowledge, &map);
        engine.next_move(&knowledge, &map);
        let changes = engine
            .log()
            .iter()
            .filter(|event| matches!(event, DecisionEvent::ObjectiveChanged { .. }))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn discarding_a_bad_route_is_logged() {
        let (map, mut engine, castle) = wide_setup();
        let knowledge = Knowledge::at(castle);

        engine.force_route(Route::new(
            VecDeque::from([Coord::new(7, 0), Coord::new(6, 0)]),
            Coord::new(6, 0),
        ));
        engine.next_move(&knowledge, &map);

        assert!(
            engine
                .log()
                .iter()
                .any(|event| *event == DecisionEvent::RouteDiscarded { position: castle })
        );
    }
}
