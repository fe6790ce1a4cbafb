//! Cost-weighted shortest-path planning over the known map.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::traversal::passable_neighbors;
use crate::state::Field;
use crate::types::{Coord, Terrain};

/// Sentinel cost for any water transition. Larger than every possible path
/// sum on a 64-field board, so a comparison can never select it.
pub(crate) const WATER_COST: u32 = 10_000;

/// Travel cost between two adjacent fields, by terrain. Leaving or entering
/// water is impassable and priced at the sentinel.
pub(crate) fn travel_cost(from: Terrain, to: Terrain) -> u32 {
    match (from, to) {
        (Terrain::Water, _) | (_, Terrain::Water) => WATER_COST,
        (Terrain::Grass, Terrain::Grass) => 2,
        (Terrain::Grass, Terrain::Mountain) | (Terrain::Mountain, Terrain::Grass) => 3,
        (Terrain::Mountain, Terrain::Mountain) => 4,
    }
}

/// An ordered walk from a start (exclusive) to a destination (inclusive).
/// The decision engine holds one as its cursor between ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    steps: VecDeque<Coord>,
    destination: Option<Coord>,
}

impl Route {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(steps: VecDeque<Coord>, destination: Coord) -> Self {
        Self { steps, destination: Some(destination) }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn front(&self) -> Option<Coord> {
        self.steps.front().copied()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Coord> {
        self.steps.pop_front()
    }

    pub fn destination(&self) -> Option<Coord> {
        self.destination
    }

    pub fn steps(&self) -> impl Iterator<Item = Coord> + '_ {
        self.steps.iter().copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    cost: u32,
    y: i32,
    x: i32,
}

/// Cheapest route from `origin` to any member of `destinations`, over the
/// fields in `search`. Distances are computed once, single-source, and reused
/// for every candidate; unreachable candidates are excluded from the
/// comparison. Ties keep the first strictly cheaper candidate in the stable
/// iteration order of the destination set. An empty destination set, an
/// origin outside the search space, a self-destination winning the
/// comparison, or all candidates unreachable yield an empty route.
pub fn plan_route(
    origin: Coord,
    destinations: &BTreeSet<Coord>,
    search: &BTreeMap<Coord, Field>,
) -> Route {
    if destinations.is_empty() || !search.contains_key(&origin) {
        return Route::empty();
    }

    let (cost, came_from) = cheapest_paths(origin, search);

    let mut best: Option<(u32, Coord)> = None;
    for &destination in destinations {
        let total = if destination == origin {
            0
        } else {
            match cost.get(&destination) {
                Some(&total) => total,
                None => continue,
            }
        };
        let better = match best {
            None => true,
            Some((best_cost, _)) => total < best_cost,
        };
        if better {
            best = Some((total, destination));
        }
    }

    match best {
        Some((_, destination)) => reconstruct(origin, destination, &came_from),
        None => Route::empty(),
    }
}

/// Dijkstra rooted at `origin`: an ordered open set popped cheapest-first,
/// with stale entries skipped when a cheaper cost was already recorded.
fn cheapest_paths(
    origin: Coord,
    search: &BTreeMap<Coord, Field>,
) -> (BTreeMap<Coord, u32>, BTreeMap<Coord, Coord>) {
    let mut cost = BTreeMap::from([(origin, 0_u32)]);
    let mut came_from: BTreeMap<Coord, Coord> = BTreeMap::new();
    let mut open = BTreeSet::from([OpenNode { cost: 0, y: origin.y, x: origin.x }]);

    while let Some(node) = open.pop_first() {
        let current = Coord::new(node.x, node.y);
        let settled = *cost.get(&current).expect("open node must have a recorded cost");
        if node.cost > settled {
            continue;
        }
        let from = search.get(&current).expect("open node must lie in the search space").terrain;

        for neighbor in passable_neighbors(search, current) {
            let to = search
                .get(&neighbor)
                .expect("passable neighbor must lie in the search space")
                .terrain;
            let through = settled + travel_cost(from, to);
            if through < cost.get(&neighbor).copied().unwrap_or(u32::MAX) {
                cost.insert(neighbor, through);
                came_from.insert(neighbor, current);
                open.insert(OpenNode { cost: through, y: neighbor.y, x: neighbor.x });
            }
        }
    }

    (cost, came_from)
}

fn reconstruct(origin: Coord, destination: Coord, came_from: &BTreeMap<Coord, Coord>) -> Route {
    if destination == origin {
        return Route::empty();
    }
    let mut steps = VecDeque::new();
    let mut current = destination;
    while current != origin {
        steps.push_front(current);
        let Some(&previous) = came_from.get(&current) else {
            return Route::empty();
        };
        current = previous;
    }
    Route::new(steps, destination)
}
