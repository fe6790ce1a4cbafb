//! Neighbor-expansion primitives shared by the validator's flood fill, the
//! route planner, and the decision engine's frontier search.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::state::Field;
use crate::types::{Coord, Terrain};

/// The 4-neighbors of `at` that exist in `fields` and are not water.
pub(crate) fn passable_neighbors(fields: &BTreeMap<Coord, Field>, at: Coord) -> Vec<Coord> {
    at.neighbors()
        .into_iter()
        .filter(|neighbor| {
            fields.get(neighbor).is_some_and(|field| field.terrain != Terrain::Water)
        })
        .collect()
}

/// Flood fill over passable fields, seeded at `seed`. Membership is by
/// coordinate value, so logically equal coordinates are one node.
pub(crate) fn reachable_from(fields: &BTreeMap<Coord, Field>, seed: Coord) -> BTreeSet<Coord> {
    let mut visited = BTreeSet::new();
    if !fields.get(&seed).is_some_and(|field| field.terrain != Terrain::Water) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        for neighbor in passable_neighbors(fields, current) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited
}

/// Frontier sweep: collects every field satisfying `is_candidate` that is
/// reachable from `start`, expanding through non-candidate fields but never
/// through a collected candidate. The planner picks the cheapest candidate.
pub(crate) fn frontier_candidates(
    fields: &BTreeMap<Coord, Field>,
    start: Coord,
    is_candidate: impl Fn(Coord, &Field) -> bool,
) -> BTreeSet<Coord> {
    let mut candidates = BTreeSet::new();
    let mut expanded = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for neighbor in passable_neighbors(fields, current) {
            let field = &fields[&neighbor];
            if is_candidate(neighbor, field) {
                candidates.insert(neighbor);
            } else if expanded.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    candidates
}
