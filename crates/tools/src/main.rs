//! Self-play harness: generates both half-maps, joins them the way the
//! server would, and lets two decision engines race for treasure and castle.

use anyhow::{Result, ensure};
use clap::Parser;
use fogbound_core::{
    AvatarState, CastleState, Coord, DecisionEngine, ENEMY_REVEAL_ROUND, HalfMap, HalfSlot,
    Knowledge, Map, MapLayout, MapSides, Terrain, TreasureState, generate_half_map,
    validate_half_map,
};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use serde::Serialize;

/// Sighting distance for hidden treasure and castle markers; a stand-in for
/// the real game's field-of-view rules.
const SIGHT_RADIUS: u32 = 1;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for generation, layout choice and treasure placement
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Round cap before the match is called a draw
    #[arg(short, long, default_value_t = 800)]
    max_rounds: u32,

    /// Print the match summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MatchSummary {
    seed: u64,
    layout: MapLayout,
    rounds: u32,
    winner: Option<u8>,
    half_fingerprints: [u64; 2],
    board_fingerprint: u64,
}

struct Player {
    engine: DecisionEngine,
    view: Map,
    position: Coord,
    treasure: Coord,
    treasure_seen: Option<Coord>,
    treasure_collected: bool,
    enemy_castle: Coord,
    enemy_castle_seen: Option<Coord>,
    enemy_sighting: Option<Coord>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let half_seeds = [rng.next_u64(), rng.next_u64()];
    let halves = [
        generate_half_map(half_seeds[0])
            .map_err(|error| anyhow::anyhow!("half-map generation failed: {error:?}"))?,
        generate_half_map(half_seeds[1])
            .map_err(|error| anyhow::anyhow!("half-map generation failed: {error:?}"))?,
    ];
    for half in &halves {
        ensure!(validate_half_map(half), "generator returned an invalid half-map");
    }

    let layout =
        if rng.next_u64() % 2 == 0 { MapLayout::Wide } else { MapLayout::Stacked };
    let slots = if rng.next_u64() % 2 == 0 {
        [HalfSlot::First, HalfSlot::Second]
    } else {
        [HalfSlot::Second, HalfSlot::First]
    };

    let mut a = build_player(&mut rng, &halves[0], &halves[1], layout, slots[0])?;
    let mut b = build_player(&mut rng, &halves[1], &halves[0], layout, slots[1])?;

    let mut winner = None;
    let mut rounds = args.max_rounds;
    for round in 0..args.max_rounds {
        tick(&mut a, b.position, round)?;
        if a.treasure_collected && a.position == a.enemy_castle {
            winner = Some(0);
            rounds = round;
            break;
        }
        tick(&mut b, a.position, round)?;
        if b.treasure_collected && b.position == b.enemy_castle {
            winner = Some(1);
            rounds = round;
            break;
        }
    }

    let summary = MatchSummary {
        seed: args.seed,
        layout,
        rounds,
        winner,
        half_fingerprints: [halves[0].fingerprint(), halves[1].fingerprint()],
        board_fingerprint: a.view.fingerprint(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Seed {} on {:?} board", summary.seed, summary.layout);
        match summary.winner {
            Some(index) => println!("Player {index} won after {} rounds", summary.rounds),
            None => println!("No winner within {} rounds", summary.rounds),
        }
        println!("Half fingerprints: {:016x} {:016x}",
            summary.half_fingerprints[0], summary.half_fingerprints[1]);
        println!("Board fingerprint: {:016x}", summary.board_fingerprint);
    }

    Ok(())
}

fn build_player(
    rng: &mut ChaCha8Rng,
    own: &HalfMap,
    other: &HalfMap,
    layout: MapLayout,
    slot: HalfSlot,
) -> Result<Player> {
    let view = Map::join(own, other, layout, slot)
        .map_err(|error| anyhow::anyhow!("join failed: {error:?}"))?;
    let castle = view.own_castle();
    let sides = MapSides::try_new(&view, own.castle_coord().expect("validated half has a castle"))
        .map_err(|error| anyhow::anyhow!("side split failed: {error:?}"))?;

    // The merge owner hides the treasure on a random own-side grass field
    // that is not the castle.
    let candidates: Vec<Coord> = sides
        .own_side()
        .iter()
        .filter(|&(&coord, ref field)| field.terrain == Terrain::Grass && coord != castle)
        .map(|(&coord, _)| coord)
        .collect();
    ensure!(!candidates.is_empty(), "no grass available for treasure placement");
    let treasure = candidates[rng.next_u64() as usize % candidates.len()];

    let other_castle = other.castle_coord().expect("validated half has a castle");
    let (shift_x, shift_y) = match layout {
        MapLayout::Wide => (8, 0),
        MapLayout::Stacked => (0, 4),
    };
    let enemy_castle = match slot {
        HalfSlot::First => Coord::new(other_castle.x + shift_x, other_castle.y + shift_y),
        HalfSlot::Second => other_castle,
    };

    Ok(Player {
        engine: DecisionEngine::new(sides),
        view,
        position: castle,
        treasure,
        treasure_seen: None,
        treasure_collected: false,
        enemy_castle,
        enemy_castle_seen: None,
        enemy_sighting: None,
    })
}

fn tick(player: &mut Player, opponent_position: Coord, round: u32) -> Result<()> {
    if player.treasure_seen.is_none()
        && !player.treasure_collected
        && player.position.manhattan(player.treasure) <= SIGHT_RADIUS
    {
        player.treasure_seen = Some(player.treasure);
        player
            .view
            .set_treasure(player.treasure, TreasureState::MyTreasure)
            .map_err(|error| anyhow::anyhow!("treasure reveal failed: {error:?}"))?;
    }
    if player.enemy_castle_seen.is_none()
        && player.position.manhattan(player.enemy_castle) <= SIGHT_RADIUS
    {
        player.enemy_castle_seen = Some(player.enemy_castle);
        player
            .view
            .set_castle(player.enemy_castle, CastleState::EnemyCastle)
            .map_err(|error| anyhow::anyhow!("castle reveal failed: {error:?}"))?;
    }
    if round >= ENEMY_REVEAL_ROUND && player.enemy_sighting.is_none() {
        player.enemy_sighting = Some(opponent_position);
    }

    let knowledge = Knowledge {
        position: player.position,
        treasure_seen: player.treasure_seen,
        enemy_castle_seen: player.enemy_castle_seen,
        enemy_position: player.enemy_sighting,
        round,
        treasure_collected: player.treasure_collected,
    };

    let Some(direction) = player.engine.next_move(&knowledge, &player.view) else {
        return Ok(());
    };
    let next = direction.step(player.position);
    ensure!(player.view.is_passable(next), "engine stepped toward impassable {next:?}");

    player
        .view
        .set_avatar(player.position, AvatarState::None)
        .and_then(|()| player.view.set_avatar(next, AvatarState::Mine))
        .map_err(|error| anyhow::anyhow!("avatar marker update failed: {error:?}"))?;
    player.position = next;

    if player.position == player.treasure {
        player.treasure_collected = true;
    }
    Ok(())
}
