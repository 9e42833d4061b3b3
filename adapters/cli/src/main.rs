#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Spook'n'Loot session.

mod autopilot;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use spooknloot_core::{Command, Event, Mode, TileCode};
use spooknloot_system_level::TileMap;
use spooknloot_world::{apply, query, World};

use crate::autopilot::Autopilot;

/// Runs a scripted dungeon crawl without a window.
#[derive(Debug, Parser)]
#[command(name = "spooknloot", about = "Headless Spook'n'Loot dungeon session")]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the session RNG; overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Print every generated level as characters.
    #[arg(long)]
    dump_level: bool,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    verbose: bool,
}

/// Entry point for the Spook'n'Loot command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = config::load(cli.config.as_deref(), cli.seed)?;
    let mut world = World::new(config);
    let mut pilot = Autopilot::new(config.navigator);
    let mut events = Vec::new();

    apply(&mut world, Command::EnterDungeon, &mut events);
    settle(&world, &mut pilot, &events, cli.dump_level);

    for _ in 0..cli.frames {
        events.clear();
        if let Some(strike) = pilot.strike(&world) {
            apply(&mut world, strike, &mut events);
        }
        pilot.steer(&world);
        apply(
            &mut world,
            Command::Tick {
                player_hitbox: pilot.hitbox(),
            },
            &mut events,
        );
        settle(&world, &mut pilot, &events, cli.dump_level);

        if pilot.is_dead() {
            pilot.respawn();
            events.clear();
            apply(&mut world, Command::ResetRun, &mut events);
            apply(&mut world, Command::EnterDungeon, &mut events);
            settle(&world, &mut pilot, &events, cli.dump_level);
        }
    }

    print_summary(&world, &pilot, cli.frames);
    Ok(())
}

fn settle(world: &World, pilot: &mut Autopilot, events: &[Event], dump_level: bool) {
    pilot.observe(world, events);
    for event in events {
        match event {
            Event::LevelGenerated {
                level_index,
                rooms,
                fallback,
                ..
            } => {
                if *fallback {
                    warn!("level {level_index} fell back to default spawn and exit");
                }
                info!("entered level {level_index} with {rooms} rooms");
                if dump_level {
                    if let Some(tiles) = query::tile_map(world) {
                        println!("{}", render_tiles(tiles));
                    }
                }
            }
            Event::BossSpawned { .. } => info!("boss arena reached"),
            _ => {}
        }
    }
}

fn render_tiles(tiles: &TileMap) -> String {
    let columns = tiles.columns() as usize;
    let mut out = String::with_capacity((columns + 1) * tiles.rows() as usize);
    for (cell, code) in tiles.iter() {
        out.push(tile_char(code));
        if cell.column() as usize + 1 == columns {
            out.push('\n');
        }
    }
    out
}

fn tile_char(code: TileCode) -> char {
    match code {
        TileCode::Void => ' ',
        TileCode::Floor => '.',
        TileCode::Exit => 'E',
        TileCode::WallTop | TileCode::WallBottom => '-',
        TileCode::WallLeft | TileCode::WallRight => '|',
        TileCode::CornerTopLeft
        | TileCode::CornerTopRight
        | TileCode::CornerBottomLeft
        | TileCode::CornerBottomRight => '+',
    }
}

fn print_summary(world: &World, pilot: &Autopilot, frames: u32) {
    let tally = pilot.tally();
    let mode = match query::mode(world) {
        Mode::Overworld => "overworld",
        Mode::Dungeon => "dungeon",
        Mode::BossArena => "boss arena",
    };

    println!("frames simulated:  {frames}");
    println!("mode reached:      {mode}");
    println!("levels cleared:    {}", tally.levels_cleared);
    println!("mobs slain:        {}", tally.mobs_slain);
    println!("swings:            {}", tally.swings);
    println!("strikes taken:     {}", tally.strikes_taken);
    println!("potions collected: {}", tally.potions);
    println!("deaths:            {}", tally.deaths);
    if let Some((health, max)) = query::boss_health(world) {
        println!("boss health:       {health:.1}/{max:.1}");
    }
}
