//! Pocket Table entry point
//!
//! Runs a break shot headlessly: racks, shoots, advances at 60 Hz until the
//! table settles and reports what dropped.
//!
//! Usage: `pocket-table [seed] [settings.json]`

use anyhow::{Context, Result};

use pocket_table::consts::CUE_BALL;
use pocket_table::{CueStick, Table, TableSettings};

/// Frame time fed to the simulation
const FRAME_DT: f64 = 1.0 / 60.0;
/// Give up on a shot after two simulated minutes
const MAX_FRAMES: u32 = 60 * 120;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .map(|s| s.parse::<u64>().context("seed must be an unsigned integer"))
        .transpose()?;
    let mut settings = match args.next() {
        Some(path) => TableSettings::load(&path).with_context(|| format!("loading {path}"))?,
        None => TableSettings::default(),
    };
    if let Some(seed) = seed {
        settings.seed = seed;
    }

    log::info!("Pocket Table starting (seed {})", settings.seed);
    let mut table = Table::new(settings)?;
    table.shoot(&CueStick::default())?;

    let mut frames = 0;
    let mut substeps = 0;
    while !table.is_settled() && frames < MAX_FRAMES {
        let report = table.advance(FRAME_DT)?;
        substeps += report.substeps;
        for number in report.pocketed {
            log::info!("Ball {} pocketed after {:.2}s", number, f64::from(frames) * FRAME_DT);
        }
        frames += 1;
    }

    if !table.is_settled() {
        log::warn!("Table still moving after {} frames", frames);
    }
    if table.is_pocketed(CUE_BALL) {
        log::info!("Scratch: respotting the cue ball");
        table.replace_cue_ball()?;
    }

    println!(
        "Settled after {:.2}s ({} frames, {} sub-steps)",
        f64::from(frames) * FRAME_DT,
        frames,
        substeps
    );
    let pocketed: Vec<u8> = table.pocketed_balls().iter().map(|b| b.number()).collect();
    println!("Pocketed: {:?}", pocketed);
    for ball in table.active_balls() {
        println!("  ball {:2} at ({:+.3}, {:+.3})", ball.number(), ball.pos.x, ball.pos.y);
    }
    Ok(())
}
