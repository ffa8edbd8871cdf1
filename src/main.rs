use std::thread;

use anyhow::{Context, Result};
use bitrows::{Cell, Grid, enc};

mod cadence;
mod options;
mod stats;

use stats::Recorder;

fn args_to_grid(args: &options::Args) -> Result<Grid> {
    let (rows, cols) = (args.rows()?, args.cols()?);
    let mut grid = match args.seed()? {
        Some(seed) => Grid::with_seed(rows, cols, seed),
        None => Grid::new(rows, cols),
    }
    .with_context(|| format!("cannot create a {rows}x{cols} grid"))?;

    args.fill_mode()?.apply(&mut grid);

    if let Some(name) = args.pattern() {
        let pattern = enc::builtin(&name)?;
        // centre the pattern, clamping to the top-left if it is larger than the grid
        let at = Cell::new(
            rows.saturating_sub(pattern.height()) / 2,
            cols.saturating_sub(pattern.width()) / 2,
        );
        grid.stamp(&pattern, at)
            .with_context(|| format!("cannot place pattern {name:?}"))?;
    }
    Ok(grid)
}

fn main() -> Result<()> {
    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let mut grid = args_to_grid(&args)?;
    println!(
        "grid: {}x{}, alive: {}",
        grid.row_count(),
        grid.cols(),
        grid.population()
    );

    let generations = args.generations()?;
    let threads = args.multithreading();
    let mut cadence = args.cadence()?;
    if let Some(ref cadence) = cadence {
        println!("realtime: {:.02}gen/s", cadence.generations_per_second());
    }

    let mut stats = Recorder::new(grid.population());
    let mut stepped = 0;
    while stepped < generations {
        // in realtime mode only every n-th timer tick computes a generation
        if let Some(ref mut cadence) = cadence {
            thread::sleep(cadence.tick_interval());
            if !cadence.tick() {
                continue;
            }
        }

        if threads {
            grid.step_parallel();
        } else {
            grid.step();
        }
        stepped += 1;
        stats.record(grid.population());

        // report metrics every 500ms
        if stats.has_report() {
            println!("{}", stats.report());
        }
    }
    println!("{}", stats.summary());

    if args.print() {
        print!("{grid}");
    }
    if args.rle() {
        print!("{}", grid.to_pattern().to_rle());
    }

    Ok(())
}
