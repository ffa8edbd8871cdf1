use anyhow::{Context, Result, anyhow};
use bitrows::{DEFAULT_COLS, DEFAULT_ROWS, Grid};
use std::time::Duration;

use crate::cadence::{Cadence, TICKS_PER_GENERATION, TICKS_PER_SECOND};

/// Generations run when neither `--gens` nor `--realtime` is given
const DEFAULT_GENERATIONS: usize = 1000;

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    /// Parses the command line, returning `None` if only help was requested
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("t", "threads", "compute rows in parallel");
        opts.optflag("", "realtime", "pace generations like the reference frontend");
        opts.optflag("p", "print", "print the final grid");
        opts.optflag("", "rle", "print the final grid as RLE");
        opts.optopt("r", "rows", "set grid height", "ROWS");
        opts.optopt("c", "cols", "set grid width (at most 64)", "COLS");
        opts.optopt("s", "seed", "seed for random fills", "SEED");
        opts.optopt("f", "fill", "random, alternating, all or empty", "TYPE");
        opts.optopt("", "pattern", "place a built-in pattern in the centre", "NAME");
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "tps", "timer ticks per second in realtime mode", "TICKS");
        opts.optopt("", "every", "ticks per generation in realtime mode", "TICKS");

        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .context("invalid arguments")?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: bitrows [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn get<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.matches
            .opt_get(name)
            .with_context(|| format!("invalid value for --{name}"))
    }

    pub fn rows(&self) -> Result<usize> {
        Ok(self.get("rows")?.unwrap_or(DEFAULT_ROWS))
    }
    pub fn cols(&self) -> Result<usize> {
        Ok(self.get("cols")?.unwrap_or(DEFAULT_COLS))
    }
    pub fn seed(&self) -> Result<Option<u64>> {
        self.get("seed")
    }

    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }
    pub fn realtime(&self) -> bool {
        self.matches.opt_present("realtime")
    }
    pub fn print(&self) -> bool {
        self.matches.opt_present("print")
    }
    pub fn rle(&self) -> bool {
        self.matches.opt_present("rle")
    }

    pub fn generations(&self) -> Result<usize> {
        let default = if self.realtime() {
            usize::MAX // runs until interrupted
        } else {
            DEFAULT_GENERATIONS
        };
        Ok(self.get("gens")?.unwrap_or(default))
    }

    pub fn cadence(&self) -> Result<Option<Cadence>> {
        if !self.realtime() {
            return Ok(None);
        }
        let tps: f64 = self.get("tps")?.unwrap_or(TICKS_PER_SECOND);
        // the tick interval has to be a representable duration
        if !(tps.is_finite() && Duration::try_from_secs_f64(1.0 / tps).is_ok()) {
            return Err(anyhow!("--tps must be a positive number, got {tps}"));
        }
        let every = self.get("every")?.unwrap_or(TICKS_PER_GENERATION);
        Ok(Some(Cadence::new(tps, every)))
    }

    pub fn pattern(&self) -> Option<String> {
        self.matches.opt_str("pattern")
    }

    /// The fill mode, defaulting to empty when a pattern is placed and random otherwise
    pub fn fill_mode(&self) -> Result<FillMode> {
        let default = if self.pattern().is_some() { "empty" } else { "random" };
        let mode_str = self.matches.opt_str("fill");
        let mode_str = mode_str.as_deref().unwrap_or(default);
        FillMode::new(mode_str).ok_or_else(|| anyhow!("unknown fill mode {mode_str:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    pub fn apply(self, grid: &mut Grid) {
        if self == Self::Random {
            grid.randomize();
            return;
        }
        for row in 0..grid.row_count() {
            for col in 0..grid.cols() {
                let alive = match self {
                    Self::Alternating => (row + col) % 2 == 0,
                    Self::All => true,
                    _ => false,
                };
                grid.set(row, col, alive);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::new(list).expect("valid args").expect("not help")
    }

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::with_seed(rows, cols, 1).expect("valid size")
    }

    #[test]
    fn defaults_match_reference_board() {
        let args = args(&[]);
        assert_eq!(args.rows().unwrap(), 48);
        assert_eq!(args.cols().unwrap(), 64);
        assert_eq!(args.generations().unwrap(), 1000);
        assert_eq!(args.fill_mode().unwrap(), FillMode::Random);
        assert!(args.cadence().unwrap().is_none());
    }

    #[test]
    fn fill_mode_parses() {
        let args = args(&["--fill", "alternating"]);
        assert_eq!(args.fill_mode().unwrap(), FillMode::Alternating);
    }

    #[test]
    fn pattern_defaults_to_empty_fill() {
        let args = args(&["--pattern", "glider"]);
        assert_eq!(args.fill_mode().unwrap(), FillMode::Empty);
        assert_eq!(args.pattern().as_deref(), Some("glider"));
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(args(&["--fill", "sparse"]).fill_mode().is_err());
        assert!(args(&["--rows", "many"]).rows().is_err());
        assert!(args(&["--realtime", "--tps", "0"]).cadence().is_err());
        assert!(args(&["--realtime", "--tps=-5"]).cadence().is_err());
        assert!(args(&["--realtime", "--tps", "inf"]).cadence().is_err());
        assert!(Args::new(&["--bogus"]).is_err());
    }

    #[test]
    fn realtime_runs_unbounded() {
        let args = args(&["--realtime"]);
        assert_eq!(args.generations().unwrap(), usize::MAX);
        let cadence = args.cadence().unwrap().expect("realtime cadence");
        assert_eq!(cadence.generations_per_second(), 7.5);
    }

    #[test]
    fn tick_rate_must_give_a_finite_interval() {
        // subnormal rates make the interval infinite
        assert!(args(&["--realtime", "--tps", "1e-320"]).cadence().is_err());

        let cadence = args(&["--realtime", "--tps", "0.5"]).cadence().unwrap().expect("cadence");
        assert_eq!(cadence.tick_interval(), Duration::from_secs(2));
    }

    #[test]
    fn help_returns_none() {
        assert!(Args::new(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn fill_all_sets_every_cell() {
        let mut grid = grid(3, 5);
        FillMode::All.apply(&mut grid);
        assert_eq!(grid.population(), 15);
    }

    #[test]
    fn fill_alternating_uses_parity() {
        let mut grid = grid(3, 3);
        FillMode::Alternating.apply(&mut grid);
        let alive: Vec<_> = grid.alive_cells().map(|c| (c.row, c.col)).collect();
        assert_eq!(alive, vec![(0, 0), (0, 2), (1, 1), (2, 0), (2, 2)]);
    }

    #[test]
    fn fill_empty_clears() {
        let mut grid = grid(4, 4);
        FillMode::All.apply(&mut grid);
        FillMode::Empty.apply(&mut grid);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn fill_random_stays_in_bounds() {
        let mut grid = grid(4, 6);
        FillMode::Random.apply(&mut grid);
        assert!(grid.words().iter().all(|&w| w >> 6 == 0));
    }
}
