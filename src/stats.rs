use std::time::{Duration, Instant};

/// How often [`Recorder::has_report`] asks for a status line
const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Tracks generation throughput and population for the status line
pub struct Recorder {
    gens: u64,
    alive: usize,
    gens_in_report: u64,
    started: Instant,
    last_report: Instant,
}
impl Recorder {
    pub fn new(alive: usize) -> Self {
        let now = Instant::now();
        Self {
            gens: 0,
            alive,
            gens_in_report: 0,
            started: now,
            last_report: now,
        }
    }

    pub fn record(&mut self, alive: usize) {
        self.gens += 1;
        self.gens_in_report += 1;
        self.alive = alive;
    }

    pub fn has_report(&self) -> bool {
        self.last_report.elapsed() >= REPORT_INTERVAL
    }

    pub fn report(&mut self) -> String {
        let gens_per_sec = self.gens_in_report as f64 / self.last_report.elapsed().as_secs_f64();
        // reset stats for next report
        self.last_report = Instant::now();
        self.gens_in_report = 0;

        format_line(gens_per_sec, self.gens, self.alive)
    }

    /// The status line over the whole run
    pub fn summary(&self) -> String {
        let secs = self.started.elapsed().as_secs_f64();
        let gens_per_sec = if secs > 0.0 { self.gens as f64 / secs } else { 0.0 };
        format_line(gens_per_sec, self.gens, self.alive)
    }
}

fn format_line(gens_per_sec: f64, gens: u64, alive: usize) -> String {
    format!("{:.02}gen/s gens:{}, alive:{}", gens_per_sec, gens, alive)
}
