use anyhow::Result;
use chrono::Local;
use std::time::{Duration, Instant};

use crate::cli::PayloadMode;
use crate::exchange::{self, Outcome};
use crate::link::Link;
use crate::payload::Payload;
use crate::stats::RunCounters;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: PayloadMode,
    pub payload_len: usize,
    pub timeout: Duration,
    pub poll: Duration,
    /// Wall-clock budget for the whole run.
    pub duration: Duration,
    pub max_trials: u64,
    /// Delay inserted between trials.
    pub gap: Duration,
}

/// Timestamped log line, `HH:MM:SS>` prefix.
pub fn info(msg: &str) {
    println!("{}>{}", Local::now().format("%H:%M:%S"), msg);
}

/// Run trials until the wall-clock budget or the trial-count budget is
/// exhausted, whichever comes first. One outstanding exchange at a time.
pub fn run(link: &mut dyn Link, cfg: &RunConfig) -> Result<RunCounters> {
    let mut counters = RunCounters::default();
    let mut offset: usize = 0;
    let mut trials: u64 = 0;
    let started = Instant::now();

    while started.elapsed() < cfg.duration && trials < cfg.max_trials {
        let payload = match cfg.mode {
            PayloadMode::Text => Payload::random_text(cfg.payload_len),
            PayloadMode::Pattern => Payload::pattern(offset, cfg.payload_len),
        };

        let res = exchange::run_trial(link, &payload, cfg.timeout, cfg.poll)?;
        counters.record(res.outcome);
        match res.outcome {
            Outcome::Ok => info(&format!("ok {}", payload.render(&res.received))),
            Outcome::Mismatch => info(&format!("failed : {}", payload.render(&res.received))),
            Outcome::Timeout => info(&format!("timeout {}", payload.render(&res.received))),
        }

        // consecutive pattern trials read out one long cyclic byte stream
        offset = offset.wrapping_add(cfg.payload_len);
        trials += 1;

        // no point sleeping out the gap when no further trial will start
        if !cfg.gap.is_zero() && trials < cfg.max_trials && started.elapsed() < cfg.duration {
            std::thread::sleep(cfg.gap);
        }
    }

    Ok(counters)
}
