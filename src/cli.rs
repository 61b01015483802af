use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::run::RunConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "link-echo", about = "Serial link round-trip echo tester")]
pub struct Cli {
    /// Serial device path (e.g. /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// Payload size in bytes per trial
    #[arg(default_value_t = 279)]
    pub payload_len: usize,
    /// Payload generation mode
    #[arg(long, value_enum, default_value_t = PayloadMode::Text)]
    pub mode: PayloadMode,
    /// Echo timeout per trial in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub timeout_ms: u64,
    /// Polling interval while waiting for the echo, in milliseconds
    #[arg(long, default_value_t = 10)]
    pub poll_ms: u64,
    /// Wall-clock run budget in seconds
    #[arg(long, default_value_t = 60)]
    pub duration_s: u64,
    /// Maximum number of trials per run
    #[arg(long, default_value_t = 1000)]
    pub max_trials: u64,
    /// Delay between trials in milliseconds
    #[arg(long, default_value_t = 0)]
    pub gap_ms: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Random alphanumeric text, newline-terminated
    Text,
    /// Deterministic (offset + k) % 256 byte pattern
    Pattern,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            mode: self.mode,
            payload_len: self.payload_len,
            timeout: Duration::from_millis(self.timeout_ms),
            poll: Duration::from_millis(self.poll_ms),
            duration: Duration::from_secs(self.duration_s),
            max_trials: self.max_trials,
            gap: Duration::from_millis(self.gap_ms),
        }
    }
}
