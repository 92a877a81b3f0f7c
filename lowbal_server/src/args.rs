//! Command-line arguments for the Lowbal server.
use crate::assistant::{AssistantConfig, DEFAULT_MAX_DELAY_MS, DEFAULT_MIN_DELAY_MS};
use clap::Parser;
use lowbal_common::net::{COMMAND_PORT, DEFAULT_HOST, addr};
use std::time::Duration;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to bind the command listener to.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// TCP port for client commands.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub port: u16,

    /// Shortest simulated processing delay for offer generation, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_MIN_DELAY_MS)]
    pub min_delay_ms: u64,

    /// Longest simulated processing delay for offer generation, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Seed for reproducible offers and messages.
    #[clap(long)]
    pub seed: Option<u64>,
}

impl Args {
    /// Address in "ip:port" form.
    pub fn bind_addr(&self) -> String {
        addr(self.host.trim(), self.port)
    }

    /// Assistant settings derived from the arguments.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.min_delay_ms)),
            seed: self.seed,
        }
    }
}
