//! Configuration and CLI argument handling

use clap::Parser;

use crate::services::VibrationConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "windup")]
#[command(about = "A single countdown timer served over a small local HTTP API")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial countdown duration in seconds
    #[arg(short, long, default_value = "60")]
    pub seconds: u64,

    /// Default amount added or subtracted by the +/- endpoints, in seconds
    #[arg(long, default_value = "15")]
    pub step: u64,

    /// Length of the completion vibration in milliseconds
    #[arg(long, default_value = "500")]
    pub vibrate_ms: u64,

    /// Command fired on completion; `{ms}` is replaced by the vibration length
    #[arg(long)]
    pub vibrate_command: Option<String>,

    /// Start counting down immediately
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Vibration settings for the completion listener
    pub fn vibration(&self) -> VibrationConfig {
        VibrationConfig {
            duration_ms: self.vibrate_ms,
            command: self.vibrate_command.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one_minute_with_fifteen_second_steps() {
        let config = Config::try_parse_from(["windup"]).unwrap();
        assert_eq!(config.seconds, 60);
        assert_eq!(config.step, 15);
        assert_eq!(config.vibrate_ms, 500);
        assert_eq!(config.address(), "127.0.0.1:20560");
        assert_eq!(config.log_level(), "info");
        assert!(!config.autostart);
    }

    #[test]
    fn vibration_config_carries_command() {
        let config = Config::try_parse_from([
            "windup",
            "--vibrate-command",
            "termux-vibrate -d {ms}",
            "--vibrate-ms",
            "250",
            "-v",
        ])
        .unwrap();
        let vibration = config.vibration();
        assert_eq!(vibration.duration_ms, 250);
        assert_eq!(vibration.command.as_deref(), Some("termux-vibrate -d {ms}"));
        assert_eq!(config.log_level(), "debug");
    }
}
