//! Device vibration

use std::io::Write;
use tokio::process::Command;
use tracing::{debug, info};

/// How a completion pulse is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibrationConfig {
    /// Length of the pulse in milliseconds
    pub duration_ms: u64,
    /// External command to run; `{ms}` in any argument is replaced by the duration
    pub command: Option<String>,
}

impl VibrationConfig {
    /// Program and arguments of the configured command, with `{ms}` substituted
    pub fn command_line(&self) -> Option<(String, Vec<String>)> {
        let command = self.command.as_deref()?;
        let duration = self.duration_ms.to_string();
        let mut parts = command
            .split_whitespace()
            .map(|part| part.replace("{ms}", &duration));

        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            command: None,
        }
    }
}

/// Fire one vibration pulse
pub async fn vibrate(config: &VibrationConfig) -> Result<(), String> {
    match config.command_line() {
        Some((program, args)) => {
            debug!("Running vibration command: {} {:?}", program, args);

            let output = Command::new(&program)
                .args(&args)
                .output()
                .await
                .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(format!("{} failed: {}", program, stderr.trim()));
            }

            info!("Vibrated for {}ms", config.duration_ms);
            Ok(())
        }
        None => {
            // No vibrator configured, ring the terminal bell instead
            let mut stderr = std::io::stderr();
            stderr
                .write_all(b"\x07")
                .and_then(|_| stderr.flush())
                .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;

            info!("Bell rung in place of a {}ms vibration", config.duration_ms);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_substitutes_duration() {
        let config = VibrationConfig {
            duration_ms: 500,
            command: Some("termux-vibrate -f -d {ms}".to_string()),
        };
        let (program, args) = config.command_line().unwrap();
        assert_eq!(program, "termux-vibrate");
        assert_eq!(args, vec!["-f", "-d", "500"]);
    }

    #[test]
    fn blank_command_has_no_command_line() {
        let config = VibrationConfig {
            duration_ms: 500,
            command: Some("   ".to_string()),
        };
        assert!(config.command_line().is_none());
        assert!(VibrationConfig::default().command_line().is_none());
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let config = VibrationConfig {
            duration_ms: 10,
            command: Some("windup-no-such-vibrator".to_string()),
        };
        let err = vibrate(&config).await.unwrap_err();
        assert!(err.contains("windup-no-such-vibrator"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_reports_exit() {
        let config = VibrationConfig {
            duration_ms: 10,
            command: Some("false".to_string()),
        };
        assert!(vibrate(&config).await.is_err());

        let config = VibrationConfig {
            duration_ms: 10,
            command: Some("true {ms}".to_string()),
        };
        assert!(vibrate(&config).await.is_ok());
    }
}
