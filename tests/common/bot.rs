//! Test bot process management.
//!
//! Spawns the joxtabot binary against a [`FakeTmi`](super::FakeTmi).

use std::process::{Child, Command, ExitStatus};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A running bot process. Killed on drop.
pub struct TestBot {
    child: Child,
    _config_dir: TempDir,
}

impl TestBot {
    /// Spawn the bot connecting to `url`. `extra` is appended to the config.
    pub fn spawn(url: &str, extra: &str) -> anyhow::Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[twitch]
channel = "joxtacy"
nick = "joxtabot"
url = "{url}"

[bot]
greeting = "I am online, peeps! widepeepoHappy"
timeout_reasons = ["Because."]

{extra}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_joxtabot"))
            .arg(&config_path)
            .env("TWITCH_IRC_BOT_OAUTH", "testtoken")
            .env("RUST_LOG", "joxtabot=debug")
            .spawn()?;

        Ok(Self {
            child,
            _config_dir: config_dir,
        })
    }

    /// Wait for the process to exit on its own.
    pub async fn wait_exit(&mut self) -> anyhow::Result<ExitStatus> {
        for _ in 0..100 {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("bot did not exit within 5 seconds")
    }
}

impl Drop for TestBot {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
