use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Context, Result};
use open::that as open_link;
use tracing::{debug, info};

/// An audio preview tied to the lyrics view. When a player command is
/// configured we own the child process and stop it on drop; otherwise the
/// URL is handed to the system opener and there is nothing to stop.
pub(crate) struct AudioPreview {
    url: String,
    child: Option<Child>,
}

impl AudioPreview {
    pub(crate) fn start(url: &str, player: Option<&str>) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(anyhow!("This song does not have an audio preview."));
        }

        let child = match player.map(str::trim).filter(|cmd| !cmd.is_empty()) {
            Some(command) => {
                let mut parts = command.split_whitespace();
                let program = parts
                    .next()
                    .ok_or_else(|| anyhow!("audio_player is empty"))?;
                let child = Command::new(program)
                    .args(parts)
                    .arg(url)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .with_context(|| format!("failed to start audio player '{program}'"))?;
                Some(child)
            }
            None => {
                open_link(url).context("failed to open audio preview")?;
                None
            }
        };

        info!(url, managed = child.is_some(), "audio preview started");
        Ok(Self {
            url: url.to_string(),
            child,
        })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    /// Whether closing the preview actually stops playback.
    pub(crate) fn is_managed(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for AudioPreview {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
            debug!(url = %self.url, "audio preview stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_has_no_preview() {
        let err = AudioPreview::start("   ", Some("mpv")).err().unwrap();
        assert!(err.to_string().contains("does not have an audio preview"));
    }

    #[test]
    fn missing_player_binary_is_reported() {
        let err = AudioPreview::start("song.ogg", Some("definitely-not-a-player-binary"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("definitely-not-a-player-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn managed_player_runs_until_dropped() {
        // `sleep 30` stands in for a player that would otherwise outlive the view.
        let mut preview = AudioPreview::start("30", Some("sleep")).unwrap();
        assert!(preview.is_managed());
        assert_eq!(preview.url(), "30");

        let child = preview.child.as_mut().unwrap();
        assert!(child.try_wait().unwrap().is_none());

        drop(preview);
    }
}
