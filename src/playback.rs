use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, Context, Result};

use crate::feed::VideoEntry;

const URL_PLACEHOLDER: &str = "%URL%";
const TITLE_PLACEHOLDER: &str = "%TITLE%";

/// Something that can play the card currently on screen.
pub trait PlaybackSurface {
    fn play(&mut self, entry: &VideoEntry) -> Result<()>;
    fn pause(&mut self);
    fn now_playing(&self) -> Option<u64>;
}

/// Plays and pauses, logging and discarding any playback error. Feed state
/// never depends on whether playback worked.
pub fn play_or_log(surface: &mut dyn PlaybackSurface, entry: &VideoEntry) {
    if surface.now_playing() == Some(entry.id) {
        return;
    }
    surface.pause();
    if let Err(err) = surface.play(entry) {
        tracing::warn!(id = entry.id, source = %entry.source, "video play failed: {err:#}");
    }
}

/// Runs an external player process per card, e.g. mpv. Pausing stops the
/// process; the next visible card starts a fresh one.
#[derive(Debug)]
pub struct ExternalPlayer {
    command: Vec<String>,
    child: Option<(u64, Child)>,
}

impl ExternalPlayer {
    pub fn new(command: Vec<String>) -> Result<Self> {
        if command.first().map_or(true, |program| program.trim().is_empty()) {
            return Err(anyhow!("player command is empty"));
        }
        Ok(Self {
            command,
            child: None,
        })
    }

    fn args_for(&self, entry: &VideoEntry) -> Vec<String> {
        let url = entry.source.as_str();
        let mut saw_url = false;
        let mut args: Vec<String> = self.command[1..]
            .iter()
            .map(|arg| {
                if arg.contains(URL_PLACEHOLDER) {
                    saw_url = true;
                }
                arg.replace(URL_PLACEHOLDER, url)
                    .replace(TITLE_PLACEHOLDER, &entry.caption)
            })
            .collect();
        if !saw_url {
            args.push(url.to_string());
        }
        args
    }
}

impl PlaybackSurface for ExternalPlayer {
    fn play(&mut self, entry: &VideoEntry) -> Result<()> {
        let args = self.args_for(entry);
        tracing::debug!(id = entry.id, ?args, "starting player");
        let child = Command::new(&self.command[0])
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("launch {} to play {}", self.command[0], entry.source))?;
        self.child = Some((entry.id, child));
        Ok(())
    }

    fn pause(&mut self) {
        let Some((id, mut child)) = self.child.take() else {
            return;
        };
        if let Err(err) = child.kill() {
            tracing::debug!(id, "player already stopped: {err}");
        }
        match child.wait() {
            Ok(status) => tracing::debug!(id, code = ?status.code(), "player stopped"),
            Err(err) => tracing::warn!(id, "wait for player: {err}"),
        }
    }

    fn now_playing(&self) -> Option<u64> {
        self.child.as_ref().map(|(id, _)| *id)
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.pause();
    }
}

/// Remembers what would be playing without producing any output. Used when
/// autoplay is disabled.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    current: Option<u64>,
}

impl PlaybackSurface for SilentPlayer {
    fn play(&mut self, entry: &VideoEntry) -> Result<()> {
        self.current = Some(entry.id);
        Ok(())
    }

    fn pause(&mut self) {
        self.current = None;
    }

    fn now_playing(&self) -> Option<u64> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceRef;
    use crate::feed::caption_for;

    fn entry(id: u64, source: &str) -> VideoEntry {
        VideoEntry {
            id,
            source: SourceRef::from(source),
            caption: caption_for(id),
            viewed: false,
        }
    }

    #[test]
    fn substitutes_placeholders() {
        let player = ExternalPlayer::new(vec![
            "mpv".into(),
            "--force-media-title=%TITLE%".into(),
            "%URL%".into(),
        ])
        .unwrap();
        assert_eq!(
            player.args_for(&entry(4, "https://cdn.test/a.mp4")),
            vec!["--force-media-title=Reel #4", "https://cdn.test/a.mp4"]
        );
    }

    #[test]
    fn appends_url_without_placeholder() {
        let player = ExternalPlayer::new(vec!["vlc".into(), "--loop".into()]).unwrap();
        assert_eq!(
            player.args_for(&entry(1, "/tmp/b.mp4")),
            vec!["--loop", "/tmp/b.mp4"]
        );
    }

    #[test]
    fn rejects_empty_command() {
        assert!(ExternalPlayer::new(Vec::new()).is_err());
        assert!(ExternalPlayer::new(vec![" ".into()]).is_err());
    }

    #[test]
    fn launch_failure_is_swallowed() {
        let mut player =
            ExternalPlayer::new(vec!["reels-tui-no-such-player-binary".into()]).unwrap();
        play_or_log(&mut player, &entry(1, "a.mp4"));
        assert_eq!(player.now_playing(), None);
    }

    #[test]
    fn silent_player_tracks_current_entry() {
        let mut player = SilentPlayer::default();
        play_or_log(&mut player, &entry(2, "a.mp4"));
        assert_eq!(player.now_playing(), Some(2));
        player.pause();
        assert_eq!(player.now_playing(), None);
    }
}
