use async_trait::async_trait;
use std::env;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::core::AudioError;
use crate::scanner::Listing;

/// Players tried in order when none is configured.
const KNOWN_PLAYERS: &[&str] = &["mpg123", "mpg321", "mplayer", "afplay", "play", "cvlc", "aplay"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAsset {
    NewHouse,
    JustAPrice,
}

impl AlertAsset {
    pub fn for_listing(listing: &Listing) -> Self {
        if listing.is_repriced {
            AlertAsset::JustAPrice
        } else {
            AlertAsset::NewHouse
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            AlertAsset::NewHouse => "new_house.mp3",
            AlertAsset::JustAPrice => "just_a_price.mp3",
        }
    }

    pub fn path_in(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(self.file_name())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Resolves once playback finished or failed.
    async fn play(&self, path: &Path) -> Result<(), AudioError>;
}

/// Plays files through an external program, the asset path passed last.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `configured` is a program name optionally followed by arguments,
    /// split on whitespace. Without one, the first known player on `PATH` is used.
    pub fn from_config(configured: Option<&str>) -> Result<Self, AudioError> {
        if let Some(command) = configured {
            let mut parts = command.split_whitespace().map(str::to_string);
            if let Some(program) = parts.next() {
                return Ok(Self::new(program, parts.collect()));
            }
        }

        KNOWN_PLAYERS
            .iter()
            .find(|player| find_on_path(player).is_some())
            .map(|player| Self::new(*player, Vec::new()))
            .ok_or(AudioError::NoPlayer)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<(), AudioError> {
        if !path.exists() {
            return Err(AudioError::MissingAsset(path.to_path_buf()));
        }

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(AudioError::ExitStatus {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Stands in when no player could be found; every alert fails with
/// `AudioError::NoPlayer` while the rest of the pipeline keeps running.
pub struct UnavailablePlayer;

#[async_trait]
impl AudioPlayer for UnavailablePlayer {
    async fn play(&self, _path: &Path) -> Result<(), AudioError> {
        Err(AudioError::NoPlayer)
    }
}

/// Native playback on a blocking thread.
#[cfg(feature = "rodio-playback")]
pub struct RodioPlayer;

#[cfg(feature = "rodio-playback")]
fn play_blocking(path: PathBuf) -> Result<(), AudioError> {
    use rodio::{Decoder, OutputStreamBuilder, Sink};
    use std::fs::File;
    use std::io::BufReader;

    // the stream must outlive playback
    let stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| AudioError::Device(e.to_string()))?;
    let sink = Sink::connect_new(stream.mixer());

    let file = File::open(&path).map_err(|_| AudioError::MissingAsset(path.clone()))?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(feature = "rodio-playback")]
#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, path: &Path) -> Result<(), AudioError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || play_blocking(path))
            .await
            .map_err(|e| AudioError::Device(e.to_string()))?
    }
}
