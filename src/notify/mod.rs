pub mod alerts;
pub mod audio;
pub mod pulse;

pub use alerts::AlertReaction;
pub use audio::{AlertAsset, AudioPlayer, CommandPlayer, UnavailablePlayer};
pub use pulse::{CancelableTimer, PulseReaction, PulseSettings};

#[cfg(feature = "rodio-playback")]
pub use audio::RodioPlayer;
