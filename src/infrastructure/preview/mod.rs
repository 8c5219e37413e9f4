//! Preview playback adapters

mod rodio_player;

pub use rodio_player::RodioPreviewPlayer;
