pub mod analyser;
pub mod color;
pub mod coordinator;
pub mod lookup;
pub mod playback;
