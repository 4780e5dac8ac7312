pub mod clock;
pub mod lrc;

pub use clock::{format_time, PlaybackClock};
pub use lrc::{LyricLine, LyricSheet};
