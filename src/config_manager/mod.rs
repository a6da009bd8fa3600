pub mod asr;
pub mod main;
pub mod pipeline;
pub mod system;
pub mod translate;
pub mod tts;
pub mod utils;

pub use main::Config;
