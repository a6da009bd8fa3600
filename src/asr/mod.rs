pub mod client;
pub mod interface;

pub use client::WhisperClient;
pub use interface::{ASRInterface, TranscriptSegment, Transcription};
