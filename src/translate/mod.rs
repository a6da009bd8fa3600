pub mod client;
pub mod interface;
pub mod orchestrator;

pub use client::LibreTranslateClient;
pub use interface::{count_pairs, InstalledLanguage, TranslateInterface};
pub use orchestrator::{TranslationOrchestrator, TranslationOutcome, TranslationRoute};
