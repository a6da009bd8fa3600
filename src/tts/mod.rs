pub mod client;
pub mod factory;
pub mod gtts;
pub mod interface;

pub use factory::TTSFactory;
pub use interface::TTSInterface;
