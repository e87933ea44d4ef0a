pub mod core;
pub use self::core::*;
pub mod model;
pub use model::OpenAiModel;
