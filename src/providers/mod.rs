pub mod compatible;
pub mod factory;
pub mod reliable;
pub mod scrub;
pub mod traits;

pub use compatible::OpenAiCompatibleProvider;
pub use factory::create_provider;
pub use reliable::ReliableProvider;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{ChatMessage, ChatRole, Provider};
