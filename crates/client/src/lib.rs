pub mod config;
pub mod editor;
pub mod http;
pub mod matcher;
pub mod store;

pub use config::{ClientConfig, ConfigError};
pub use editor::{PatternEditor, SaveError, TestRequest, TestResponse};
pub use http::ApiClient;
pub use matcher::{Matcher, MatcherError, RegexMatcher};
pub use store::{PatternStore, StoreError};
