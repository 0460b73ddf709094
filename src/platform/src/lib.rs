pub mod context;
pub mod error;
pub mod health;
pub mod http;
pub mod provider;
pub mod pull_requests;
pub mod reviewers;
pub mod statistics;
pub mod teams;
pub mod users;

pub use context::Context;
pub use error::PlatformError;
pub use error::Result;
pub use provider::PlatformProvider;
