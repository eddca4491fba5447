pub mod config;
pub mod error;
pub mod forumparser;
mod html;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod recency;
pub mod session;
pub mod timeresolver;
pub mod util;

pub use self::error::*;
