mod check;
mod generate_config;

pub use check::*;
pub use generate_config::*;
