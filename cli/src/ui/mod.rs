mod stdout;

pub use self::stdout::*;
