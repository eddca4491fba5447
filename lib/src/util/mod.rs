mod fs;
mod slice;

pub use self::fs::*;
pub use self::slice::*;
