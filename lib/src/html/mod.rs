mod document;
mod element;
mod find_elements;

pub use self::document::*;
pub use self::element::*;
pub use self::find_elements::*;
