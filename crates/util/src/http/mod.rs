pub mod link;
pub mod parser;
pub mod path;

pub use link::*;
pub use parser::*;
pub use path::*;
