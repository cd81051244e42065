mod constants;
mod deserialize;
mod reader;

pub use constants::*;
pub use deserialize::*;
pub use reader::*;
