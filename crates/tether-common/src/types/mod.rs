mod kind;
mod window;

pub use kind::*;
pub use window::*;
