pub mod session;
pub mod target;

pub use session::*;
pub use target::*;
