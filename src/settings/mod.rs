pub mod types;
pub mod form;
pub mod controller;

pub use types::*;
pub use form::*;
pub use controller::*;
