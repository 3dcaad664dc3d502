pub mod server;
pub mod api;
pub mod settings_page;
pub mod state;

pub use server::*;
pub use state::*;
