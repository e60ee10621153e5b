pub mod catalog;
pub mod dialog;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod media;
pub mod models;
pub mod remote;
pub mod session;
pub mod settings;
pub mod state;

pub use error::CatalogError;
pub use settings::Settings;
pub use state::AppState;
