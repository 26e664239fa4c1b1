//! Terminal administration front end for the fleet backend.
//!
//! Each resource collection gets its own [`fleet_table::TableViewer`]; records
//! come from a [`source::RecordSource`] (a directory of JSON files or the REST
//! backend) and are fetched in the background.

pub mod app;
pub mod error;
pub mod paths;
pub mod resources;
pub mod settings;
pub mod source;
pub mod terminal;

pub use app::{App, AppEvent, Control, Mode};
pub use error::AppError;
pub use resources::Resource;
pub use settings::Settings;
