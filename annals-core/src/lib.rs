//! Annals library exports

pub mod catalog;
pub mod chronicle;
pub mod error;
pub mod view;

pub use catalog::{Catalog, Era};
pub use chronicle::{ChronicleConfig, Chronicler, DetailedRecord, MajorEvent};
pub use error::{ConfigError, FetchError};
pub use view::{DetailView, FetchTicket, ViewSession, ViewState};
