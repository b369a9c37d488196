//! PicSync turns a screenshot of an event into a Google Calendar invite link.

pub mod calendar;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod ocr;
pub mod pipeline;
pub mod refiner;
#[cfg(feature = "web-interface")]
pub mod server;
pub mod startup;

pub use error::{Error, PicSyncResult};
pub use model::EventRecord;
pub use pipeline::{EventPipeline, ProcessedEvent};
