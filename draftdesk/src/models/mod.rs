//! Data models for draftdesk entities.

mod draft;
mod phase;
mod request;

pub use draft::Draft;
pub use phase::Phase;
pub use request::{CitizenRequest, ResponseType};
