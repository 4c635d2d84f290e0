//! CAMPUS Core — domain models, repository traits, and the shared
//! error taxonomy for the multi-tenant school back office.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{CampusError, CampusResult};
