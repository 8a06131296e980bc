//! Reviewer workflow for annotating the output of a natural-language analytics
//! query pipeline.
//!
//! A session walks one `AnnotationRecord` through three steps (context
//! integration, query decomposition, per-sub-query parameter extraction) and
//! ends with the record marked completed.
pub mod catalog;
pub mod config;
pub mod corrections;
pub mod cursor;
pub mod error;
pub mod intent;
pub mod record;
pub mod review;
pub mod sample;
pub mod screen;
pub mod session;
pub mod steps;
pub mod validators;

pub use error::WizardError;
pub use intent::Intent;
pub use record::AnnotationRecord;
pub use session::{Outcome, Session, SessionStatus};
