//! Data model for the Wink campus network.
//!
//! Purpose: define the `Course` and `User` entities, the controlled
//! vocabularies their enumerated fields draw from, and the contracts the
//! persistence and transport layers rely on. Storage, routing and wire
//! formats live outside this crate.
//!
//! Public surface:
//! - [`domain`]: entities, identifiers, vocabularies, field rules and
//!   entity descriptors.
//! - [`domain::ports`]: repository traits implemented by persistence
//!   adapters.
//! - [`outbound`]: in-memory adapters for the repository ports.
//! - [`config`]: validation settings loaded via OrthoConfig.
//! - [`doc`]: OpenAPI component schemas for the entity DTOs.
//!
//! # Example
//!
//! ```
//! use wink_model::domain::{Course, KeyState};
//!
//! let mut course = Course::new("MATH101", "td", 2).expect("valid course");
//! assert_eq!(course.key(), "MATH101-td-2");
//!
//! course.set_number(3);
//! assert_eq!(course.key(), "MATH101-td-3");
//! assert_eq!(course.key_state(), KeyState::Consistent);
//! ```

pub mod config;
pub mod doc;
pub mod domain;
pub mod outbound;

pub use config::ValidationSettings;
pub use doc::ModelDoc;
