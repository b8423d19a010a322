//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`credentials`] - Login form input and its validation rules
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is orchestrated in services (see [`crate::application::services`])

pub mod credentials;
pub mod entities;
pub mod repositories;
