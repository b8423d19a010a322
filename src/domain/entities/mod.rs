//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without I/O.
//!
//! # Entity Types
//!
//! - [`UserRecord`] - A row of the `student` table
//! - [`NewUser`] - Input for provisioning a student account
//! - [`SessionUser`] - The identity stored in a session after a successful login

pub mod session_user;
pub mod user;

pub use session_user::SessionUser;
pub use user::{NewUser, UserRecord};
