//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own score persistence and the assessment session state
//! machine so route handlers can stay focused on protocol translation.

pub mod scores;
pub mod session;
