//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and orchestration so route handlers can
//! stay focused on request parsing and response shaping.

pub mod analysis;
