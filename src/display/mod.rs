//! # Display Module
//!
//! This module describes the framebuffers monoqr renders onto.
//!
//! ## Modules
//!
//! - [`config`]: Display geometry, profiles, and render configuration

pub mod config;

pub use config::{CanvasSpec, DisplayConfig, DisplayProfile, RenderConfig};
