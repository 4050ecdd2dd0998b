//! Color-space conversion, WCAG contrast evaluation, perceptual distance and
//! color-vision-deficiency simulation.
//!
//! The engine modules (`convert`, `contrast`, `wcag`, `distance`, `vision`)
//! are pure functions over `palette::Srgb<u8>` and never perform I/O.

pub mod cli;
pub mod commands;
pub mod config;
pub mod contrast;
pub mod convert;
pub mod distance;
pub mod error;
pub mod logging;
pub mod vision;
pub mod wcag;

pub use error::ColorError;
