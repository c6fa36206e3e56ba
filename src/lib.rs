//! Wave function and probability density of a particle in a one-dimensional
//! box, sampled for an interactive chart.

pub mod axes;
pub mod chart;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod state;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
