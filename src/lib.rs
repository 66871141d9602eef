//! MiCava library - audio-reactive bar visualizer

pub mod app;
pub mod audio;
pub mod bars;
pub mod config;
pub mod error;
pub mod params;
pub mod rendering;
