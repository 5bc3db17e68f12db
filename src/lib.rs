pub mod app;
pub mod canvas;
pub mod circuits;
pub mod config;
pub mod events;
pub mod paint;
pub mod save;
pub mod sink;
pub mod theme;
pub mod workbench;

pub const APP_NAME: &str = "Circuit Simulator Helmet";
