pub mod cell;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod graphics;
pub mod grid;
pub mod grid_file;
pub mod input;
pub mod level_export;
pub mod palette;
pub mod session;
