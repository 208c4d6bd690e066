pub mod bridge;
pub mod config;
pub mod consts;
pub mod editor;
pub mod error;
pub mod file_types;
pub mod geometry;
pub mod history;
pub mod image;
pub mod otsu;
pub mod render;
pub mod service;
pub mod state;
pub mod tools;
pub mod viewport;
