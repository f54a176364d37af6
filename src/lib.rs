pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod session;
pub mod views;
