pub mod app;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod serialize;
pub mod services;
