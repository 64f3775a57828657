pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod ids;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
