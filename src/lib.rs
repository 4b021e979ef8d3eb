pub mod admin;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod flashcards;
pub mod memory;
pub mod practice;
pub mod state;
pub mod store;
pub mod types;
pub mod users;
