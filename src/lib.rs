pub mod academics;
pub mod api_docs;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod entities;
pub mod extractor;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
