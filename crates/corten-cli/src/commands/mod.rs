pub mod cache;
pub mod config;
pub mod debug;
pub mod dotenv;
pub mod jwt;
pub mod maintenance;
pub mod web_dir;
