pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod posts;
pub mod service;
pub mod storage;
pub mod utils;
