// src/infrastructure/mod.rs
pub mod clipboard;
pub mod di;
pub mod download;
pub mod error;
pub mod http;
pub mod json;
pub mod manifest;
pub mod storage;
