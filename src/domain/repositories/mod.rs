// src/domain/repositories/mod.rs
pub mod download_sink;
pub mod key_value_store;
pub mod remote_tag_repository;
