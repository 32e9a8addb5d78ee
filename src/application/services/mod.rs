// src/application/services/mod.rs
pub mod admin_gate;
pub mod collection_catalog;
pub mod logo_catalog;
pub mod quiz_service;
pub mod server_status;
pub mod tag_editor;
pub mod tag_query;
pub mod tag_store;
pub mod tag_transfer;
pub mod team_directory;
pub mod validation;
