// src/domain/mod.rs
pub mod collection;
pub mod error;
pub mod logo;
pub mod pending;
pub mod quiz;
pub mod repositories;
pub mod services;
pub mod tag;
pub mod tag_data;
pub mod team_info;
