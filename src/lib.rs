// src/lib.rs
#![crate_type = "lib"]
#![crate_name = "gflogos"]

// Core modules
pub mod application;
pub mod domain;
pub mod infrastructure;

// Binary surface
pub mod cli;
pub mod config;
pub mod exitcode;
pub mod server;
pub mod util;
