// src/application/mod.rs
pub mod error;
pub mod services;

pub use services::admin_gate::AdminGate;
pub use services::collection_catalog::CollectionCatalog;
pub use services::logo_catalog::LogoCatalog;
pub use services::quiz_service::QuizService;
pub use services::server_status::ServerStatus;
pub use services::tag_editor::TagEditor;
pub use services::tag_query::TagQuery;
pub use services::tag_store::TagStore;
pub use services::team_directory::TeamDirectory;
