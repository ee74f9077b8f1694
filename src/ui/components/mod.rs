pub mod dashboard;
pub mod empty_state;
pub mod file_actions;
pub mod import_detail;
pub mod imports;
pub mod imports_table;
pub mod loading;
pub mod navbar;
pub mod new_import;
pub mod status_badge;

pub use dashboard::Dashboard;
pub use empty_state::EmptyState;
pub use import_detail::ImportDetail;
pub use imports::Imports;
pub use imports_table::ImportsTable;
pub use loading::Loading;
pub use navbar::Navbar;
pub use new_import::NewImport;
pub use status_badge::StatusBadge;
