pub mod repo;
pub mod settings_file;
pub mod sqlite;
