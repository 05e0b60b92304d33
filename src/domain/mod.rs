pub mod email;
pub mod settings;
