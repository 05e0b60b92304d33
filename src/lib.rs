pub mod config;
pub mod daemon;
pub mod domain;
pub mod mail;
pub mod platform;
pub mod rules;
pub mod sound;
pub mod store;
