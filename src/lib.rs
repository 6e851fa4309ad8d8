pub mod apis;
pub mod arguments;
pub mod config;
pub mod errors; // Typed errors for fetch, decode and persist failures
pub mod format;
pub mod index;
pub mod logger;
pub mod paths;
pub mod selection;
