//! Configuration system
//!
//! - `macros` - the `config_struct!` macro (structs with embedded defaults)
//! - `schemas` - every configuration section
//! - `utils` - loading, saving and thread-safe access

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{ApiConfig, Config, GeneralConfig, IndexConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path, parse_config,
    save_config, update_config_section, with_config,
};
