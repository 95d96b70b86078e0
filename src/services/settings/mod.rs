mod persistence;
mod service;

pub use persistence::{default_config_path, load_registry, save_registry};
pub use service::ConfigRegistry;
