// Service module exports

pub mod classifier;
pub mod grid;
pub mod hooks;
pub mod parser;
pub mod picker;
pub mod selection;
pub mod settings;
