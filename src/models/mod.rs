// Module exports for models

pub mod calendar_cell;
pub mod calendar_month;
pub mod culture;
pub mod date_format;
pub mod date_range;
pub mod settings;
