pub mod app_settings;
pub mod persistence;
pub mod selection;
pub mod slot_key;

pub use app_settings::AppSettings;
pub use selection::Selection;
pub use slot_key::SlotKey;
