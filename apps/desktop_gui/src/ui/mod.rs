//! UI layer: the presentation surface and its layout math.

pub mod app;
pub mod layout;

pub use app::{MorphApp, PersistedSurfaceSettings, StartupConfig, SETTINGS_STORAGE_KEY};
