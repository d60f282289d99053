pub mod logging;

#[cfg(feature = "settings")]
pub mod settings;
