pub mod analysis;
pub mod asset;
pub mod event;
pub mod holding;
pub mod locale;
pub mod portfolio;
pub mod quote;
pub mod settings;
