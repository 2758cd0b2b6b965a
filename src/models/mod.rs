//! Database models

pub mod filament;

pub use filament::Filament;
