// Domain layer - navigation values and pure rules
pub mod catalog;
pub mod error;
pub mod hash;
pub mod keyboard;
pub mod view;
