// Utility functions module

pub mod database;
pub mod keygen;
pub mod schema;
pub mod settings;
