//! Web search adapters

mod brave;

pub use brave::BraveSearch;
