//! Terminal output for one-shot runs

pub mod console;
