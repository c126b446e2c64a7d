//! Ollama inference runtime adapter

mod client;
mod protocol;

pub use client::OllamaClient;
