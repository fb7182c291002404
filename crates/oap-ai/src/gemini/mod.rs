//! Google Gemini API client.
//!
//! Implements the `GenerationClient` trait for Gemini models via the
//! Generative Language API, including function calling.

mod api;
mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use config::GeminiConfig;
