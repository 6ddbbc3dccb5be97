//! # Program Relay
//!
//! A small backend between a web front-end and the Gemini `generateContent`
//! API. Queries are optionally grounded in the text of the most recently
//! uploaded PDF.
//!
//! ## Architecture
//!
//! ```text
//! upload ──▶ extract ──▶ DocumentStore
//!                             │
//! query ──▶ chunk ──▶ retrieval ──▶ prompt ──▶ upstream ──▶ answer
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and API key lookup |
//! | [`models`] | Chunk types |
//! | [`chunk`] | Line-aligned text chunking |
//! | [`retrieval`] | Token-overlap context selection |
//! | [`prompt`] | Prompt construction and query validation |
//! | [`upstream`] | Completion backend trait and Gemini client |
//! | [`redact`] | Secret scrubbing for logs and errors |
//! | [`store`] | Single-slot document store |
//! | [`extract`] | PDF text extraction |
//! | [`server`] | HTTP server |
//! | [`commands`] | One-shot CLI commands |
//! | [`error`] | Request error taxonomy |

pub mod chunk;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod redact;
pub mod retrieval;
pub mod server;
pub mod store;
pub mod text_util;
pub mod upstream;
