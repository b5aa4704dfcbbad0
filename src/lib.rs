//! # HR FAQ Chat
//!
//! An HR assistant that answers from a curated FAQ list when a question is
//! close enough to a known one, and falls back to a hosted chat model
//! otherwise.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  POST /api/ask  ┌────────────┐   miss   ┌──────────────┐
//! │ Chat client│────────────────▶│ FaqMatcher │─────────▶│  Completion  │
//! │ guard/links│◀────────────────│ (embedding)│          │  fallback    │
//! └────────────┘ {answer,source} └────────────┘          └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hrchat check                 # validate settings and data files
//! hrchat serve                 # start the HTTP API
//! hrchat ask "Staj var mı?"    # answer one question locally
//! hrchat chat                  # terminal chat against a running server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML settings |
//! | [`data`] | JSON brand config and FAQ list |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`matcher`] | FAQ matching by cosine similarity |
//! | [`completion`] | Hosted chat-completion fallback |
//! | [`ask`] | Answer pipeline |
//! | [`server`] | HTTP API |
//! | [`client`] | Terminal chat client |
//! | [`logging`] | Log output setup |

pub mod ask;
pub mod client;
pub mod completion;
pub mod config;
pub mod data;
pub mod embedding;
pub mod logging;
pub mod matcher;
pub mod server;
