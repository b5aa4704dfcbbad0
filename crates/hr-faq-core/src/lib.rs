//! # HR FAQ Core
//!
//! Shared, I/O-free logic for HR FAQ Chat: data models, cosine similarity
//! and best-match selection, system prompt building, and the reply
//! post-processing applied by chat clients (sensitive-topic guard, link
//! sanitizer, canonical fact substitution).
//!
//! This crate contains no tokio, HTTP, or filesystem dependencies.

pub mod chat;
pub mod facts;
pub mod guard;
pub mod links;
pub mod models;
pub mod prompt;
pub mod similarity;
