//! Truffle — a desktop chat client for locally-hosted language models.
//!
//! The interesting part lives in [`session`]: the orchestrator that turns a
//! raw composer submission into search/extraction traffic, a streamed model
//! reply, and an append-only conversation log. [`ai`] and [`research`] are
//! the gateway implementations it drives; [`ui`] and [`views`] are the
//! Dioxus shell around it.

pub mod ai;
pub mod config;
pub mod models;
pub mod research;
pub mod session;
pub mod theme;
pub mod types;
pub mod ui;
pub mod views;
