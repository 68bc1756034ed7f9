//! # Study Scout
//!
//! A terminal client for a study-material processing pipeline.
//!
//! Study Scout uploads study material (notes, PDFs, links) to an external
//! backend, watches it move through concept extraction and video matching,
//! and browses the results: extracted concepts per material and recommended
//! video segments per concept. All heavy processing lives in the backend;
//! this crate owns the client session — keeping three nested selections
//! (material → concept → match) consistent as collections arrive
//! asynchronously — and the advisory engine that recommends which pipeline
//! worker to recruit next.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐
//! │ Backend  │──▶│ Normalize │──▶│  Session  │──▶│ Advisory │
//! │ HTTP API │   │ (wire →   │   │ (reducer  │   │ (signals │
//! │ + sample │   │  models)  │   │  + state) │   │ → rules) │
//! └──────────┘   └───────────┘   └─────┬─────┘   └────┬─────┘
//!                                      │              │
//!                                      ▼              ▼
//!                                 ┌─────────────────────┐
//!                                 │     CLI (scout)     │
//!                                 └─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scout materials                      # list materials
//! scout concepts 501                   # list a material's concepts
//! scout upload --title "Calc Notes" --file notes.pdf
//! scout advise                         # which worker to recruit next
//! scout watch                          # interactive session
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`sample`] | Deterministic offline fallback dataset |
//! | [`normalize`] | Wire-record deserialization and normalization |
//! | [`api`] | Backend HTTP client |
//! | [`session`] | Selection synchronizer (reducer + state) |
//! | [`advisory`] | Advisory engine |
//! | [`watch`] | Interactive session loop |

pub mod advise;
pub mod advisory;
pub mod api;
pub mod concepts;
pub mod config;
pub mod materials;
pub mod models;
pub mod normalize;
pub mod sample;
pub mod session;
pub mod upload;
pub mod watch;
