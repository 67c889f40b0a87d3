// ABOUTME: Main library entry point for the Diretriz training guidelines service
// ABOUTME: Guideline store, preview orchestration, HTTP routes, configuration, and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Diretriz Server
//!
//! HTTP service around the training guidelines rule engine. Trainers author
//! versioned sets of clinical rules; a preview evaluates one version against a
//! student's anamnesis answers, measurements, and readiness, and returns a single
//! combined prescription together with a decision trace.
//!
//! ## Architecture
//!
//! - **store**: Versions and rules behind the [`store::GuidelineStore`] trait, with
//!   the DRAFT-only write guard
//! - **preview**: Fact set construction, selection, merge, and response assembly
//! - **routes**: axum handlers for versions, rules, preview, and reference catalogs
//! - **config**: Environment-based server configuration
//! - **logging**: `tracing-subscriber` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use diretriz_server::config::environment::ServerConfig;
//! use diretriz_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Diretriz server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Server configuration loaded from the environment
pub mod config;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Preview orchestration
pub mod preview;

/// HTTP routes
pub mod routes;

/// Guideline version and rule storage
pub mod store;
