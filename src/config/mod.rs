// ABOUTME: Configuration management module for the guidelines server
// ABOUTME: Environment-driven server settings; engine settings live in diretriz-engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Diretriz server
//!
//! - **Environment**: Server configuration from environment variables
//!
//! Engine tuning (anthropometric fallbacks, rule limits, preview defaults) is
//! loaded by `diretriz_engine::config::EngineConfig`.

/// Environment and server configuration
pub mod environment;
