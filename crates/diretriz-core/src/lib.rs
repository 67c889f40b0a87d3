// ABOUTME: Core types and constants for the Diretriz training guidelines platform
// ABOUTME: Foundation crate with error handling, guideline models, reference catalogs, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Diretriz Core
//!
//! Foundation crate providing the shared vocabulary of the training guidelines
//! engine. Everything here is plain data: the engine crate evaluates it and the
//! server crate stores and serves it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the engine taxonomy
//! - **constants**: Limits, default aerobic bands, and anthropometric equation constants
//! - **models**: Ranges, conditions, outputs, rules, versions, protocols, RIR matrix
//! - **catalog**: Canonical tag vocabulary and built-in reference catalogs

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Guideline domain models (rules, versions, outputs, protocols)
pub mod models;

/// Read-only reference catalogs (tags, anthropometric protocols, RIR matrix)
pub mod catalog;
