// ABOUTME: Re-export of the unified error types for the server crate
// ABOUTME: AppError, ErrorCode, and the engine taxonomy live in diretriz-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The error types are defined in `diretriz-core` so the engine and the server
//! share one vocabulary. The core crate is built with the `http-response`
//! feature here, which makes [`AppError`] an axum response.

pub use diretriz_core::errors::{
    AppError, AppResult, EngineError, ErrorCode, ErrorContext, ErrorResponse,
    ErrorResponseDetails,
};
