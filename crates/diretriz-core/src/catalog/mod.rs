// ABOUTME: Read-only reference catalogs used by rule validation and the calculators
// ABOUTME: Tag vocabulary, skinfold protocols, and the RIR reference matrix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Skinfold protocol catalog
pub mod protocols;
/// RIR to %1RM reference table
pub mod rir;
/// Canonical tag vocabulary
pub mod tags;

pub use protocols::ProtocolCatalog;
pub use tags::{TagCatalog, TagCategory, TagDefinition, TagKind};
