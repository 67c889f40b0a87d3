// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for rule validation, aerobic defaults, and body composition equations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large namespace.

/// Body composition equation constants
pub mod anthropometry;

/// Service identification
pub mod service_names {
    /// Service name used in structured logs
    pub const DIRETRIZ_SERVER: &str = "diretriz-server";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// HTTP header names
pub mod headers {
    /// Opaque tenant identifier supplied by the upstream gateway
    pub const TENANT_ID: &str = "x-tenant-id";
    /// Preview processing time header
    pub const QUERY_TIME: &str = "x-query-time";
}

/// Rule authoring limits enforced at save time
pub mod limits {
    /// Maximum contraindications per rule
    pub const MAX_CONTRAINDICACOES: usize = 10;
    /// Maximum general observations per rule
    pub const MAX_OBSERVACOES: usize = 15;
    /// Maximum characters for a single list entry
    pub const MAX_TEXT_LEN: usize = 300;
    /// Maximum characters for the flexibility focus
    pub const MAX_FOCUS_LEN: usize = 500;
}

/// RIR reference matrix domain (inclusive)
pub mod rir_domain {
    /// Lowest RIR level in the matrix
    pub const RIR_MIN: u8 = 5;
    /// Highest RIR level in the matrix
    pub const RIR_MAX: u8 = 10;
    /// Lowest repetition count in the matrix
    pub const REPS_MIN: u8 = 1;
    /// Highest repetition count in the matrix
    pub const REPS_MAX: u8 = 20;
}

/// Readiness questionnaire scale (inclusive)
pub mod readiness {
    /// Lowest readiness score
    pub const MIN_SCORE: u8 = 1;
    /// Highest readiness score
    pub const MAX_SCORE: u8 = 5;
}

/// Default intensity bands per aerobic method, used when no rule sets one
pub mod aerobic_defaults {
    /// Heart-rate reserve, percent
    pub const FCR_BAND: (f64, f64) = (40.0, 60.0);
    /// Borg perceived exertion scale
    pub const PSE_BAND: (f64, f64) = (11.0, 13.0);
    /// Percent of velocity at `VO2max`
    pub const VVO2MAX_BAND: (f64, f64) = (70.0, 80.0);
    /// Percent of the lactate threshold
    pub const MFEL_BAND: (f64, f64) = (60.0, 70.0);
    /// Observation added when the student uses beta blockers
    pub const BETA_BLOCKER_NOTE: &str = "Priorizar PSE devido ao uso de betabloqueador";
}

/// Canonical tag names for facts derived by the engine rather than answered
pub mod derived_tags {
    /// Student age in years
    pub const IDADE: &str = "idade";
    /// Readiness score for exercise (1..5)
    pub const READINESS_EXERCICIO: &str = "readiness_exercicio";
    /// Body density (g/ml)
    pub const DENSIDADE_CORPORAL: &str = "densidade_corporal";
    /// Body fat percentage
    pub const PCT_GORDURA: &str = "pct_gordura";
    /// Fat mass in kg
    pub const MASSA_GORDA_KG: &str = "massa_gorda_kg";
    /// Lean mass in kg
    pub const MASSA_MAGRA_KG: &str = "massa_magra_kg";
    /// Beta blocker usage flag
    pub const BETABLOQUEADOR: &str = "betabloqueador";

    /// Tags only available when the anthropometric snapshot was computed
    pub const ANTHROPOMETRIC: [&str; 4] =
        [DENSIDADE_CORPORAL, PCT_GORDURA, MASSA_GORDA_KG, MASSA_MAGRA_KG];
}
