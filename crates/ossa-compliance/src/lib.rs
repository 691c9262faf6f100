//! # ossa-compliance: Dual-Format Compliance Pipeline
//!
//! Validates an OSSA agent manifest together with its OpenAPI description
//! and reduces the findings into a scored, certified [`ComplianceReport`].
//!
//! ## Stages
//!
//! | Stage | Module | Weights (error, warning) |
//! |---|---|---|
//! | Structural | [`structural`] | 10, 2 |
//! | Cross-format | [`cross_format`] | 20, 5 |
//! | Security | [`security`] | 25, 8 |
//! | Best practices (strict only) | [`best_practices`] | 10, 3 |
//! | Frameworks | [`frameworks`] | per framework |
//!
//! Stages have no data dependency on each other. Each returns an immutable
//! `StageResult`; [`report::generate`] composes them.
//!
//! ## Architecture
//!
//! ```text
//! ossa-schema (structure)  -->  ossa-compliance (stages)  -->  ComplianceReport
//!   SchemaValidator               ComplianceEngine                certification tier
//!   load_document                 FrameworkRegistry               recommendations
//! ```

pub mod batch;
pub mod best_practices;
pub mod cross_format;
pub mod document;
pub mod engine;
pub mod error;
pub mod frameworks;
pub mod report;
pub mod security;
pub mod structural;

pub use batch::{BatchEntry, BatchItem, BatchOutcome, BatchSummary};
pub use document::{ApiView, ManifestView};
pub use engine::{validate_dual_format, ComplianceEngine, ValidationOptions};
pub use error::{EngineError, FrameworkFault};
pub use frameworks::{BuiltinEvaluator, FrameworkEvaluator, FrameworkRegistry};
pub use report::ComplianceReport;
