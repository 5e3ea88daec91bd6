//! appraise-core: concurrent evaluation engine for AI features.
//!
//! A suite of independent test cases is fanned out into concurrent case
//! pipelines (feature stage, two concurrent check stages, finalize stage)
//! under per-case deadlines; completed cases become immutable scored rows,
//! failures branch on strict mode, and the supervisor aggregates both into a
//! run verdict. Stage executors, row building, progress rendering and result
//! publishing are capability traits injected through a [`harness::Harness`].

pub mod config;
pub mod engine;
pub mod errors;
pub mod harness;
pub mod model;
pub mod progress;
pub mod report;
