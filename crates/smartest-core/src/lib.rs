//! smartest-core — answer evaluation engine, topic catalog, and grading.
//!
//! The engine scores a free-text candidate answer against a reference answer
//! without any semantic model: it normalizes both, classifies the reference
//! into an answer shape, and blends a shape-specific key-element score with
//! whole-text similarity.
//!
//! ```
//! use smartest_core::evaluate;
//!
//! let report = evaluate("Există 92 de soluții", "There are 92 solutions", None).unwrap();
//! assert!(report.score >= 80);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod feedback;
pub mod grading;
pub mod normalize;
pub mod scorer;
pub mod sheet;
pub mod similarity;
pub mod topic;

pub use classify::{classify, AnswerShape};
pub use config::{load_config, load_config_from, ScoringConfig, SmartestConfig};
pub use error::{EvalError, EvalResult};
pub use grading::{grade_sheet, GradeReport, RegradeDiff};
pub use normalize::normalize;
pub use scorer::{evaluate, PartialMatch, ScoreReport, Scorer};
pub use topic::{KeywordCatalog, Topic};
