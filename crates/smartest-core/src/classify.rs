//! Reference answer classification.
//!
//! The shape of the *reference* answer alone decides which scoring rule
//! applies; the candidate's shape is never consulted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::{
    extract_standalone_number, extract_structured_data, extract_yes_no, is_primarily_numeric,
    StructuredKind,
};

/// The expected answer format of a reference answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape", content = "kind")]
pub enum AnswerShape {
    /// A list or tuple value.
    Structured(StructuredKind),
    /// A single number.
    Numeric,
    /// A yes/no judgment backed by a number, e.g. "Nu. Necesită minim 4 culori".
    YesNoWithNumber,
    /// Free prose.
    Textual,
}

impl fmt::Display for AnswerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerShape::Structured(StructuredKind::List) => write!(f, "structured-list"),
            AnswerShape::Structured(StructuredKind::Tuple) => write!(f, "structured-tuple"),
            AnswerShape::Numeric => write!(f, "numeric"),
            AnswerShape::YesNoWithNumber => write!(f, "yes-no-with-number"),
            AnswerShape::Textual => write!(f, "textual"),
        }
    }
}

/// Classify a normalized reference answer.
///
/// Priority: yes/no with a number, then any structured span, then a
/// primarily numeric answer, else free text.
pub fn classify(reference: &str) -> AnswerShape {
    let number = extract_standalone_number(reference);

    if extract_yes_no(reference).is_some() && number.is_some() {
        return AnswerShape::YesNoWithNumber;
    }
    if let Some(span) = extract_structured_data(reference) {
        return AnswerShape::Structured(span.kind);
    }
    if number.is_some() && is_primarily_numeric(reference) {
        return AnswerShape::Numeric;
    }
    AnswerShape::Textual
}
