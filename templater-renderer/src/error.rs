//! Error types for templater-renderer.

use std::fmt;

use thiserror::Error;

use templater_core::ParameterName;

/// 1-based line/column of an expression inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of byte `offset` within `text`.
    pub fn locate(text: &str, offset: usize) -> Self {
        let before = &text[..offset.min(text.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// All errors that can arise from template evaluation and output naming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `${` without a closing `}`.
    #[error("{template}:{position}: unterminated expression, expected '}}'")]
    UnterminatedExpression { template: String, position: Position },

    /// Expression body is not a plain identifier.
    #[error("{template}:{position}: invalid expression '${{{expression}}}', only ${{name}} is supported")]
    InvalidExpression {
        template: String,
        expression: String,
        position: Position,
    },

    /// Expression references a key absent from the parameter set.
    #[error("{template}:{position}: undefined parameter '{name}'")]
    UndefinedParameter {
        template: String,
        name: ParameterName,
        position: Position,
    },

    /// File name handed to output naming lacks the marker suffix.
    #[error("'{name}' does not end with the marker suffix '{suffix}'")]
    NotAMarker { name: String, suffix: String },

    /// Rendered file name is empty, `.`/`..`, contains a separator, or still ends
    /// with the marker suffix.
    #[error("'{template}' renders to invalid file name '{name}'")]
    InvalidOutputName { template: String, name: String },
}
