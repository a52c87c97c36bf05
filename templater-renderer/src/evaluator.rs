//! `${name}` expression evaluator.
//!
//! # Grammar
//!
//! ```text
//! template   := ( literal | expression )*
//! expression := "${" ws* identifier ws* "}"
//! literal    := any text; a "$" not followed by "{" is literal
//! ```
//!
//! Substitution is a single textual pass. Substituted values are never
//! scanned again, so a value containing `${x}` is written out verbatim.

use templater_core::types::is_identifier;
use templater_core::{ParameterName, ParameterSet};

use crate::error::{Position, RenderError};

const OPEN: &str = "${";
const CLOSE: char = '}';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Expression { name: ParameterName, offset: usize },
}

/// A parsed template, ready to render against any [`ParameterSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Tokenize `text`. `name` identifies the template in error messages
    /// (a relative path for file contents, the file name for names).
    pub fn parse(name: impl Into<String>, text: impl Into<String>) -> Result<Self, RenderError> {
        let name = name.into();
        let source = text.into();
        let segments = tokenize(&name, &source)?;
        Ok(Template {
            name,
            source,
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names referenced by this template, in order of first appearance.
    pub fn parameters(&self) -> Vec<&ParameterName> {
        let mut seen: Vec<&ParameterName> = Vec::new();
        for segment in &self.segments {
            if let Segment::Expression { name, .. } = segment {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// Substitute every expression. Fails on the first undefined parameter;
    /// an undefined name is never replaced by an empty string.
    pub fn render(&self, params: &ParameterSet) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Expression { name, offset } => match params.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(RenderError::UndefinedParameter {
                            template: self.name.clone(),
                            name: name.clone(),
                            position: Position::locate(&self.source, *offset),
                        })
                    }
                },
            }
        }
        Ok(out)
    }
}

/// Parse and render `text` in one step, naming it `<inline>` in errors.
pub fn render(text: &str, params: &ParameterSet) -> Result<String, RenderError> {
    Template::parse("<inline>", text)?.render(params)
}

fn tokenize(name: &str, text: &str) -> Result<Vec<Segment>, RenderError> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(OPEN) {
        let start = cursor + found;
        if start > cursor {
            segments.push(Segment::Literal(text[cursor..start].to_string()));
        }

        let body_start = start + OPEN.len();
        let Some(body_len) = text[body_start..].find(CLOSE) else {
            return Err(RenderError::UnterminatedExpression {
                template: name.to_string(),
                position: Position::locate(text, start),
            });
        };
        let body = &text[body_start..body_start + body_len];
        let ident = body.trim();
        if !is_identifier(ident) {
            return Err(RenderError::InvalidExpression {
                template: name.to_string(),
                expression: body.to_string(),
                position: Position::locate(text, start),
            });
        }

        segments.push(Segment::Expression {
            name: ParameterName::from(ident),
            offset: start,
        });
        cursor = body_start + body_len + CLOSE.len_utf8();
    }

    if cursor < text.len() {
        segments.push(Segment::Literal(text[cursor..].to_string()));
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
