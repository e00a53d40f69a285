// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rhai::{Dynamic, Engine, Scope, AST};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::TemplateError;
use crate::state::GenerationState;
use crate::templates::functions::{build_engine, ActiveContext};
use crate::templates::RenderContext;
use crate::traits::Template;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

enum Segment {
    Text(String),
    Expression { source: String, ast: AST },
}

/// Literal text interleaved with `{{ ... }}` Rhai blocks.
///
/// Blocks are compiled once at construction. Each render evaluates them in
/// order against one fresh scope, so a `let` in an earlier block is visible in
/// later ones. A block that evaluates to `()` renders as nothing.
///
/// The record context is published to the registered functions for the
/// duration of one render; renders of the same template are serialised.
pub struct ExpressionTemplate {
    name: String,
    segments: Vec<Segment>,
    engine: Engine,
    state: Arc<GenerationState>,
    active: ActiveContext,
    render_lock: Mutex<()>,
}

impl ExpressionTemplate {
    pub fn new(
        name: &str,
        source: &str,
        state: Arc<GenerationState>,
    ) -> Result<Self, TemplateError> {
        let active: ActiveContext = Arc::new(Mutex::new(None));
        let engine = build_engine(state.clone(), active.clone());
        let segments = parse_segments(name, source, &engine)?;

        Ok(Self {
            name: name.to_string(),
            segments,
            engine,
            state,
            active,
            render_lock: Mutex::new(()),
        })
    }

    pub fn from_file<P: AsRef<Path>>(
        name: &str,
        path: P,
        state: Arc<GenerationState>,
    ) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(name, &source, state)
    }

    fn render(&self, context: &RenderContext) -> Result<String, TemplateError> {
        let _render = self.render_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(context.clone());

        let result = self.evaluate(context);

        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = None;
        result
    }

    fn evaluate(&self, context: &RenderContext) -> Result<String, TemplateError> {
        let mut scope = Scope::new();
        scope.push_constant("iteration", context.iteration() as i64);

        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Expression { source, ast } => {
                    let value = self
                        .engine
                        .eval_ast_with_scope::<Dynamic>(&mut scope, ast)
                        .map_err(|e| TemplateError::Render {
                            template: self.name.clone(),
                            expression: source.clone(),
                            reason: e.to_string(),
                        })?;
                    if !value.is_unit() {
                        output.push_str(&value.to_string());
                    }
                }
            }
        }

        Ok(output)
    }
}

impl Template for ExpressionTemplate {
    fn execute(&self) -> Result<String, TemplateError> {
        self.render(&RenderContext::detached(self.state.clone()))
    }

    fn execute_with(&self, context: &RenderContext) -> Result<String, TemplateError> {
        self.render(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_segments(name: &str, source: &str, engine: &Engine) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }

        let body_start = start + OPEN.len();
        let Some(len) = rest[body_start..].find(CLOSE) else {
            return Err(TemplateError::Unterminated {
                template: name.to_string(),
                offset: offset + start,
            });
        };

        let expression = rest[body_start..body_start + len].trim().to_string();
        let ast = engine.compile(&expression).map_err(|e| TemplateError::Parse {
            template: name.to_string(),
            expression: expression.clone(),
            reason: e.to_string(),
        })?;
        segments.push(Segment::Expression {
            source: expression,
            ast,
        });

        let consumed = body_start + len + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }

    Ok(segments)
}
