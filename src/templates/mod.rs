// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Template capability used by emitters to render record keys and values.
//!
//! Templates are text with embedded `{{ ... }}` blocks written in Rhai. Blocks
//! call into the shared generation state (counters, lists, reference rows) and
//! into the per-record [`RenderContext`] (record key, headers).
//!
//! ```
//! use std::sync::Arc;
//! use synthgen::state::GenerationState;
//! use synthgen::templates::{ExpressionTemplate, RenderContext};
//! use synthgen::traits::Template;
//!
//! let state = Arc::new(GenerationState::new());
//! let tpl = ExpressionTemplate::new(
//!     "user",
//!     r#"{"id": {{ key(counter("user", 1, 1)) }}}"#,
//!     state.clone(),
//! ).unwrap();
//!
//! let context = RenderContext::new(state, 0);
//! assert_eq!(tpl.execute_with(&context).unwrap(), r#"{"id": 1}"#);
//! assert_eq!(context.key().as_deref(), Some("1"));
//! ```

mod context;
mod expression;
pub mod functions;

pub use context::RenderContext;
pub use expression::ExpressionTemplate;
