// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Functions available inside `{{ ... }}` blocks.
//!
//! ## Shared state
//! - `counter(name, start, step)` - named counter, `start` on first use then `+ step`
//! - `add_v_to_list(name, v)` / `random_v_from_list(name)` / `get_v_from_list_at_index(name, i)`
//! - `random_n_v_from_list(name, n)` - array of up to `n` values from distinct positions
//! - `get_v(key)` / `set_v(key, v)` - last-writer-wins context values
//! - `from_csv(column)` - column of the reference row for this record
//!
//! ## Record
//! - `key(v)` - sets the record key, returns `v`
//! - `header(name, v)` - sets a record header
//!
//! ## Utilities
//! - `random_bool()`, `yes_or_no()`, `uuid()`
//! - `inject(probability, injected, original)` - `injected` with the given probability

use rand::Rng;
use rhai::{Array, Dynamic, Engine};
use std::sync::{Arc, Mutex, PoisonError};

use crate::state::GenerationState;
use crate::templates::RenderContext;

/// Render context of the record currently being evaluated, if any.
pub type ActiveContext = Arc<Mutex<Option<RenderContext>>>;

fn with_active<T>(active: &ActiveContext, f: impl FnOnce(&RenderContext) -> T) -> Option<T> {
    active
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(f)
}

/// Build an engine with safety limits and every template function registered.
pub fn build_engine(state: Arc<GenerationState>, active: ActiveContext) -> Engine {
    let mut engine = Engine::new();

    engine.set_max_expr_depths(64, 64);
    engine.set_max_call_levels(32);
    engine.set_max_operations(100_000);
    engine.set_max_string_size(1_000_000);
    engine.set_max_array_size(10_000);
    engine.set_max_map_size(10_000);

    register_state_functions(&mut engine, state);
    register_record_functions(&mut engine, active);
    register_utilities(&mut engine);

    engine
}

fn register_state_functions(engine: &mut Engine, state: Arc<GenerationState>) {
    {
        let st = state.clone();
        engine.register_fn("counter", move |name: &str, start: i64, step: i64| -> i64 {
            st.counter(name, start, step)
        });
    }
    {
        let st = state.clone();
        engine.register_fn("add_v_to_list", move |name: &str, value: Dynamic| {
            st.add_value_to_list(name, value.to_string());
        });
    }
    {
        let st = state.clone();
        engine.register_fn("random_v_from_list", move |name: &str| -> String {
            st.random_value_from_list(name).unwrap_or_default()
        });
    }
    {
        let st = state.clone();
        engine.register_fn(
            "get_v_from_list_at_index",
            move |name: &str, index: i64| -> String {
                usize::try_from(index)
                    .ok()
                    .and_then(|i| st.value_from_list_at(name, i))
                    .unwrap_or_default()
            },
        );
    }
    {
        let st = state.clone();
        engine.register_fn("random_n_v_from_list", move |name: &str, n: i64| -> Array {
            st.random_n_values_from_list(name, n.max(0) as usize)
                .into_iter()
                .map(Dynamic::from)
                .collect()
        });
    }
    {
        let st = state.clone();
        engine.register_fn("get_v", move |key: &str| -> String {
            st.value(key).unwrap_or_default()
        });
    }
    {
        let st = state.clone();
        engine.register_fn("set_v", move |key: &str, value: Dynamic| {
            st.set_value(key, value.to_string());
        });
    }
}

fn register_record_functions(engine: &mut Engine, active: ActiveContext) {
    {
        let ctx = active.clone();
        engine.register_fn("key", move |value: Dynamic| -> Dynamic {
            with_active(&ctx, |c| c.set_key(value.to_string()));
            value
        });
    }
    {
        let ctx = active.clone();
        engine.register_fn("header", move |name: &str, value: Dynamic| {
            with_active(&ctx, |c| c.set_header(name, value.to_string()));
        });
    }
    {
        let ctx = active.clone();
        engine.register_fn("from_csv", move |column: &str| -> String {
            with_active(&ctx, |c| c.from_reference_row(column))
                .flatten()
                .unwrap_or_default()
        });
    }
}

fn register_utilities(engine: &mut Engine) {
    engine.register_fn("random_bool", || -> bool { rand::rng().random_bool(0.5) });
    engine.register_fn("yes_or_no", || -> String {
        if rand::rng().random_bool(0.5) {
            "yes".to_string()
        } else {
            "no".to_string()
        }
    });
    engine.register_fn(
        "inject",
        |probability: f64, injected: Dynamic, original: Dynamic| -> Dynamic {
            if rand::rng().random::<f64>() < probability {
                injected
            } else {
                original
            }
        },
    );
    engine.register_fn("uuid", || -> String { uuid::Uuid::new_v4().to_string() });
}
