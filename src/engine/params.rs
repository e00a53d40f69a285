// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::config::consts::EMITTER_NAME_PARAM;

/// Build the parameter map handed to the backend for one record.
///
/// Applied in order, later sources winning:
/// 1. the emitter's static `config_parameters`
/// 2. `emitter.name`
/// 3. external parameters: a plain `key` applies to every emitter, while
///    `<name>.<key>` applies as `<key>` only to the emitter called `<name>`
pub fn merge_parameters(
    emitter: &str,
    static_params: &HashMap<String, String>,
    external: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = static_params.clone();
    merged.insert(EMITTER_NAME_PARAM.to_string(), emitter.to_string());

    for (key, value) in external {
        match key.split_once('.') {
            None => {
                merged.insert(key.clone(), value.clone());
            }
            Some((prefix, rest)) if prefix == emitter => {
                merged.insert(rest.to_string(), value.clone());
            }
            Some(_) => {}
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_parameters_table_driven() {
        struct TestCase {
            name: &'static str,
            static_params: HashMap<String, String>,
            external: HashMap<String, String>,
            expected: HashMap<String, String>,
        }

        let test_cases = vec![
            TestCase {
                name: "only emitter name",
                static_params: map(&[]),
                external: map(&[]),
                expected: map(&[("emitter.name", "users")]),
            },
            TestCase {
                name: "static parameters kept",
                static_params: map(&[("topic", "users")]),
                external: map(&[]),
                expected: map(&[("topic", "users"), ("emitter.name", "users")]),
            },
            TestCase {
                name: "unprefixed external applies and overrides static",
                static_params: map(&[("topic", "users")]),
                external: map(&[("topic", "override"), ("acks", "all")]),
                expected: map(&[
                    ("topic", "override"),
                    ("acks", "all"),
                    ("emitter.name", "users"),
                ]),
            },
            TestCase {
                name: "prefixed external applies only to matching emitter",
                static_params: map(&[]),
                external: map(&[("users.topic", "u"), ("orders.topic", "o")]),
                expected: map(&[("topic", "u"), ("emitter.name", "users")]),
            },
            TestCase {
                name: "prefix is stripped once, the rest keeps its dots",
                static_params: map(&[]),
                external: map(&[("users.sasl.mechanism", "PLAIN")]),
                expected: map(&[("sasl.mechanism", "PLAIN"), ("emitter.name", "users")]),
            },
        ];

        for case in test_cases {
            let merged = merge_parameters("users", &case.static_params, &case.external);
            assert_eq!(merged, case.expected, "case: {}", case.name);
        }
    }
}
