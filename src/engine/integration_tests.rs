// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::backends::stub::{CountingFactory, PanickingProducer};
use crate::backends::{BackendFactory, DefaultBackendFactory};
use crate::config::{BackendKind, EmitterConfig, OutputConfig};
use crate::engine::{EmitterState, Scheduler};
use crate::errors::{BackendError, SchedulerError};
use crate::state::{GenerationState, ReferenceRow};
use crate::traits::Producer;

/// End-to-end scheduler runs against recording backends.
#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(factory: Arc<CountingFactory>) -> (Scheduler, Arc<GenerationState>) {
        let state = Arc::new(GenerationState::new());
        (Scheduler::new(state.clone(), factory), state)
    }

    #[tokio::test]
    async fn test_run_once_records_every_value() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, state) = scheduler(factory.clone());
        let emitters = vec![EmitterConfig::inline(
            "users",
            "user-{{ counter(\"id\", 1, 1) }}",
            "sink",
        )
        .with_tick(None, 3)];

        let summary = scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        let records = factory.records();
        assert_eq!(records.len(), 3);
        let expected_bytes: u64 = records.iter().map(|r| r.value.len() as u64).sum();

        assert_eq!(summary.objects, 3);
        assert_eq!(summary.bytes, expected_bytes);
        assert_eq!(summary.emitters, 1);
        assert_eq!(state.stats().objects(), 3);
        assert_eq!(state.stats().bytes(), expected_bytes);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_periodic_emitter() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let emitters = vec![EmitterConfig::inline("ticker", "tick", "sink")
            .with_tick(Some(Duration::from_millis(50)), 1)];

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            let cancelled_at = std::time::Instant::now();
            trigger.cancel();
            cancelled_at
        });

        let summary = tokio::time::timeout(Duration::from_secs(2), scheduler.run(&emitters, cancel))
            .await
            .expect("scheduler did not return after cancellation")
            .unwrap();
        let cancelled_at = canceller.await.unwrap();

        let records = factory.records();
        assert!(!records.is_empty());
        assert!(records.len() <= 3);
        assert!(records.iter().all(|r| r.at < cancelled_at));
        assert_eq!(summary.objects, records.len() as u64);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test]
    async fn test_shared_output_is_constructed_and_closed_once() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let emitters = vec![
            EmitterConfig::inline("users", "u", "sink"),
            EmitterConfig::inline("orders", "o", "sink"),
        ];

        let summary = scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.objects, 2);
        assert_eq!(factory.constructed(), 1);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test]
    async fn test_output_override_routes_every_emitter() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let scheduler = scheduler.with_output_override(Some("sink".to_string()));
        let emitters = vec![
            EmitterConfig::inline("users", "u", "first"),
            EmitterConfig::inline("orders", "o", "second"),
        ];

        scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(factory.constructed(), 1);
        assert!(factory.records().iter().all(|r| r.output == "sink"));
    }

    #[tokio::test]
    async fn test_external_parameters_respect_emitter_prefix() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let scheduler = scheduler.with_external_params(HashMap::from([
            ("users.topic".to_string(), "user-topic".to_string()),
            ("acks".to_string(), "all".to_string()),
        ]));
        let emitters = vec![
            EmitterConfig::inline("users", "u", "sink").with_parameter("topic", "default"),
            EmitterConfig::inline("orders", "o", "sink").with_parameter("topic", "default"),
        ];

        scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        let records = factory.records();
        let params_for = |value: &str| {
            records
                .iter()
                .find(|r| r.value == value)
                .map(|r| r.request.params.clone())
                .unwrap()
        };

        let users = params_for("u");
        assert_eq!(users["topic"], "user-topic");
        assert_eq!(users["acks"], "all");
        assert_eq!(users["emitter.name"], "users");

        let orders = params_for("o");
        assert_eq!(orders["topic"], "default");
        assert_eq!(orders["acks"], "all");
        assert_eq!(orders["emitter.name"], "orders");
    }

    #[tokio::test]
    async fn test_construction_failure_closes_earlier_backends() {
        let factory = Arc::new(CountingFactory::failing_for("second"));
        let (scheduler, _) = scheduler(factory.clone());
        let emitters = vec![
            EmitterConfig::inline("users", "u", "first"),
            EmitterConfig::inline("orders", "o", "second"),
        ];

        let result = scheduler.run(&emitters, CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(SchedulerError::Backend(BackendError::Configuration { .. }))
        ));
        assert_eq!(factory.constructed(), 1);
        assert_eq!(factory.closed(), 1);
        assert!(factory.records().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_template_aborts_before_any_backend() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let emitters = vec![EmitterConfig::inline("users", "{{ counter(", "sink")];

        let result = scheduler.run(&emitters, CancellationToken::new()).await;

        assert!(matches!(result, Err(SchedulerError::Template { ref emitter, .. }) if emitter == "users"));
        assert_eq!(factory.constructed(), 0);
    }

    #[tokio::test]
    async fn test_produce_failure_does_not_stop_emitter() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, state) = scheduler(factory.clone());
        let emitters = vec![EmitterConfig::inline(
            "flaky",
            "{{ if counter(\"n\", 0, 1) == 0 { \"fail\" } else { \"ok\" } }}",
            "sink",
        )
        .with_tick(None, 3)];

        let summary = scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.objects, 2);
        assert_eq!(factory.records().len(), 2);
        assert_eq!(state.stats().current_iteration(), 2);
    }

    #[tokio::test]
    async fn test_stop_handle_stops_one_emitter() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, _) = scheduler(factory.clone());
        let emitters = vec![
            EmitterConfig::inline("fast", "f", "sink").with_tick(Some(Duration::from_millis(10)), 1),
            EmitterConfig::inline("once", "o", "sink"),
        ];

        let prepared = scheduler.prepare(&emitters).await.unwrap();
        let handles = prepared.handles();
        assert!(handles.iter().all(|h| h.state() == EmitterState::Idle));

        let run = tokio::spawn(prepared.run(CancellationToken::new()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handles[0].stop();

        let summary = tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .unwrap()
            .unwrap();

        assert!(summary.objects >= 2);
        assert!(handles.iter().all(|h| h.state() == EmitterState::Stopped));
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test]
    async fn test_reference_rows_follow_iteration() {
        let factory = Arc::new(CountingFactory::new());
        let (scheduler, state) = scheduler(factory.clone());
        state.load_reference_rows(
            ["Oslo", "Lima", "Pune"]
                .iter()
                .map(|city| ReferenceRow::from([("city".to_string(), city.to_string())]))
                .collect(),
        );
        let emitters = vec![EmitterConfig::inline("cities", "{{ from_csv(\"city\") }}", "sink")
            .with_tick(None, 4)];

        scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        let values: Vec<_> = factory.records().into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec!["Oslo", "Lima", "Pune", "Oslo"]);
    }

    #[tokio::test]
    async fn test_script_backend_end_to_end() {
        let state = Arc::new(GenerationState::new());
        let scheduler = Scheduler::new(state.clone(), Arc::new(DefaultBackendFactory::default()))
            .with_outputs(HashMap::from([(
                "audit".to_string(),
                OutputConfig {
                    kind: BackendKind::Script,
                    config: serde_json::json!({ "script": "params[\"emitter.name\"] + \":\" + v" }),
                },
            )]));
        let emitters = vec![EmitterConfig::inline("users", "abc", "audit").with_tick(None, 2)];

        let summary = scheduler
            .run(&emitters, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.objects, 2);
        assert_eq!(summary.bytes, 6);
        assert_eq!(summary.close_failures, 0);
    }

    struct PanickingFactory;

    impl BackendFactory for PanickingFactory {
        fn create(&self, _output: &str, _config: &OutputConfig) -> Result<Arc<dyn Producer>, BackendError> {
            Ok(Arc::new(PanickingProducer))
        }
    }

    #[tokio::test]
    async fn test_panicking_emitter_is_reported_stopped_after_run() {
        let scheduler = Scheduler::new(Arc::new(GenerationState::new()), Arc::new(PanickingFactory));
        let emitters = vec![
            EmitterConfig::inline("doomed", "v", "sink").with_tick(Some(Duration::from_millis(10)), 1),
            EmitterConfig::inline("also-doomed", "v", "sink"),
        ];

        let prepared = scheduler.prepare(&emitters).await.unwrap();
        let handles = prepared.handles();

        let summary = tokio::time::timeout(Duration::from_secs(2), prepared.run(CancellationToken::new()))
            .await
            .expect("run did not return after emitters panicked");

        assert_eq!(summary.objects, 0);
        assert_eq!(summary.close_failures, 0);
        assert!(handles.iter().all(|h| h.state() == EmitterState::Stopped));
    }
}
