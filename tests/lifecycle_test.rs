//! Balancer start/stop orchestration tests.

use std::path::Path;

use bluegreen::config::{BackendTemplate, LoadBalancerConfig};
use bluegreen::lifecycle::{start_balancer, stop_all, BackendLifecycle, StartOutcome};
use bluegreen::load_balancer::BackendSet;
use bluegreen::DeployError;

mod common;
use common::{fast_retries, remove, run, stop, Op, RecordingRuntime};

#[tokio::test]
async fn test_start_is_noop_when_running() {
    let runtime = RecordingRuntime::with_running(&["haproxy"]);

    let outcome = start_balancer(
        &runtime,
        &LoadBalancerConfig::default(),
        Path::new("/srv/deploy"),
        &fast_retries(1),
    )
    .await
    .unwrap();

    assert_eq!(outcome, StartOutcome::AlreadyRunning);
    assert_eq!(runtime.ops(), vec![Op::IsRunning("haproxy".into())]);
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn test_start_removes_then_runs() {
    let runtime = RecordingRuntime::new();

    let outcome = start_balancer(
        &runtime,
        &LoadBalancerConfig::default(),
        Path::new("/srv/deploy"),
        &fast_retries(1),
    )
    .await
    .unwrap();

    assert_eq!(outcome, StartOutcome::Started);
    assert_eq!(runtime.mutations(), vec![remove("haproxy"), run("haproxy")]);

    let spec = &runtime.specs()[0];
    assert_eq!(spec.image, "haproxytech/haproxy-alpine");
    assert_eq!(spec.ports, vec!["4500:4500", "9999:9999"]);
    assert_eq!(spec.volumes[0].to_string(), "/srv/deploy:/usr/local/etc/haproxy:ro");
}

#[tokio::test]
async fn test_second_start_is_noop() {
    let runtime = RecordingRuntime::new();
    let config = LoadBalancerConfig::default();
    let policy = fast_retries(1);

    start_balancer(&runtime, &config, Path::new("/srv"), &policy).await.unwrap();
    let outcome = start_balancer(&runtime, &config, Path::new("/srv"), &policy).await.unwrap();

    assert_eq!(outcome, StartOutcome::AlreadyRunning);
    assert_eq!(runtime.mutations(), vec![remove("haproxy"), run("haproxy")]);
}

#[tokio::test]
async fn test_start_aborts_when_stale_container_cannot_be_removed() {
    let runtime = RecordingRuntime::new();
    runtime.fail_on(remove("haproxy"));

    let err = start_balancer(
        &runtime,
        &LoadBalancerConfig::default(),
        Path::new("/srv"),
        &fast_retries(1),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployError::LifecycleCommandFailed { .. }));
    assert_eq!(runtime.mutations(), vec![remove("haproxy")]);
}

async fn stop_everything(runtime: &RecordingRuntime) -> Result<(), DeployError> {
    let template = BackendTemplate::default();
    let policy = fast_retries(1);
    let lifecycle = BackendLifecycle::new(runtime, &template, &policy);
    stop_all(
        runtime,
        "haproxy",
        &BackendSet::new(["web1", "web2"]),
        &lifecycle,
        &policy,
    )
    .await
}

#[tokio::test]
async fn test_stop_balancer_first_then_backends_in_order() {
    let runtime = RecordingRuntime::with_running(&["haproxy", "web1"]);

    stop_everything(&runtime).await.unwrap();

    assert_eq!(runtime.ops(), vec![stop("haproxy"), stop("web1"), stop("web2")]);
}

#[tokio::test]
async fn test_stop_continues_past_balancer_failure() {
    let runtime = RecordingRuntime::new();
    runtime.fail_on(stop("haproxy"));

    let err = stop_everything(&runtime).await.unwrap_err();

    assert_eq!(runtime.ops(), vec![stop("haproxy"), stop("web1"), stop("web2")]);
    match err {
        DeployError::StopIncomplete { failures } => assert_eq!(failures.len(), 1),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_stop_collects_every_failure() {
    let runtime = RecordingRuntime::new();
    runtime.fail_on(stop("web1"));
    runtime.fail_on(stop("web2"));

    let err = stop_everything(&runtime).await.unwrap_err();

    assert_eq!(runtime.ops(), vec![stop("haproxy"), stop("web1"), stop("web2")]);
    match err {
        DeployError::StopIncomplete { failures } => {
            assert_eq!(failures.len(), 2);
            assert!(failures[0].to_string().contains("'web1'"));
            assert!(failures[1].to_string().contains("'web2'"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
