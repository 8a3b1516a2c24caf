//! Gate lifecycle tests against scripted resolvers

use proptest::prelude::*;
use scaffold_gate::prelude::*;
use scaffold_gate::{ResolutionError, StaticResolver};
use scaffold_test_utils::{init_tracing, message_branches, RecordingHook, ScriptedResolver};
use std::sync::Arc;
use std::time::Duration;

fn gate(resolver: Arc<dyn VariantResolver>, hook: &RecordingHook<ResolutionError>) -> VariantGate {
    VariantGate::new(resolver).on_error(hook.hook())
}

#[tokio::test]
async fn known_variant_renders_its_branch() {
    init_tracing();
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();

    assert_eq!(*handle.current(), "Loading");
    resolver.release();

    let settled = handle.settled().await;
    assert_eq!(settled.status(), ResolutionStatus::Resolved);
    assert_eq!(*handle.current(), "Message B");
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn unknown_variant_renders_control() {
    let resolver = ScriptedResolver::variant("Z");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();
    resolver.release();

    let settled = handle.settled().await;
    assert_eq!(settled.status(), ResolutionStatus::Resolved);
    assert_eq!(settled.variant(), Some("A"));
    assert_eq!(*handle.current(), "Message A");
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn rejection_renders_fallback_and_reports_once() {
    let resolver = ScriptedResolver::rejecting("flag service down");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();
    resolver.release();

    let settled = handle.settled().await;
    assert_eq!(settled.status(), ResolutionStatus::Failed);
    assert_eq!(*handle.current(), "Fallback");

    // no retry, no second report
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(resolver.calls(), 1);
    assert_eq!(hook.count(), 1);
    assert!(matches!(hook.seen()[0], ResolutionError::Rejected { ref key, .. } if key == "exp1"));
}

#[tokio::test(start_paused = true)]
async fn timeout_is_treated_as_rejection() {
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .with_config(GateConfig::new().with_timeout(Duration::from_millis(100)))
        .mount("exp1", message_branches())
        .unwrap();

    let settled = handle.settled().await;
    assert!(settled.error().is_some_and(ResolutionError::is_timeout));
    assert_eq!(*handle.current(), "Fallback");

    // a late answer after the timeout changes nothing
    resolver.release();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(handle.status(), ResolutionStatus::Failed);
    assert_eq!(hook.count(), 1);
}

#[tokio::test]
async fn unmount_then_resolve_has_no_effect() {
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let mut handle = gate(resolver.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();
    let mut observer = handle.subscribe();
    observer.borrow_and_update();

    tokio::time::sleep(Duration::from_millis(5)).await;
    handle.unmount();
    resolver.release();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!handle.is_mounted());
    assert!(handle.resolution().is_pending());
    assert_eq!(*handle.current(), "Loading");
    assert!(!observer.has_changed().unwrap());
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn dropping_the_handle_cancels() {
    let resolver = ScriptedResolver::rejecting("late");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();
    let observer = handle.subscribe();

    drop(handle);
    resolver.release();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(observer.borrow().is_pending());
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn rekey_discards_previous_attempt() {
    let slow = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let mut handle = gate(slow.clone(), &hook)
        .mount("exp1", message_branches())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    handle.rekey("exp2");
    assert_eq!(handle.key(), "exp2");
    assert!(handle.resolution().is_pending());

    slow.release();
    let settled = handle.settled().await;
    assert_eq!(settled.variant(), Some("B"));
    assert_eq!(slow.calls(), 2);
}

#[tokio::test]
async fn settled_after_unmount_returns_pending_snapshot() {
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let mut handle = gate(resolver.clone(), &hook)
        .with_config(GateConfig::new().without_timeout())
        .mount("exp1", message_branches())
        .unwrap();

    handle.unmount();
    resolver.release();

    let settled = tokio::time::timeout(Duration::from_secs(2), handle.settled())
        .await
        .expect("settled must return once the gate is unmounted");
    assert!(settled.is_pending());
    assert_eq!(*handle.current(), "Loading");
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn rekey_after_unmount_settles_again() {
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let mut handle = gate(resolver.clone(), &hook)
        .with_config(GateConfig::new().without_timeout())
        .mount("exp1", message_branches())
        .unwrap();
    handle.unmount();

    handle.rekey("exp2");
    assert!(handle.is_mounted());
    resolver.release();

    let settled = tokio::time::timeout(Duration::from_secs(2), handle.settled())
        .await
        .expect("remounted gate settles");
    assert_eq!(settled.variant(), Some("B"));
    assert_eq!(*handle.current(), "Message B");
}

#[tokio::test]
async fn dropped_handle_closes_subscriptions() {
    let resolver = ScriptedResolver::variant("B");
    let hook = RecordingHook::new();
    let handle = gate(resolver.clone(), &hook)
        .with_config(GateConfig::new().without_timeout())
        .mount("exp1", message_branches())
        .unwrap();
    let mut observer = handle.subscribe();
    observer.borrow_and_update();

    drop(handle);
    resolver.release();

    // the aborted attempt releases the sender instead of publishing
    let changed = tokio::time::timeout(Duration::from_secs(1), observer.changed())
        .await
        .expect("subscription closes after drop");
    assert!(changed.is_err());
    assert!(observer.borrow().is_pending());
    assert_eq!(hook.count(), 0);
}

#[tokio::test]
async fn gates_do_not_share_state() {
    let resolver = Arc::new(
        StaticResolver::new()
            .with_variant("exp1", "B")
            .with_variant("exp2", "A"),
    );
    let gate = VariantGate::new(resolver);

    let first = gate.mount("exp1", message_branches()).unwrap();
    let second = gate.mount("exp2", message_branches()).unwrap();

    first.settled().await;
    second.settled().await;
    assert_eq!(*first.current(), "Message B");
    assert_eq!(*second.current(), "Message A");
}

#[derive(Debug, Clone)]
enum Outcome {
    Variant(String),
    Reject,
    Timeout,
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        "[A-Z]{1,2}".prop_map(Outcome::Variant),
        Just(Outcome::Reject),
        Just(Outcome::Timeout),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn terminal_state_is_reached_exactly_once(outcome in outcome_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();

        runtime.block_on(async move {
            let resolver = match &outcome {
                Outcome::Variant(label) => ScriptedResolver::variant(label),
                Outcome::Reject | Outcome::Timeout => ScriptedResolver::rejecting("down"),
            };
            let hook = RecordingHook::new();
            let handle = gate(resolver.clone(), &hook)
                .with_config(GateConfig::new().with_timeout(Duration::from_millis(50)))
                .mount("exp1", message_branches())
                .unwrap();
            let mut observer = handle.subscribe();
            observer.borrow_and_update();

            if !matches!(outcome, Outcome::Timeout) {
                resolver.release();
            }

            let mut transitions = Vec::new();
            while observer.changed().await.is_ok() {
                transitions.push(observer.borrow_and_update().clone());
                if transitions.last().is_some_and(VariantResolution::is_terminal) {
                    break;
                }
            }
            resolver.release();
            tokio::time::sleep(Duration::from_millis(200)).await;

            assert_eq!(transitions.len(), 1);
            assert!(!observer.has_changed().unwrap());
            assert!(handle.resolution().is_terminal());
            let expect_failure = !matches!(outcome, Outcome::Variant(_));
            assert_eq!(hook.count(), usize::from(expect_failure));
        });
    }
}
