use std::sync::Arc;

use escalator_core::{
    CallLogSheet, DialOutcome, DispatchRequest, EscalatorError, ObjectStore, ResponseStatus,
    RunPointer,
};
use escalator_dispatcher::{CallDispatcher, DispatchOutcome};
use escalator_infrastructure::InMemoryObjectStore;
use escalator_testing_utils::{FixedClock, MockTelephonyGateway, RosterBuilder, TestEnv};

const TODAY: &str = "2026-10-18";
const LOG_KEY: &str = "connect-call-log/result_log_20261018_090000.json";
const POINTER_KEY: &str = "connect-call-log/latest_log_key.json";

fn roster() -> RosterBuilder {
    RosterBuilder::new()
        .with_row("佐藤", "2026-10-17", "090-1111-1111")
        .with_row("鈴木", TODAY, "090-2222-2222")
        .with_row("高橋", "10/18/2026", "080-3333-3333")
        .with_row("田中", "", "070-4444-4444")
}

async fn setup(
    roster: RosterBuilder,
    gateway: MockTelephonyGateway,
) -> (CallDispatcher, InMemoryObjectStore) {
    let config = TestEnv::app_config();
    let store = TestEnv::store_with_roster(&config, roster.build_bytes()).await;
    let dispatcher = CallDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(gateway),
        Arc::new(FixedClock::at(2026, 10, 18, 9, 0, 0, 9)),
        &config,
    );
    (dispatcher, store)
}

async fn load_sheet(store: &InMemoryObjectStore, key: &str) -> CallLogSheet {
    CallLogSheet::from_bytes(&store.get(key).await.unwrap().unwrap()).unwrap()
}

async fn load_pointer(store: &InMemoryObjectStore) -> RunPointer {
    serde_json::from_slice(&store.get(POINTER_KEY).await.unwrap().unwrap()).unwrap()
}

#[tokio::test]
async fn test_start_cycle_dials_first_scheduled_candidate() {
    let gateway = MockTelephonyGateway::new();
    let (dispatcher, store) = setup(roster(), gateway.clone()).await;

    let outcome = dispatcher
        .dispatch(DispatchRequest::start_cycle())
        .await
        .unwrap();

    let DispatchOutcome::Dialed {
        record,
        log_key,
        contact_index,
    } = outcome
    else {
        panic!("expected a dial");
    };
    assert_eq!(record.name, "鈴木");
    assert_eq!(record.phone, "+819022222222");
    assert_eq!(record.outcome, DialOutcome::Success);
    assert_eq!(record.correlation_id.as_deref(), Some("contact-1"));
    assert_eq!(record.response_status, ResponseStatus::Pending);
    assert_eq!(log_key, LOG_KEY);
    assert_eq!(contact_index, 0);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].destination, "+819022222222");
    assert_eq!(calls[0].caller_id, "+14843019679");
    assert_eq!(calls[0].attributes.get("Message").map(String::as_str), Some("アラーム発生"));

    let sheet = load_sheet(&store, LOG_KEY).await;
    assert_eq!(sheet.records().unwrap(), vec![record]);
    assert_eq!(load_pointer(&store).await, RunPointer::new(LOG_KEY, 0));

    let indexed = store
        .get("connect-call-log/runs/Y29udGFjdC0x.json")
        .await
        .unwrap()
        .expect("run index written");
    let indexed: RunPointer = serde_json::from_slice(&indexed).unwrap();
    assert_eq!(indexed, RunPointer::new(LOG_KEY, 0));
}

#[tokio::test]
async fn test_escalation_walks_full_roster() {
    let gateway = MockTelephonyGateway::new();
    let (dispatcher, store) = setup(roster(), gateway.clone()).await;

    // 下标指向未筛选名册中的第一个人，即使他不是今天值班
    let outcome = dispatcher
        .dispatch(DispatchRequest::escalate_to(0))
        .await
        .unwrap();
    match outcome {
        DispatchOutcome::Dialed { record, .. } => assert_eq!(record.name, "佐藤"),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let outcome = dispatcher
        .dispatch(DispatchRequest::escalate_to(3))
        .await
        .unwrap();
    match outcome {
        DispatchOutcome::Dialed { record, contact_index, .. } => {
            assert_eq!(record.name, "田中");
            assert_eq!(contact_index, 3);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(load_pointer(&store).await.contact_index, 3);
    assert_eq!(gateway.call_count(), 2);
}

#[tokio::test]
async fn test_index_past_end_completes_cycle() {
    let gateway = MockTelephonyGateway::new();
    let (dispatcher, store) = setup(roster(), gateway.clone()).await;

    let outcome = dispatcher
        .dispatch(DispatchRequest::escalate_to(4))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::CycleComplete {
            eligible: 4,
            index: 4
        }
    );
    assert_eq!(gateway.call_count(), 0);
    // 只有名册本身
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_nobody_scheduled_today_completes_cycle() {
    let gateway = MockTelephonyGateway::new();
    let roster = RosterBuilder::new().with_row("佐藤", "2026-10-17", "090-1111-1111");
    let (dispatcher, store) = setup(roster, gateway.clone()).await;

    let outcome = dispatcher
        .dispatch(DispatchRequest::start_cycle())
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::CycleComplete { eligible: 0, index: 0 }));
    assert_eq!(gateway.call_count(), 0);
    assert!(store.get(POINTER_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_dial_is_recorded_not_raised() {
    let gateway = MockTelephonyGateway::failing("回線が混み合っています");
    let (dispatcher, store) = setup(roster(), gateway).await;

    let outcome = dispatcher
        .dispatch(DispatchRequest::start_cycle())
        .await
        .unwrap();

    let DispatchOutcome::Dialed { record, log_key, .. } = outcome else {
        panic!("expected a dial");
    };
    assert_eq!(record.outcome, DialOutcome::Failure);
    assert_eq!(record.correlation_id, None);
    assert_eq!(record.failure_detail.as_deref(), Some("回線が混み合っています"));

    let stored = load_sheet(&store, &log_key).await.record(0).unwrap();
    assert_eq!(stored, record);
    assert_eq!(load_pointer(&store).await, RunPointer::new(LOG_KEY, 0));
    assert!(store
        .keys()
        .await
        .iter()
        .all(|key| !key.starts_with("connect-call-log/runs/")));
}

#[tokio::test]
async fn test_missing_roster_fails_run() {
    let config = TestEnv::app_config();
    let dispatcher = CallDispatcher::new(
        Arc::new(InMemoryObjectStore::new()),
        Arc::new(MockTelephonyGateway::new()),
        Arc::new(FixedClock::at(2026, 10, 18, 9, 0, 0, 9)),
        &config,
    );

    let err = dispatcher
        .dispatch(DispatchRequest::start_cycle())
        .await
        .unwrap_err();
    assert!(matches!(err, EscalatorError::ObjectNotFound { .. }));
}

#[tokio::test]
async fn test_missing_sheet_fails_run() {
    let gateway = MockTelephonyGateway::new();
    let roster = RosterBuilder::new()
        .with_sheet("Sheet1")
        .with_row("鈴木", TODAY, "090-2222-2222");
    let (dispatcher, _) = setup(roster, gateway.clone()).await;

    let err = dispatcher
        .dispatch(DispatchRequest::start_cycle())
        .await
        .unwrap_err();
    assert!(matches!(err, EscalatorError::SheetNotFound { .. }));
    assert_eq!(gateway.call_count(), 0);
}
