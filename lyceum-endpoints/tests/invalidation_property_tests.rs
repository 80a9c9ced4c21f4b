//! Property-Based Tests for Cache Invalidation
//!
//! For any mutation with invalidated-tag set `I`, every cache entry whose
//! provided-tag set intersects `I` SHALL be stale immediately after the
//! mutation resolves, AND every entry with no overlapping tag SHALL stay
//! fresh. Bulk mutations are all-or-nothing: IF any item of the per-item
//! status array reports an error THEN the whole mutation SHALL reject with
//! one aggregated message AND no cache entry SHALL be freshened or staled.

use async_trait::async_trait;
use lyceum_cache::QueryKey;
use lyceum_core::{
    ClassroomId, ClientConfig, EntityType, GroupId, MarkType, StudentId, Tag, TransportError,
};
use lyceum_endpoints::classroom::{ClassroomEndpoints, CreateClassroomRequest};
use lyceum_endpoints::mark::{CreateMarkRequest, MarkEndpoints};
use lyceum_endpoints::EndpointRegistry;
use lyceum_transport::{
    Gateway, GatewayConfig, HttpSend, InMemorySessionStore, LoginRedirect, PreparedRequest,
    RedirectReason, SessionTokens, WireResponse,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

/// Sender that pops one scripted reply per call and counts attempts.
struct ScriptedSender {
    script: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
    calls: AtomicUsize,
}

impl ScriptedSender {
    fn new(replies: Vec<Result<WireResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpSend for ScriptedSender {
    async fn send(&self, _request: PreparedRequest) -> Result<WireResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .await
            .pop_front()
            .expect("unexpected extra send")
    }
}

struct NoopRedirect;

#[async_trait]
impl LoginRedirect for NoopRedirect {
    async fn redirect_to_login(&self, _callback_path: &str, _reason: RedirectReason) {}
}

fn test_config() -> ClientConfig {
    serde_json::from_value(json!({
        "api_root": "https://api.example.school",
        "service_roots": {},
        "locale": "en-US",
        "request_timeout_ms": 30000,
        "retry": {"max_retries": 3, "base_delay_ms": 1000, "jitter_ms": 1000}
    }))
    .expect("static test config is valid")
}

/// Registry wired to a scripted sender and a live in-memory session.
fn test_registry(
    sender: Arc<ScriptedSender>,
) -> EndpointRegistry<ScriptedSender, InMemorySessionStore, NoopRedirect> {
    let session = Arc::new(InMemorySessionStore::with_tokens(SessionTokens {
        token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }));
    let config = test_config();
    let gateway = Gateway::new(
        Arc::clone(&sender),
        Arc::clone(&session),
        Arc::new(NoopRedirect),
        GatewayConfig::from_client_config(&config),
        config.root_for(lyceum_core::Service::Auth),
    );
    EndpointRegistry::new(
        gateway,
        Arc::new(lyceum_cache::CacheRegistry::new()),
        config,
        session,
    )
}

fn ok_envelope(data: Value) -> WireResponse {
    WireResponse::new(200, json!({"data": data, "success": true}))
}

fn mark_json(student_id: Uuid) -> Value {
    json!({
        "mark_id": Uuid::new_v4(),
        "student_id": student_id,
        "value": 15.0,
        "max_value": 20.0,
        "mark_type": "exam",
        "subject": "maths",
        "classroom_id": null,
        "group_id": null,
        "recorded_at": "2025-09-01T09:00:00Z"
    })
}

fn classroom_json(id: Uuid) -> Value {
    json!({
        "classroom_id": id,
        "school_id": Uuid::nil(),
        "name": "9B",
        "subject": null,
        "teacher_id": null,
        "student_ids": [],
        "location": null,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

/// One mark write with arbitrary optional classroom/group attribution.
#[derive(Debug, Clone)]
struct MarkWrite {
    student: StudentId,
    classroom: Option<ClassroomId>,
    group: Option<GroupId>,
}

fn mark_write_strategy() -> impl Strategy<Value = MarkWrite> {
    (
        any::<[u8; 16]>(),
        any::<[u8; 16]>(),
        any::<[u8; 16]>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(student, classroom, group, with_classroom, with_group)| MarkWrite {
            student: StudentId::new(Uuid::from_bytes(student)),
            classroom: with_classroom.then(|| ClassroomId::new(Uuid::from_bytes(classroom))),
            group: with_group.then(|| GroupId::new(Uuid::from_bytes(group))),
        })
}

/// Per-item bulk outcomes: `None` is success, `Some(message)` an error.
fn bulk_outcomes_strategy() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(None),
            1 => "[a-z ]{3,20}".prop_map(Some),
        ],
        1..6,
    )
}

/// How many retryable failures precede the first success, if any.
fn retryable_status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(500u16),
        Just(502u16),
        Just(503u16),
        Just(429u16),
        Just(408u16),
    ]
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any mark write, exactly the overlapping cache entries go stale:
    /// the student's marks always, the classroom/group entries only when the
    /// write references them, and unrelated entries never.
    #[test]
    fn prop_mutation_stales_exactly_overlapping_entries(write in mark_write_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let sender = ScriptedSender::new(vec![Ok(ok_envelope(mark_json(
                write.student.as_uuid(),
            )))]);
            let registry = Arc::new(test_registry(Arc::clone(&sender)));
            let cache = Arc::clone(registry.cache());
            let endpoints = MarkEndpoints::new(Arc::clone(&registry));

            // Seed one entry per tag of interest, plus one unrelated entry.
            let classroom_id = write
                .classroom
                .map(|c| c.as_uuid())
                .unwrap_or_else(|| Uuid::from_bytes([7; 16]));
            let group_id = write
                .group
                .map(|g| g.as_uuid())
                .unwrap_or_else(|| Uuid::from_bytes([9; 16]));

            let student_key = QueryKey::new("mark.student_marks", &write.student).unwrap();
            let classroom_key = QueryKey::new("classroom.get", &classroom_id).unwrap();
            let group_key = QueryKey::new("mark.group_marks", &group_id).unwrap();
            let unrelated_key = QueryKey::new("teacher.list", &()).unwrap();

            cache
                .apply_response(
                    &student_key,
                    &[Tag::student_scope(EntityType::Mark, write.student.as_uuid())],
                    json!([]),
                )
                .await;
            cache
                .apply_response(
                    &classroom_key,
                    &[Tag::id(EntityType::Classroom, classroom_id)],
                    json!({}),
                )
                .await;
            cache
                .apply_response(
                    &group_key,
                    &[Tag::composite(EntityType::Mark, format!("GROUP_{}", group_id))],
                    json!([]),
                )
                .await;
            cache
                .apply_response(&unrelated_key, &[Tag::list(EntityType::Teacher)], json!([]))
                .await;

            endpoints
                .create_mark(&CreateMarkRequest {
                    student_id: write.student,
                    value: 15.0,
                    max_value: 20.0,
                    mark_type: MarkType::Exam,
                    subject: "maths".to_string(),
                    classroom_id: write.classroom,
                    group_id: write.group,
                })
                .await
                .unwrap();

            prop_assert!(!cache.lookup(&student_key).await.unwrap().fresh);
            prop_assert_eq!(
                cache.lookup(&classroom_key).await.unwrap().fresh,
                write.classroom.is_none(),
                "classroom entry staleness must track attribution: {:?}",
                write
            );
            prop_assert_eq!(
                cache.lookup(&group_key).await.unwrap().fresh,
                write.group.is_none(),
                "group entry staleness must track attribution: {:?}",
                write
            );
            prop_assert!(cache.lookup(&unrelated_key).await.unwrap().fresh);
            Ok(())
        })?;
    }

    /// Bulk creation is all-or-nothing: any failing item rejects the whole
    /// batch with every item message (1-indexed) in one aggregated error,
    /// and the seeded list entry keeps its freshness.
    #[test]
    fn prop_bulk_mutation_is_all_or_nothing(outcomes in bulk_outcomes_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let items: Vec<Value> = outcomes
                .iter()
                .map(|outcome| match outcome {
                    None => json!({"status": "ok", "data": classroom_json(Uuid::new_v4())}),
                    Some(message) => json!({"status": "error", "message": message}),
                })
                .collect();
            let sender = ScriptedSender::new(vec![Ok(ok_envelope(json!(items)))]);
            let registry = Arc::new(test_registry(sender));
            let cache = Arc::clone(registry.cache());
            let endpoints = ClassroomEndpoints::new(Arc::clone(&registry));

            let list_key = QueryKey::new("classroom.list", &()).unwrap();
            cache
                .apply_response(&list_key, &[Tag::list(EntityType::Classroom)], json!([]))
                .await;

            let requests: Vec<CreateClassroomRequest> = outcomes
                .iter()
                .map(|_| CreateClassroomRequest {
                    name: "9B".to_string(),
                    subject: None,
                    teacher_id: None,
                    location: None,
                })
                .collect();
            let result = endpoints.create_classrooms(&requests).await;

            let failures: Vec<(usize, &String)> = outcomes
                .iter()
                .enumerate()
                .filter_map(|(index, outcome)| outcome.as_ref().map(|m| (index, m)))
                .collect();

            if failures.is_empty() {
                let created = result.unwrap();
                prop_assert_eq!(created.len(), outcomes.len());
                prop_assert!(!cache.lookup(&list_key).await.unwrap().fresh);
            } else {
                let message = result.unwrap_err().surface_message();
                for (index, item_message) in failures {
                    prop_assert!(
                        message.contains(&format!("item {}: {}", index + 1, item_message)),
                        "aggregated message {:?} missing item {}",
                        message,
                        index + 1
                    );
                }
                prop_assert!(cache.lookup(&list_key).await.unwrap().fresh);
            }
            Ok(())
        })?;
    }

    /// The effective attempt count never exceeds 4: a query succeeds exactly
    /// when a success reply appears within the first four attempts, and the
    /// sender is called once per attempt, never more.
    #[test]
    fn prop_attempt_count_never_exceeds_four(
        failures in prop::collection::vec(retryable_status_strategy(), 0..=4),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            tokio::time::pause();
            let mut replies: Vec<Result<WireResponse, TransportError>> = failures
                .iter()
                .map(|status| Ok(WireResponse::new(*status, json!({"message": "boom"}))))
                .collect();
            let exhausted = failures.len() >= 4;
            if !exhausted {
                replies.push(Ok(ok_envelope(json!([]))));
            }
            let sender = ScriptedSender::new(replies);
            let registry = test_registry(Arc::clone(&sender));
            let endpoints = ClassroomEndpoints::new(Arc::new(registry));

            let result = endpoints
                .get_classrooms(&lyceum_endpoints::classroom::ClassroomFilter::default())
                .await;

            if exhausted {
                prop_assert!(result.is_err());
                prop_assert_eq!(sender.calls(), 4);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(sender.calls(), failures.len() + 1);
            }
            Ok(())
        })?;
    }
}
