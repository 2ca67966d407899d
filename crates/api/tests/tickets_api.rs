//! HTTP tests for ticket creation and lifecycle transitions.

mod common;

use axum::http::StatusCode;
use common::{body_json, test_config, TestApp};
use ohq_core::lifecycle::RedeletePolicy;
use ohq_core::roles::{Role, RoleScope};
use ohq_core::ticket::TicketStatus;
use ohq_core::types::{CourseId, QueueId, TicketId};
use serde_json::json;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn signup(queue_id: QueueId, emails: &[&str]) -> serde_json::Value {
    json!({
        "queueId": queue_id,
        "studentEmails": emails,
        "question": "Why does my linked list leak?",
        "notifications": { "email": { "address": emails[0] } },
    })
}

async fn create_ticket(app: &TestApp, body: serde_json::Value) -> TicketId {
    let response = app.post_json("/api/v1/tickets", None, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().parse().unwrap()
}

/// A course with one open queue and a TA token.
fn course_with_ta(app: &TestApp) -> (CourseId, QueueId, String) {
    let course = Uuid::now_v7();
    let queue = app.store.add_queue(course, "Lab hours", &[]);
    let ta = app.store.add_user("ta@example.edu", &[], Some("Tess"));
    app.store.grant_role(ta, Role::Ta, RoleScope::Course(course));
    (course, queue, app.token(ta))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_signup_creates_open_ticket_on_roster() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);

    let id = create_ticket(&app, signup(queue, &["Ada@Example.edu", "grace@example.edu"])).await;

    let ticket = app.store.ticket(id).expect("ticket should be stored");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.student_ids.len(), 2);
    assert_eq!(ticket.created.by, ticket.student_ids[0]);
    assert_eq!(app.store.queue(queue).unwrap().ticket_ids, vec![id]);
    // The TA plus two provisioned students.
    assert_eq!(app.store.user_count(), 3);
}

#[tokio::test]
async fn authenticated_signup_records_caller_as_creator() {
    let app = TestApp::new();
    let (_course, queue, ta_token) = course_with_ta(&app);

    let response = app
        .post_json("/api/v1/tickets", Some(&ta_token), signup(queue, &["ada@example.edu"]))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id: TicketId = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let ticket = app.store.ticket(id).unwrap();
    assert_ne!(ticket.created.by, ticket.student_ids[0]);
}

#[tokio::test]
async fn signup_on_unknown_queue_returns_404() {
    let app = TestApp::new();
    let response = app
        .post_json("/api/v1/tickets", None, signup(Uuid::now_v7(), &["ada@example.edu"]))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn malformed_signups_are_validation_errors() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);

    let bad_bodies = [
        json!({ "queueId": "not-a-uuid", "studentEmails": ["ada@example.edu"], "notifications": {} }),
        json!({ "queueId": queue, "studentEmails": [], "notifications": {} }),
        json!({ "queueId": queue, "studentEmails": ["not an email"], "notifications": {} }),
        json!({ "queueId": queue, "studentEmails": ["ada@example.edu"], "notifications": {}, "extra": 1 }),
        json!({ "queueId": queue, "studentEmails": ["ada@example.edu"], "notifications": { "pager": {} } }),
    ];

    for body in bad_bodies {
        let response = app.post_json("/api/v1/tickets", None, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
    assert_eq!(app.store.ticket_count(), 0);
}

#[tokio::test]
async fn validation_message_names_the_problem() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);

    let response = app
        .post_json(
            "/api/v1/tickets",
            None,
            json!({ "queueId": queue, "studentEmails": [], "notifications": {} }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "studentEmails must contain at least one address");
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected_even_where_optional() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);

    let response = app
        .post_json("/api/v1/tickets", Some("garbage"), signup(queue, &["ada@example.edu"]))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

// ---------------------------------------------------------------------------
// Restricted queues
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restricted_queue_requires_matching_secret() {
    let app = TestApp::new();
    let course = Uuid::now_v7();
    let session = app.store.add_session(course, "abc123");
    let queue = app.store.add_queue(course, "Exam review", &[session]);

    let mut body = signup(queue, &["ada@example.edu"]);
    body["sessionId"] = json!(session);
    body["secret"] = json!("wrong1");
    let response = app.post_json("/api/v1/tickets", None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "INVALID_SECRET");
    assert_eq!(app.store.user_count(), 0, "rejected signups provision nobody");

    body["secret"] = json!("abc123");
    create_ticket(&app, body).await;
    assert_eq!(app.store.ticket_count(), 1);
}

#[tokio::test]
async fn restricted_queue_rejects_foreign_session() {
    let app = TestApp::new();
    let course = Uuid::now_v7();
    let allowed = app.store.add_session(course, "abc123");
    let other = app.store.add_session(course, "abc123");
    let queue = app.store.add_queue(course, "Exam review", &[allowed]);

    let mut body = signup(queue, &["ada@example.edu"]);
    body["sessionId"] = json!(other);
    body["secret"] = json!("abc123");
    let response = app.post_json("/api/v1/tickets", None, body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "INVALID_SESSION");
    assert_eq!(app.store.ticket_count(), 0);
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transitions_require_authentication() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;

    let response = app.post(&format!("/api/v1/tickets/{id}/claim"), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn students_cannot_claim() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;
    let student = app.store.ticket(id).unwrap().student_ids[0];

    let response = app
        .post(&format!("/api/v1/tickets/{id}/claim"), Some(&app.token(student)))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Only TAs and above can claim tickets.");
    assert_eq!(app.store.ticket(id).unwrap().status, TicketStatus::Open);
}

#[tokio::test]
async fn ta_walks_ticket_through_lifecycle() {
    let app = TestApp::new();
    let (_course, queue, ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;

    let steps = [
        ("claim", TicketStatus::Claimed),
        ("release", TicketStatus::Open),
        ("mark-as-missing", TicketStatus::MarkedAsMissing),
        ("claim", TicketStatus::Claimed),
        ("mark-as-done", TicketStatus::MarkedAsDone),
    ];
    for (action, expected) in steps {
        let response = app
            .post(&format!("/api/v1/tickets/{id}/{action}"), Some(&ta))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{action}");
        assert_eq!(app.store.ticket(id).unwrap().status, expected, "{action}");
    }

    let ticket = app.store.ticket(id).unwrap();
    assert!(ticket.claimed.is_some());
    assert!(ticket.marked_as_missing.is_some());
    assert!(ticket.marked_as_done.is_some());
}

#[tokio::test]
async fn owner_deletes_and_deleted_ticket_is_gone() {
    let app = TestApp::new();
    let (_course, queue, ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;
    let student = app.token(app.store.ticket(id).unwrap().student_ids[0]);
    let uri = format!("/api/v1/tickets/{id}");

    let response = app.delete(&uri, Some(&student)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let first = app.store.ticket(id).unwrap().deleted;
    assert!(first.is_some());

    let response = app.post(&format!("{uri}/claim"), Some(&ta)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Idempotent re-deletion keeps the first stamp.
    let response = app.delete(&uri, Some(&ta)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.store.ticket(id).unwrap().deleted, first);
}

#[tokio::test]
async fn strangers_cannot_delete() {
    let app = TestApp::new();
    let (_course, queue, _ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;
    let stranger = app.store.add_user("eve@example.edu", &[], None);

    let response = app
        .delete(&format!("/api/v1/tickets/{id}"), Some(&app.token(stranger)))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    assert!(app.store.ticket(id).unwrap().deleted.is_none());
}

#[tokio::test]
async fn reject_policy_refuses_redeletion() {
    let mut config = test_config();
    config.redelete_policy = RedeletePolicy::Reject;
    let app = TestApp::with_config(config);
    let (_course, queue, ta) = course_with_ta(&app);
    let id = create_ticket(&app, signup(queue, &["ada@example.edu"])).await;
    let uri = format!("/api/v1/tickets/{id}");

    assert_eq!(app.delete(&uri, Some(&ta)).await.status(), StatusCode::NO_CONTENT);

    let response = app.delete(&uri, Some(&ta)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_and_malformed_ticket_ids() {
    let app = TestApp::new();
    let (_course, _queue, ta) = course_with_ta(&app);

    let response = app
        .post(&format!("/api/v1/tickets/{}/claim", Uuid::now_v7()), Some(&ta))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.post("/api/v1/tickets/42/claim", Some(&ta)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
