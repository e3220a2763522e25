mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::{json, Value};

/// Creates an approved event with one ticket type and returns
/// (event_id, ticket_id).
async fn setup_event(app: &TestApp, price_cents: i64, total_seats: i64) -> (String, String) {
    let payload = json!({
        "title": "Capacity Workshop",
        "category": "Education",
        "start_time": (Utc::now() + Duration::days(7)).to_rfc3339(),
        "end_time": (Utc::now() + Duration::days(7) + Duration::hours(2)).to_rfc3339(),
        "location": "Munich",
        "is_free": false,
        "tickets": [{ "name": "Seat", "price_cents": price_cents, "total_seats": total_seats }]
    });

    let res = app
        .send("POST", "/api/v1/events", Some(("org-1", "organizer")), Some(payload))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = parse_body(res).await;
    let event_id = created["id"].as_str().unwrap().to_string();
    let ticket_id = created["tickets"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .send("POST", &format!("/api/v1/events/{}/approve", event_id), Some(("admin-1", "admin")), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    (event_id, ticket_id)
}

fn register_body(ticket_id: &str, quantity: i64) -> Value {
    json!({
        "ticket_id": ticket_id,
        "quantity": quantity,
        "full_name": "Alice Example",
        "email": "alice@example.com",
        "phone": "+49123456"
    })
}

async fn booked_seats(app: &TestApp, ticket_id: &str) -> i64 {
    let (booked,): (i64,) = sqlx::query_as("SELECT booked_seats FROM tickets WHERE id = ?")
        .bind(ticket_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    booked
}

async fn confirmed_sum(app: &TestApp, ticket_id: &str) -> i64 {
    let (sum,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(quantity), 0) FROM registrations WHERE ticket_id = ? AND status = 'confirmed'",
    )
    .bind(ticket_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    sum
}

#[tokio::test]
async fn test_capacity_walkthrough() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 2).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    // 1 seat of 2: success, amount computed server-side.
    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["total_amount_cents"], 5000);
    assert_eq!(body["status"], "confirmed");
    assert!(!body["transaction_ref"].as_str().unwrap().is_empty());
    assert_eq!(booked_seats(&app, &ticket_id).await, 1);

    // 2 more seats would oversell: rejected, counter untouched.
    let res = app.send("POST", &uri, Some(("buyer-2", "organizer")), Some(register_body(&ticket_id, 2))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(booked_seats(&app, &ticket_id).await, 1);

    // Last seat still sellable.
    let res = app.send("POST", &uri, Some(("buyer-3", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(booked_seats(&app, &ticket_id).await, 2);

    // Sold out.
    let res = app.send("POST", &uri, Some(("buyer-4", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(booked_seats(&app, &ticket_id).await, 2);

    // Counter always equals the confirmed rows.
    assert_eq!(confirmed_sum(&app, &ticket_id).await, 2);
}

#[tokio::test]
async fn test_total_amount_is_never_client_supplied() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 7500, 10).await;

    let mut body = register_body(&ticket_id, 3);
    body["total_amount_cents"] = json!(1);

    let res = app
        .send("POST", &format!("/api/v1/events/{}/register", event_id), Some(("buyer-1", "organizer")), Some(body))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["total_amount_cents"], 22500);
}

#[tokio::test]
async fn test_invalid_quantity_rejected() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 10).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    for quantity in [0, -5] {
        let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, quantity))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(res).await;
        assert!(body["errors"]["quantity"].is_array());
    }

    assert_eq!(booked_seats(&app, &ticket_id).await, 0);
}

#[tokio::test]
async fn test_overflowing_quantity_is_rejected() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 10).await;

    // price * quantity would overflow i64; must be a 400, not a panic.
    let res = app
        .send(
            "POST",
            &format!("/api/v1/events/{}/register", event_id),
            Some(("buyer-1", "organizer")),
            Some(register_body(&ticket_id, i64::MAX)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["errors"]["quantity"].is_array());
    assert_eq!(booked_seats(&app, &ticket_id).await, 0);
}

#[tokio::test]
async fn test_unknown_ticket_is_404() {
    let app = TestApp::new().await;
    let (event_id, _) = setup_event(&app, 5000, 10).await;

    let res = app
        .send(
            "POST",
            &format!("/api/v1/events/{}/register", event_id),
            Some(("buyer-1", "organizer")),
            Some(register_body("no-such-ticket", 1)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ticket_of_other_event_is_404() {
    let app = TestApp::new().await;
    let (event_a, _ticket_a) = setup_event(&app, 5000, 10).await;
    let (_event_b, ticket_b) = setup_event(&app, 5000, 10).await;

    let res = app
        .send(
            "POST",
            &format!("/api/v1/events/{}/register", event_a),
            Some(("buyer-1", "organizer")),
            Some(register_body(&ticket_b, 1)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 10).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The failed attempt must not leak a counter increment.
    assert_eq!(booked_seats(&app, &ticket_id).await, 1);
    assert_eq!(confirmed_sum(&app, &ticket_id).await, 1);
}

#[tokio::test]
async fn test_cancellation_releases_capacity() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 2).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 2))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    assert_eq!(booked_seats(&app, &ticket_id).await, 2);

    // Sold out for everyone else.
    let res = app.send("POST", &uri, Some(("buyer-2", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .send("POST", &format!("/api/v1/registrations/{}/cancel", registration_id), Some(("buyer-1", "organizer")), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "cancelled");
    assert_eq!(booked_seats(&app, &ticket_id).await, 0);
    assert_eq!(confirmed_sum(&app, &ticket_id).await, 0);

    // Seats are sellable again.
    let res = app.send("POST", &uri, Some(("buyer-2", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_buyer_can_register_again_after_cancelling() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 5).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 2))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .send("POST", &format!("/api/v1/registrations/{}/cancel", registration_id), Some(("buyer-1", "organizer")), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    // The cancelled row must not block the same buyer and ticket.
    let res = app.send("POST", &uri, Some(("buyer-1", "organizer")), Some(register_body(&ticket_id, 1))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(booked_seats(&app, &ticket_id).await, 1);
    assert_eq!(confirmed_sum(&app, &ticket_id).await, 1);
}

#[tokio::test]
async fn test_cancel_is_not_repeatable() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 5).await;

    let res = app
        .send(
            "POST",
            &format!("/api/v1/events/{}/register", event_id),
            Some(("buyer-1", "organizer")),
            Some(register_body(&ticket_id, 1)),
        )
        .await;
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let cancel_uri = format!("/api/v1/registrations/{}/cancel", registration_id);

    let res = app.send("POST", &cancel_uri, Some(("buyer-1", "organizer")), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    // A second cancel must not release seats twice.
    let res = app.send("POST", &cancel_uri, Some(("buyer-1", "organizer")), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(booked_seats(&app, &ticket_id).await, 0);
}

#[tokio::test]
async fn test_cancel_requires_owner_or_admin() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 5).await;

    let res = app
        .send(
            "POST",
            &format!("/api/v1/events/{}/register", event_id),
            Some(("buyer-1", "organizer")),
            Some(register_body(&ticket_id, 1)),
        )
        .await;
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    let cancel_uri = format!("/api/v1/registrations/{}/cancel", registration_id);

    let res = app.send("POST", &cancel_uri, Some(("buyer-2", "organizer")), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("POST", &cancel_uri, Some(("admin-1", "admin")), None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_event_registrations_visible_to_organizer_only() {
    let app = TestApp::new().await;
    let (event_id, ticket_id) = setup_event(&app, 5000, 5).await;

    app.send(
        "POST",
        &format!("/api/v1/events/{}/register", event_id),
        Some(("buyer-1", "organizer")),
        Some(register_body(&ticket_id, 1)),
    )
    .await;

    let uri = format!("/api/v1/events/{}/registrations", event_id);

    let res = app.send("GET", &uri, Some(("org-2", "organizer")), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", &uri, Some(("org-1", "organizer")), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);
}
