//! API integration tests
//!
//! These run against a live server with a seeded admin account
//! (admin@bookery.app / admin123). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", tag, nanos)
}

/// Log in as the seeded admin
async fn admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@bookery.app",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a fresh user and return (token, user_id)
async fn register_user(client: &Client, tag: &str) -> (String, i64) {
    let email = format!("{}@test.bookery.app", unique(tag));
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": tag,
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("No token").to_string();

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch /auth/me")
        .json()
        .await
        .expect("Failed to parse /auth/me");

    (token, me["id"].as_i64().expect("No user id"))
}

/// Create a resource as admin and return its id
async fn create_resource(client: &Client, admin: &str, capacity: Option<i64>) -> i64 {
    let response = client
        .post(format!("{}/resources", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "name": unique("room"),
            "type": "room",
            "capacity": capacity,
            "location": "Floor 2"
        }))
        .send()
        .await
        .expect("Failed to create resource");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse resource");
    body["id"].as_i64().expect("No resource id")
}

/// Create a booking, returning the raw response
async fn book(
    client: &Client,
    token: &str,
    resource_id: i64,
    date: &str,
    start: &str,
    end: &str,
    attendee_ids: Vec<i64>,
) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "resource_id": resource_id,
            "booking_date": date,
            "start_time": start,
            "end_time": end,
            "attendee_ids": attendee_ids
        }))
        .send()
        .await
        .expect("Failed to send booking request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@bookery.app",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let email = format!("{}@test.bookery.app", unique("login"));

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Login Test",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration_rejected() {
    let client = Client::new();
    let email = format!("{}@test.bookery.app", unique("dup"));
    let payload = json!({
        "name": "Dup Test",
        "email": email,
        "password": "password123"
    });

    let first = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_back_to_back_bookings_allowed() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "adjacent").await;
    let resource = create_resource(&client, &admin, None).await;

    let first = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(first.status(), 201);

    // Touching endpoints do not conflict
    let second = book(&client, &token, resource, "2031-01-15", "11:00", "12:00", vec![]).await;
    assert_eq!(second.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_booking_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "overlap").await;
    let resource = create_resource(&client, &admin, None).await;

    let first = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(first.status(), 201);

    let second = book(&client, &token, resource, "2031-01-15", "10:30", "11:30", vec![]).await;
    assert_eq!(second.status(), 400);

    let body: Value = second.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_cancelled_booking_does_not_block() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "cancelled").await;
    let resource = create_resource(&client, &admin, None).await;

    let first = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(first.status(), 201);
    let booking: Value = first.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().unwrap();

    let cancel = client
        .delete(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to cancel");
    assert!(cancel.status().is_success());

    // The slot is free again
    let rebook = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(rebook.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_capacity_enforcement() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "capowner").await;
    let resource = create_resource(&client, &admin, Some(5)).await;

    let mut attendees = Vec::new();
    for i in 0..5 {
        let (_, id) = register_user(&client, &format!("cap{}", i)).await;
        attendees.push(id);
    }

    // Headcount 6 (owner + 5) exceeds capacity 5
    let too_many = book(
        &client,
        &token,
        resource,
        "2031-01-15",
        "10:00",
        "11:00",
        attendees.clone(),
    )
    .await;
    assert_eq!(too_many.status(), 400);

    // Headcount 5 (owner + 4) fits exactly
    attendees.pop();
    let fits = book(
        &client,
        &token,
        resource,
        "2031-01-15",
        "10:00",
        "11:00",
        attendees,
    )
    .await;
    assert_eq!(fits.status(), 201);

    let booking: Value = fits.json().await.expect("Failed to parse booking");
    assert_eq!(booking["attendees"].as_array().unwrap().len(), 4);
}

#[tokio::test]
#[ignore]
async fn test_reschedule_self_exclusion() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "resched").await;
    let resource = create_resource(&client, &admin, None).await;

    let created = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(created.status(), 201);
    let booking: Value = created.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().unwrap();

    // Updating to the interval it already occupies must not self-conflict
    let update = client
        .put(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "booking_date": "2031-01-15",
            "start_time": "10:00",
            "end_time": "11:00",
            "notes": "same slot"
        }))
        .send()
        .await
        .expect("Failed to update booking");
    assert!(update.status().is_success());

    let updated: Value = update.json().await.expect("Failed to parse booking");
    assert_eq!(updated["notes"], "same slot");
}

#[tokio::test]
#[ignore]
async fn test_ownership_authorization() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (owner, _) = register_user(&client, "owner").await;
    let (intruder, _) = register_user(&client, "intruder").await;
    let resource = create_resource(&client, &admin, None).await;

    let created = book(&client, &owner, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    let booking: Value = created.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().unwrap();

    let update = client
        .put(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", intruder))
        .json(&json!({"notes": "hijacked"}))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(update.status(), 403);

    let cancel = client
        .delete(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", intruder))
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(cancel.status(), 403);

    // An admin may cancel someone else's booking
    let admin_cancel = client
        .delete(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send cancel");
    assert!(admin_cancel.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_rsvp_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (owner, _) = register_user(&client, "rsvpowner").await;
    let (invitee, invitee_id) = register_user(&client, "invitee").await;
    let (outsider, _) = register_user(&client, "outsider").await;
    let resource = create_resource(&client, &admin, None).await;

    let created = book(
        &client,
        &owner,
        resource,
        "2031-01-15",
        "10:00",
        "11:00",
        vec![invitee_id],
    )
    .await;
    assert_eq!(created.status(), 201);
    let booking: Value = created.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().unwrap();
    assert_eq!(booking["attendees"][0]["status"], "pending");

    // Someone without an attendee row is not invited
    let not_invited = client
        .put(format!("{}/bookings/{}/rsvp", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", outsider))
        .json(&json!({"status": "accepted"}))
        .send()
        .await
        .expect("Failed to send rsvp");
    assert_eq!(not_invited.status(), 404);

    // "pending" is not a valid RSVP answer
    let invalid = client
        .put(format!("{}/bookings/{}/rsvp", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", invitee))
        .json(&json!({"status": "pending"}))
        .send()
        .await
        .expect("Failed to send rsvp");
    assert_eq!(invalid.status(), 400);

    // Accept, then decline: the stored status is the last call's argument
    let accept = client
        .put(format!("{}/bookings/{}/rsvp", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", invitee))
        .json(&json!({"status": "accepted"}))
        .send()
        .await
        .expect("Failed to send rsvp");
    assert!(accept.status().is_success());
    let body: Value = accept.json().await.expect("Failed to parse rsvp response");
    assert_eq!(body["my_rsvp_status"], "accepted");

    let decline = client
        .put(format!("{}/bookings/{}/rsvp", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", invitee))
        .json(&json!({"status": "declined"}))
        .send()
        .await
        .expect("Failed to send rsvp");
    let body: Value = decline.json().await.expect("Failed to parse rsvp response");
    assert_eq!(body["my_rsvp_status"], "declined");
}

#[tokio::test]
#[ignore]
async fn test_list_union_correctness() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (owner, owner_id) = register_user(&client, "unionowner").await;
    let (invitee, invitee_id) = register_user(&client, "unioninvitee").await;
    let resource = create_resource(&client, &admin, None).await;

    let created = book(
        &client,
        &owner,
        resource,
        "2031-01-15",
        "10:00",
        "11:00",
        vec![invitee_id],
    )
    .await;
    let booking: Value = created.json().await.expect("Failed to parse booking");
    let booking_id = booking["id"].as_i64().unwrap();

    // Owner sees the booking with is_owner = true
    let owner_list: Value = client
        .get(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .expect("Failed to list bookings")
        .json()
        .await
        .expect("Failed to parse list");
    let owner_rows: Vec<&Value> = owner_list
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["id"].as_i64() == Some(booking_id))
        .collect();
    assert_eq!(owner_rows.len(), 1);
    assert_eq!(owner_rows[0]["is_owner"], true);
    assert_eq!(owner_rows[0]["user_id"].as_i64(), Some(owner_id));

    // Invitee sees the same booking once, with is_owner = false and an RSVP status
    let invitee_list: Value = client
        .get(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", invitee))
        .send()
        .await
        .expect("Failed to list bookings")
        .json()
        .await
        .expect("Failed to parse list");
    let invitee_rows: Vec<&Value> = invitee_list
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["id"].as_i64() == Some(booking_id))
        .collect();
    assert_eq!(invitee_rows.len(), 1);
    assert_eq!(invitee_rows[0]["is_owner"], false);
    assert_eq!(invitee_rows[0]["my_rsvp_status"], "pending");
    assert_eq!(invitee_rows[0]["attendees"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_inactive_resource_not_bookable() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (token, _) = register_user(&client, "inactive").await;
    let resource = create_resource(&client, &admin, None).await;

    let delete = client
        .delete(format!("{}/resources/{}", BASE_URL, resource))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to delete resource");
    assert!(delete.status().is_success());

    let response = book(&client, &token, resource, "2031-01-15", "10:00", "11:00", vec![]).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_admin_listing_requires_admin() {
    let client = Client::new();
    let (token, _) = register_user(&client, "notadmin").await;

    let response = client
        .get(format!("{}/bookings/all", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let admin = admin_token(&client).await;
    let response = client
        .get(format!("{}/bookings/all", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}
