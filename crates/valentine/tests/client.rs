//! End-to-end tests for the client against a mock backend.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use valentine::prelude::*;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =========================================================================
// Helpers
// =========================================================================

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let session = Arc::new(SessionStore::open(MemoryStorage::new()).unwrap());
    let client = Client::new(&ClientConfig::with_base_url(server.uri()), session).unwrap();
    (server, client)
}

/// Records every session notification.
fn record(client: &Client) -> (Arc<Mutex<Vec<bool>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = client.session().subscribe(move |state| sink.lock().push(state));
    (seen, sub)
}

fn login(client: &Client, token: &str) {
    client
        .session()
        .set_credential(Credential::new(token).unwrap())
        .unwrap();
}

// =========================================================================
// authenticate
// =========================================================================

#[tokio::test]
async fn test_authenticate_success_stores_credential() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("username=alice&password=correctpw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "abc", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (seen, _sub) = record(&client);
    let credential = client.authenticate("alice", "correctpw").await.unwrap();

    assert_eq!(credential, "abc");
    assert_eq!(client.session().get_credential().unwrap(), "abc");
    assert!(client.session().is_logged_in());
    assert_eq!(*seen.lock(), vec![true]);
}

#[tokio::test]
async fn test_authenticate_rejected_leaves_session_empty() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect password"})),
        )
        .mount(&server)
        .await;

    let (seen, _sub) = record(&client);
    let err = client.authenticate("alice", "wrongpw").await.unwrap_err();

    assert!(matches!(err, AccountError::InvalidCredentials(_)));
    assert_eq!(err.to_string(), "invalid username or password");
    assert!(client.session().get_credential().is_none());
    assert!(!client.session().is_logged_in());
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_authenticate_400_is_invalid_credentials() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = client.authenticate("nobody", "pw").await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidCredentials(_)));
}

#[tokio::test]
async fn test_authenticate_server_error_is_transport() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.authenticate("alice", "pw").await.unwrap_err();
    assert!(matches!(err, AccountError::Transport(_)));
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_authenticate_blank_field_never_sends() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.authenticate("alice", "").await.unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));
    assert!(err.to_string().contains("password"));
}

#[tokio::test]
async fn test_authenticate_whitespace_password_is_sent_as_typed() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("username=alice&password=+++"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "abc", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.authenticate("alice", "   ").await.unwrap();
    assert!(client.session().is_logged_in());
}

// =========================================================================
// register
// =========================================================================

#[tokio::test]
async fn test_register_success_returns_account_without_login() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .and(body_json(json!({
            "username": "bob",
            "password": "pw",
            "display_name": "Bob B."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "username": "bob",
            "display_name": "Bob B."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = client.register("bob", "pw", "Bob B.").await.unwrap();
    assert_eq!(account.username, "bob");
    assert_eq!(account.display_name.as_deref(), Some("Bob B."));
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_register_duplicate_is_signup_failed() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Username already registered"})),
        )
        .mount(&server)
        .await;
    login(&client, "existing");

    let (seen, _sub) = record(&client);
    let err = client.register("bob", "pw", "Bob B.").await.unwrap_err();

    assert!(matches!(err, AccountError::SignupFailed(_)));
    assert!(err.to_string().starts_with("signup failed"));
    assert_eq!(client.session().get_credential().unwrap(), "existing");
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_register_blank_field_never_sends() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for (user, pw, name) in [("", "pw", "Bob"), ("bob", "", "Bob"), ("bob", "pw", " ")] {
        let err = client.register(user, pw, name).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }
}

// =========================================================================
// Profiles
// =========================================================================

#[tokio::test]
async fn test_fetch_profile_unknown_user_is_absent() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/carol"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "User not found"})))
        .mount(&server)
        .await;

    let err = client.fetch_profile("carol").await.unwrap_err();
    assert!(!err.is_session_lost());
    assert!(client.load_profile("carol").await.is_none());

    let party = client.celebrate("carol").await;
    assert!(party.profile.is_none());
    assert_eq!(party.message(), "Yay, carol! Happy Valentine's Day!");
}

#[tokio::test]
async fn test_fetch_profile_sends_bearer_and_decodes() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/dave"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "username": "dave",
            "display_name": "Dave D."
        })))
        .expect(1)
        .mount(&server)
        .await;
    login(&client, "abc");

    let profile = client.fetch_profile("dave").await.unwrap();
    assert_eq!(profile.greeting_name(), "Dave D.");
}

#[tokio::test]
async fn test_fetch_profile_encodes_username() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "username": "a b"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let party = client.celebrate("a b").await;
    assert_eq!(party.display_name(), "a b");
}

// =========================================================================
// Authorization loss
// =========================================================================

#[tokio::test]
async fn test_current_user_401_clears_session() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;
    login(&client, "stale");

    let (seen, _sub) = record(&client);
    let err = client.current_user().await.unwrap_err();

    assert!(err.is_session_lost());
    assert!(err.to_string().contains("401"));
    assert!(!client.session().is_logged_in());
    assert_eq!(*seen.lock(), vec![false]);

    // Protected views now bounce to login.
    assert_eq!(
        guard(Route::parse("/interactive/alice"), client.session()),
        Route::Login
    );
}

#[tokio::test]
async fn test_logout_clears_and_is_idempotent() {
    let (_server, client) = setup().await;
    login(&client, "abc");

    let (seen, _sub) = record(&client);
    client.logout();
    client.logout();

    assert!(!client.session().is_logged_in());
    assert_eq!(*seen.lock(), vec![false]);
}
