use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use clubdesk_auth::{Role, View};
use clubdesk_client::{ApiClient, ApiError, ClientConfig, CredentialStore, MemoryCredentialStore};
use clubdesk_console::cli::{Command, MemberCommand, PageArgs, ProfileCommand, ReportCommand};
use clubdesk_console::{Console, ConsoleError, Screen};
use clubdesk_events::SessionSignals;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const SECRET: &str = "flow-secret";

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    role: String,
    exp: i64,
}

fn mint_jwt(username: &str) -> String {
    let role = if username == "admin" { "ADMIN" } else { "USER" };
    let claims = TokenClaims {
        sub: username.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Fake club API. Flipping `revoked` makes it reject every credential.
#[derive(Clone, Default)]
struct FakeApi {
    revoked: Arc<AtomicBool>,
}

impl FakeApi {
    fn authorize(&self, headers: &HeaderMap) -> Result<TokenClaims, Response> {
        if self.revoked.load(Ordering::SeqCst) {
            return Err(StatusCode::UNAUTHORIZED.into_response());
        }
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| StatusCode::UNAUTHORIZED.into_response())?;

        jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|_| StatusCode::UNAUTHORIZED.into_response())
    }
}

fn adherent_json(id: i64, first_name: &str) -> Value {
    json!({
        "id": id,
        "firstName": first_name,
        "lastName": "Martin",
        "email": format!("{}@club.fr", first_name.to_lowercase()),
        "dateOfBirth": "1988-04-02",
        "status": "ACTIVE"
    })
}

async fn login(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"}))).into_response();
    }
    api.revoked.store(false, Ordering::SeqCst);
    let username = body["username"].as_str().unwrap_or_default();
    Json(json!({ "token": mint_jwt(username) })).into_response()
}

async fn adherents(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    match api.authorize(&headers) {
        Ok(claims) if claims.role == "ADMIN" => Json(json!({
            "content": [adherent_json(1, "Alice"), adherent_json(2, "Bruno")],
            "totalElements": 2,
            "totalPages": 1,
            "size": 10,
            "number": 0
        }))
        .into_response(),
        Ok(_) => StatusCode::FORBIDDEN.into_response(),
        Err(rejection) => rejection,
    }
}

async fn profile(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    match api.authorize(&headers) {
        Ok(claims) => Json(adherent_json(7, &claims.sub)).into_response(),
        Err(rejection) => rejection,
    }
}

async fn general_statistics(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    match api.authorize(&headers) {
        Ok(_) => Json(json!({
            "totalAdherents": 2,
            "activeAdherents": 2,
            "suspendedAdherents": 0,
            "expiredAdherents": 0
        }))
        .into_response(),
        Err(rejection) => rejection,
    }
}

struct TestServer {
    base_url: String,
    api: FakeApi,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let api = FakeApi::default();
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/adherents", get(adherents))
            .route("/profile", get(profile))
            .route("/reports/general-statistics", get(general_statistics))
            .with_state(api.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, api, handle }
    }

    fn console(&self) -> (Console, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        let client = ApiClient::new(
            &ClientConfig::new(&self.base_url),
            store.clone(),
            Arc::new(SessionSignals::new()),
        )
        .unwrap();
        (Console::new(client), store)
    }

    fn revoke_all(&self) {
        self.api.revoked.store(true, Ordering::SeqCst);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn login_as(username: &str) -> Command {
    Command::Login {
        username: username.to_string(),
        password: "secret".to_string(),
    }
}

fn list_members() -> Command {
    Command::Members(MemberCommand::List {
        page: PageArgs { page: 0, size: 10 },
        status: None,
        subscription_type: None,
    })
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("clubdesk-flow-{}", std::process::id()))
        .join(name)
}

#[tokio::test]
async fn admin_logs_in_and_lists_members() {
    let srv = TestServer::spawn().await;
    let (mut console, _store) = srv.console();

    let out = console.execute(login_as("admin")).await.unwrap();
    assert_eq!(out, "Logged in as admin (ADMIN).");
    assert_eq!(console.session().role(), Some(Role::Admin));

    let out = console.execute(list_members()).await.unwrap();
    assert!(out.contains("Alice Martin"));
    assert!(out.contains("Bruno Martin"));
    assert_eq!(console.session().members().map(|page| page.content.len()), Some(2));
}

#[tokio::test]
async fn member_sees_access_denied_and_hidden_panels() {
    let srv = TestServer::spawn().await;
    let (mut console, _store) = srv.console();
    console.execute(login_as("bob")).await.unwrap();

    let err = console.execute(list_members()).await.unwrap_err();
    match &err {
        ConsoleError::Blocked { screen, message } => {
            assert_eq!(*screen, Screen::AccessDenied { back_to: View::Profile });
            assert!(message.starts_with("Access denied"));
        }
        other => panic!("expected access denied, got {other:?}"),
    }

    let err = console
        .execute(Command::Reports(ReportCommand::General))
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Blocked { screen: Screen::Hidden, ref message } if message.is_empty()));

    let out = console
        .execute(Command::Profile(ProfileCommand::Show))
        .await
        .unwrap();
    assert!(out.contains("bob@club.fr"));
}

#[tokio::test]
async fn revoked_credential_resets_the_session() {
    let srv = TestServer::spawn().await;
    let (mut console, store) = srv.console();
    console.execute(login_as("admin")).await.unwrap();
    console.execute(list_members()).await.unwrap();

    srv.revoke_all();
    let err = console.execute(list_members()).await.unwrap_err();

    assert!(matches!(err, ConsoleError::Api(ApiError::SessionExpired)));
    assert!(!console.session().is_authenticated());
    assert!(console.session().members().is_none());
    assert!(store.get().is_none());
    assert_eq!(console.execute(Command::Whoami).await.unwrap(), "Not logged in.");

    // Logging in again starts a clean session.
    console.execute(login_as("admin")).await.unwrap();
    let out = console
        .execute(Command::Reports(ReportCommand::General))
        .await
        .unwrap();
    assert!(out.contains("members:    2"));
}

#[tokio::test]
async fn bad_password_keeps_the_session_closed() {
    let srv = TestServer::spawn().await;
    let (mut console, store) = srv.console();

    let err = console
        .execute(Command::Login {
            username: "admin".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Api(ApiError::Unauthorized)));
    assert!(!console.session().is_authenticated());
    assert!(store.get().is_none());
}

#[tokio::test]
async fn file_backed_session_survives_restarts() {
    let srv = TestServer::spawn().await;
    let path = scratch_file("credentials.json");
    let _ = std::fs::remove_file(&path);
    let config = ClientConfig::new(&srv.base_url).credentials_path(&path);

    let mut first = Console::connect(&config).unwrap();
    first.execute(login_as("admin")).await.unwrap();
    drop(first);

    let mut second = Console::connect(&config).unwrap();
    assert_eq!(second.session().role(), Some(Role::Admin));
    assert!(second.execute(list_members()).await.is_ok());

    second.execute(Command::Logout).await.unwrap();
    let third = Console::connect(&config).unwrap();
    assert!(!third.session().is_authenticated());

    let _ = std::fs::remove_file(&path);
}
