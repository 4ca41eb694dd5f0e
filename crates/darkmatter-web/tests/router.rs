//! End-to-end tests of the router with stub identity and folding backends.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use darkmatter_auth::{AuthError, Credentials, IdentityGateway, IdentityProvider, ProviderErrorCode};
use darkmatter_fold::{ExamplePreset, FoldError, DEFAULT_SEQUENCE, PredictionPipeline, ScratchSpace, StructurePredictor};
use darkmatter_web::{router::build_router, session::SESSION_COOKIE, state::AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct-horse";

/// Four CA atoms with plDDT 10, 20, 30, 40.
const FOUR_RESIDUES: &str = "\
ATOM      1  CA  MET A   1       0.000   0.000   0.000  1.00 10.00           C
ATOM      2  CA  LYS A   2       3.800   0.000   0.000  1.00 20.00           C
ATOM      3  CA  THR A   3       7.600   0.000   0.000  1.00 30.00           C
ATOM      4  CA  ALA A   4      11.400   0.000   0.000  1.00 40.00           C
TER       5      ALA A   4
END
";

struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_in(&self, c: &Credentials) -> Result<(), AuthError> {
        if c.email == EMAIL && c.password() == PASSWORD {
            Ok(())
        } else {
            Err(AuthError::Provider(ProviderErrorCode::InvalidLoginCredentials))
        }
    }

    async fn create_account(&self, c: &Credentials) -> Result<(), AuthError> {
        if c.email == EMAIL {
            Err(AuthError::Provider(ProviderErrorCode::EmailExists))
        } else {
            Ok(())
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if email == EMAIL {
            Ok(())
        } else {
            Err(AuthError::Provider(ProviderErrorCode::EmailNotFound))
        }
    }
}

/// Folds any non-empty sequence into FOUR_RESIDUES; an empty one gets an error body.
struct StubFold;

#[async_trait]
impl StructurePredictor for StubFold {
    async fn fold(&self, sequence: &str) -> Result<String, FoldError> {
        if sequence.is_empty() {
            Ok("{\"message\": \"sequence is empty\"}".to_string())
        } else {
            Ok(FOUR_RESIDUES.to_string())
        }
    }
}

struct TestApp {
    router: Router,
    scratch: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = PredictionPipeline::new(Arc::new(StubFold), ScratchSpace::new(scratch.path()));
        let identity = IdentityGateway::new(Arc::new(StubIdentity));
        let state = AppState::new(identity, pipeline, Duration::from_secs(3600)).unwrap();
        Self { router: build_router(state, "static"), scratch }
    }

    async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, form: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: &str) -> Response {
        self.send(Method::GET, uri, Some(cookie), None).await
    }

    async fn post(&self, uri: &str, cookie: &str, form: &str) -> Response {
        self.send(Method::POST, uri, Some(cookie), Some(form)).await
    }

    /// A fresh session cookie, already logged in.
    async fn logged_in(&self) -> String {
        let cookie = session_cookie(&self.send(Method::GET, "/login", None, None).await);
        let res = self.post("/login", &cookie, &login_form(EMAIL, PASSWORD)).await;
        assert_eq!(location(&res), Some("/"));
        cookie
    }

    fn scratch_file(&self, cookie: &str) -> PathBuf {
        let id = cookie.trim_start_matches(&format!("{}=", SESSION_COOKIE));
        self.scratch.path().join(format!("{}.pdb", id))
    }
}

fn session_cookie(res: &Response) -> String {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string()
}

fn location(res: &Response) -> Option<&str> {
    res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

fn login_form(email: &str, password: &str) -> String {
    format!("email={}&password={}", email.replace('@', "%40"), password)
}

async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_new_client_lands_on_login() {
    let app = TestApp::new();
    let res = app.send(Method::GET, "/", None, None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/login"));

    let cookie = session_cookie(&res);
    let res = app.get("/fold", &cookie).await;
    assert_eq!(location(&res), Some("/login"));

    let res = app.get("/signup", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("At least 6 characters"));
}

#[tokio::test]
async fn test_failed_login_shows_generic_warning() {
    let app = TestApp::new();
    let cookie = session_cookie(&app.send(Method::GET, "/login", None, None).await);

    let res = app.post("/login", &cookie, &login_form(EMAIL, "wrong")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("Invalid email or password"));
    assert!(page.contains(EMAIL));

    let res = app.get("/", &cookie).await;
    assert_eq!(location(&res), Some("/login"));
}

#[tokio::test]
async fn test_login_redirects_home_with_notice() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    let page = body_text(app.get("/", &cookie).await).await;
    assert!(page.contains("Successfully logged in!"));
    assert!(page.contains("Dark Matter"));

    // Flash is shown once.
    let page = body_text(app.get("/", &cookie).await).await;
    assert!(!page.contains("Successfully logged in!"));

    // Auth screens are not reachable once logged in.
    let res = app.get("/login", &cookie).await;
    assert_eq!(location(&res), Some("/"));
}

#[tokio::test]
async fn test_sign_up_and_reset_notices() {
    let app = TestApp::new();
    let cookie = session_cookie(&app.send(Method::GET, "/login", None, None).await);

    let page = body_text(app.post("/signup", &cookie, &login_form(EMAIL, "secret1")).await).await;
    assert!(page.contains("Email already exists!"));

    let page = body_text(app.post("/signup", &cookie, &login_form("new%40example.com", "secret1")).await).await;
    assert!(page.contains("Successfully created account! Try login"));

    // Signing up never logs in.
    assert_eq!(location(&app.get("/", &cookie).await), Some("/login"));

    let page = body_text(app.post("/forgot-password", &cookie, "email=ghost%40example.com").await).await;
    assert!(page.contains("Unregistered email. Try again!"));

    let page = body_text(app.post("/forgot-password", &cookie, "email=ada%40example.com").await).await;
    assert!(page.contains("Email sent!"));
}

#[tokio::test]
async fn test_fold_page_starts_on_placeholder_with_default_sequence() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    let page = body_text(app.get("/fold", &cookie).await).await;
    assert!(page.contains(r#"<option value="" disabled selected>Choose an example...</option>"#));
    assert!(page.contains(&format!(">{}</textarea>", DEFAULT_SEQUENCE)));
    assert!(!page.contains(r#"<option value="1" selected>"#));

    // Picking example 1 replaces the default and moves the selection.
    let page = body_text(app.get("/fold?example=1", &cookie).await).await;
    assert!(page.contains(&format!(">{}</textarea>", ExamplePreset::One.sequence())));
    assert!(page.contains(r#"<option value="1" selected>"#));
    assert!(page.contains(r#"<option value="" disabled>Choose an example...</option>"#));
}

#[tokio::test]
async fn test_preset_two_replaces_default() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    let page = body_text(app.get("/fold?example=2", &cookie).await).await;
    assert!(page.contains(ExamplePreset::Two.sequence()));
    assert!(page.contains("Enter protein sequence data!"));
}

#[tokio::test]
async fn test_prediction_and_download_match_scratch() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    let res = app.post("/fold", &cookie, "sequence=MKTA").await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("plDDT: 25.0"));
    assert!(page.contains("plDDT is a per-residue estimate of the confidence in prediction on a scale from 0-100."));
    assert!(page.contains("Download PDB"));

    let res = app.get("/fold/download", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"predicted.pdb\""
    );
    let downloaded = body_text(res).await;
    assert_eq!(downloaded, FOUR_RESIDUES);
    assert_eq!(std::fs::read_to_string(app.scratch_file(&cookie)).unwrap(), downloaded);
}

#[tokio::test]
async fn test_empty_sequence_reports_zero_models() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    app.post("/fold", &cookie, "sequence=MKTA").await;
    let res = app.post("/fold", &cookie, "sequence=").await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("The file has 0 models, the given model 1 does not exist."));
    assert!(page.contains("Try another sequence!"));
    assert!(!page.contains("plDDT: "));

    // The failed submission cleared the earlier result.
    assert_eq!(app.get("/fold/download", &cookie).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let app = TestApp::new();
    let cookie = app.logged_in().await;

    let res = app.send(Method::POST, "/logout", Some(&cookie), None).await;
    assert_eq!(location(&res), Some("/login"));
    assert_eq!(location(&app.get("/fold", &cookie).await), Some("/login"));

    // Logging out twice is harmless.
    let res = app.send(Method::POST, "/logout", Some(&cookie), None).await;
    assert_eq!(location(&res), Some("/login"));
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let app = TestApp::new();
    let alice = app.logged_in().await;
    let bob = session_cookie(&app.send(Method::GET, "/login", None, None).await);
    assert_ne!(alice, bob);

    app.post("/fold", &alice, "sequence=MKTA").await;
    assert_eq!(location(&app.get("/fold", &bob).await), Some("/login"));
    assert!(app.scratch_file(&alice).exists());
    assert!(!app.scratch_file(&bob).exists());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let res = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["status"], "ok");
}
