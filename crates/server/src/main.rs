// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Form, Router,
    extract::State as AxumState,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tradepost_api::{
    ApiError, ChangePasswordRequest, LoginRequest, PasswordResetRequest, SignupRequest,
    change_password, login, logout, purge_expired_sessions, request_password_reset, signup,
};
use tradepost_audit::Cause;
use tradepost_forms::{
    ChangePasswordForm, FormErrors, LOGIN_FAILED, LoginForm, PasswordResetForm, REQUIRED_FIELD,
    SignupForm, USERNAME_TAKEN,
};
use tradepost_persistence::{PersistenceError, SqlitePersistence};

mod pages;
mod session;

use session::{MaybeSessionAccount, SESSION_COOKIE, SessionAccount};

/// Tradepost Server - HTTP server for the Tradepost account pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for accounts, sessions, and audit events.
    persistence: Arc<Mutex<SqlitePersistence>>,
}

/// Counter for request-scoped cause identifiers.
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Builds the audit cause for one handled request.
fn next_cause(description: &str) -> Cause {
    let request_id: u64 = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    Cause::new(format!("http-req-{request_id}"), description.to_string())
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Html(pages::error_page(&self.message))).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::DomainRuleViolation { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        tracing::error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Builds a 200 response with an HTML body.
fn html_ok(body: String) -> Response {
    Html(body).into_response()
}

/// Builds a 302 redirect that also sets the session cookie.
fn redirect_with_session(location: &str, session_token: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (
                header::SET_COOKIE,
                format!("{SESSION_COOKIE}={session_token}; Path=/; HttpOnly; SameSite=Lax"),
            ),
        ],
    )
        .into_response()
}

/// Builds a 302 redirect that clears the session cookie.
fn redirect_clearing_session(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (
                header::SET_COOKIE,
                format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
            ),
        ],
    )
        .into_response()
}

/// Handler for GET `/` (homepage).
async fn handle_homepage(MaybeSessionAccount(session): MaybeSessionAccount) -> Response {
    let account = session.as_ref().map(|SessionAccount(_, data, _)| data);
    html_ok(pages::homepage(account))
}

/// Handler for GET `/signup`.
async fn handle_signup_form() -> Response {
    html_ok(pages::signup_page(&SignupForm::default(), &FormErrors::new()))
}

/// Handler for POST `/signup`.
///
/// On success the new account is signed in and redirected to the homepage.
/// On validation failure the form re-renders with inline errors.
async fn handle_signup(
    AxumState(app_state): AxumState<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, HttpError> {
    info!("Handling signup request");

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(html_ok(pages::signup_page(&form, &errors))),
    };

    let request: SignupRequest = SignupRequest {
        username: data.username.value().to_string(),
        email: data.email.value().to_string(),
        password: data.password.clone(),
        password_confirmation: data.password.clone(),
        role: data.role.as_str().to_string(),
    };

    let mut persistence = app_state.persistence.lock().await;
    match signup(&mut persistence, &request, next_cause("Signup form submission")) {
        Ok(response) => {
            // Sign the new account in so the redirect lands on an
            // authenticated homepage.
            let login_response = login(
                &mut persistence,
                &LoginRequest {
                    username: request.username.clone(),
                    password: request.password.clone(),
                },
                next_cause("Login after signup"),
            )?;
            drop(persistence);

            info!(
                account_id = response.account_id,
                username = %response.username,
                "Signup succeeded"
            );
            Ok(redirect_with_session("/", &login_response.session_token))
        }
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "unique_username" => {
            let mut errors: FormErrors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            Ok(html_ok(pages::signup_page(&form, &errors)))
        }
        Err(ApiError::PasswordPolicyViolation { message }) => {
            let mut errors: FormErrors = FormErrors::new();
            errors.add("password2", &message);
            Ok(html_ok(pages::signup_page(&form, &errors)))
        }
        Err(ApiError::InvalidInput { field, message }) => {
            let mut errors: FormErrors = FormErrors::new();
            errors.add(&field, &message);
            Ok(html_ok(pages::signup_page(&form, &errors)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for GET `/login`.
async fn handle_login_form() -> Response {
    html_ok(pages::login_page(&LoginForm::default(), &FormErrors::new()))
}

/// Handler for POST `/login`.
///
/// Any credential failure renders the same generic message; responses
/// never reveal whether the username exists.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, HttpError> {
    info!("Handling login request");

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(html_ok(pages::login_page(&form, &errors))),
    };

    let mut persistence = app_state.persistence.lock().await;
    match login(
        &mut persistence,
        &LoginRequest {
            username: data.username,
            password: data.password,
        },
        next_cause("Login form submission"),
    ) {
        Ok(response) => {
            drop(persistence);
            Ok(redirect_with_session("/", &response.session_token))
        }
        Err(ApiError::AuthenticationFailed { reason }) => {
            warn!(reason = %reason, "Login failed");
            let mut errors: FormErrors = FormErrors::new();
            errors.add(pages::NON_FIELD, LOGIN_FAILED);
            Ok(html_ok(pages::login_page(&form, &errors)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for POST `/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_, account, token): SessionAccount,
) -> Result<Response, HttpError> {
    info!(username = %account.username, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    logout(
        &mut persistence,
        &token,
        &account,
        next_cause("Logout form submission"),
    )?;
    drop(persistence);

    Ok(redirect_clearing_session("/"))
}

/// Handler for GET `/change_password`.
async fn handle_change_password_form(_: SessionAccount) -> Response {
    html_ok(pages::change_password_page(&FormErrors::new(), None))
}

/// Handler for POST `/change_password`.
///
/// On success the page confirms the change; on mismatch the stored
/// credential is untouched and the form re-renders with the error.
async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_, account, token): SessionAccount,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, HttpError> {
    info!(username = %account.username, "Handling change_password request");

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(html_ok(pages::change_password_page(&errors, None))),
    };

    let request: ChangePasswordRequest = ChangePasswordRequest {
        new_password: data.new_password.clone(),
        new_password_confirmation: data.new_password,
    };

    let mut persistence = app_state.persistence.lock().await;
    match change_password(
        &mut persistence,
        &request,
        &account,
        &token,
        next_cause("Change password form submission"),
    ) {
        Ok(response) => Ok(html_ok(pages::change_password_page(
            &FormErrors::new(),
            Some(&response.message),
        ))),
        Err(ApiError::PasswordPolicyViolation { message }) => {
            let mut errors: FormErrors = FormErrors::new();
            errors.add("new_password2", &message);
            Ok(html_ok(pages::change_password_page(&errors, None)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for GET `/request_password`.
async fn handle_request_password_form(_: SessionAccount) -> Response {
    html_ok(pages::request_password_page(&FormErrors::new(), false))
}

/// Handler for POST `/request_password`.
///
/// The form only accepts the address on file for the signed-in account;
/// anything else is reported as missing input.
async fn handle_request_password(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_, account, _): SessionAccount,
    Form(form): Form<PasswordResetForm>,
) -> Result<Response, HttpError> {
    info!(username = %account.username, "Handling request_password request");

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return Ok(html_ok(pages::request_password_page(&errors, false))),
    };

    let request: PasswordResetRequest = PasswordResetRequest {
        email: data.email.value().to_string(),
    };

    let mut persistence = app_state.persistence.lock().await;
    match request_password_reset(
        &mut persistence,
        &request,
        &account,
        next_cause("Password reset form submission"),
    ) {
        Ok(response) => {
            drop(persistence);
            // Delivery is owned by the mail pipeline; the token itself
            // never appears in logs or markup.
            info!(
                expires_at = %response.expires_at,
                "Reset instructions queued for delivery"
            );
            Ok(html_ok(pages::request_password_page(
                &FormErrors::new(),
                true,
            )))
        }
        Err(ApiError::InvalidInput { field, .. }) if field == "email" => {
            let mut errors: FormErrors = FormErrors::new();
            errors.add("email", REQUIRED_FIELD);
            Ok(html_ok(pages::request_password_page(&errors, false)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_homepage))
        .route("/signup", get(handle_signup_form))
        .route("/signup", post(handle_signup))
        .route("/login", get(handle_login_form))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/change_password", get(handle_change_password_form))
        .route("/change_password", post(handle_change_password))
        .route("/request_password", get(handle_request_password_form))
        .route("/request_password", post(handle_request_password))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Tradepost server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    // Drop sessions that expired while the server was down
    purge_expired_sessions(&mut persistence)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Helper to POST a form-encoded body, optionally with a session cookie.
    async fn post_form(
        app: Router,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> axum::http::Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Helper to GET a page, optionally with a session cookie.
    async fn get_page(app: Router, uri: &str, cookie: Option<&str>) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Helper to read a response body as text.
    async fn body_text(response: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Helper to pull the `sessionid=...` pair out of a Set-Cookie header.
    fn session_cookie_from(response: &axum::http::Response<Body>) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie header missing")
            .to_str()
            .unwrap();
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair missing")
            .to_string()
    }

    const VALID_SIGNUP_BODY: &str = "username=testuser&password1=testpassword\
        &password2=testpassword&email=test%40example.com&type=distributor";

    /// Signs up the standard test account and returns its session cookie.
    async fn signup_test_account(app: Router) -> String {
        let response = post_form(app, "/signup", VALID_SIGNUP_BODY, None).await;
        assert_eq!(response.status(), HttpStatusCode::FOUND);
        session_cookie_from(&response)
    }

    #[tokio::test]
    async fn test_signup_with_valid_data_redirects_to_homepage() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        let response = post_form(app, "/signup", VALID_SIGNUP_BODY, None).await;

        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        // The account record exists with a hashed credential
        let mut persistence = app_state.persistence.lock().await;
        let account = persistence
            .get_account_by_username("testuser")
            .unwrap()
            .unwrap();
        assert_eq!(account.email, "test@example.com");
        assert_eq!(account.role, "distributor");
        assert_ne!(account.password_hash, "testpassword");
    }

    #[tokio::test]
    async fn test_signup_with_unknown_type_shows_required_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        let body = "username=testuser&password1=testpassword&password2=testpassword\
            &email=test%40example.com&type=invalid_type";
        let response = post_form(app, "/signup", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This field is required."));

        // No account was created
        let mut persistence = app_state.persistence.lock().await;
        assert_eq!(persistence.count_accounts().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_signup_with_missing_field_shows_required_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let body =
            "username=testuser&password1=testpassword&password2=testpassword&type=distributor";
        let response = post_form(app, "/signup", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This field is required."));
    }

    #[tokio::test]
    async fn test_signup_with_mismatched_passwords_shows_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let body = "username=testuser&password1=testpassword&password2=otherpassword\
            &email=test%40example.com&type=distributor";
        let response = post_form(app, "/signup", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("The two password fields didn&#x27;t match."));
    }

    #[tokio::test]
    async fn test_signup_with_taken_username_shows_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        post_form(app.clone(), "/signup", VALID_SIGNUP_BODY, None).await;

        let body = "username=testuser&password1=otherpassword&password2=otherpassword\
            &email=other%40example.com&type=retailer";
        let response = post_form(app, "/signup", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("A user with that username already exists."));
    }

    #[tokio::test]
    async fn test_login_with_correct_credentials_redirects_to_homepage() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        {
            let mut persistence = app_state.persistence.lock().await;
            persistence
                .create_account("testuser", "test@example.com", "testpassword", "distributor")
                .unwrap();
        }

        let body = "username=testuser&password=testpassword";
        let response = post_form(app, "/login", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(session_cookie_from(&response).starts_with("sessionid="));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_shows_generic_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        {
            let mut persistence = app_state.persistence.lock().await;
            persistence
                .create_account("testuser", "test@example.com", "testpassword", "distributor")
                .unwrap();
        }

        let body = "username=testuser&password=wrongpassword";
        let response = post_form(app, "/login", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Please enter a correct username and password."));
    }

    #[tokio::test]
    async fn test_login_with_unknown_username_shows_same_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let body = "username=nobody&password=testpassword";
        let response = post_form(app, "/login", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Please enter a correct username and password."));
    }

    #[tokio::test]
    async fn test_change_password_with_matching_fields_updates_credential() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let cookie = signup_test_account(app.clone()).await;

        let body = "new_password1=newpassword&new_password2=newpassword";
        let response = post_form(app, "/change_password", body, Some(&cookie)).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Your password has been successfully changed."));

        // The stored credential was updated
        let mut persistence = app_state.persistence.lock().await;
        let account = persistence
            .get_account_by_username("testuser")
            .unwrap()
            .unwrap();
        let hash = account.password_hash;
        assert!(persistence.verify_password("newpassword", &hash).unwrap());
        assert!(!persistence.verify_password("testpassword", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_change_password_with_mismatch_leaves_credential_unchanged() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let cookie = signup_test_account(app.clone()).await;

        let body = "new_password1=newpassword&new_password2=wrongpassword";
        let response = post_form(app, "/change_password", body, Some(&cookie)).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("The two password fields didn&#x27;t match."));

        // The stored credential is unchanged
        let mut persistence = app_state.persistence.lock().await;
        let account = persistence
            .get_account_by_username("testuser")
            .unwrap()
            .unwrap();
        let hash = account.password_hash;
        assert!(persistence.verify_password("testpassword", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_change_password_without_session_redirects_to_login() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let body = "new_password1=newpassword&new_password2=newpassword";
        let response = post_form(app, "/change_password", body, None).await;

        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_request_password_page_mentions_email() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let cookie = signup_test_account(app.clone()).await;

        let response = get_page(app, "/request_password", Some(&cookie)).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Check your email"));
    }

    #[tokio::test]
    async fn test_request_password_without_session_redirects_to_login() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = get_page(app, "/request_password", None).await;

        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_request_password_with_other_address_shows_required_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let cookie = signup_test_account(app.clone()).await;

        let response = post_form(
            app,
            "/request_password",
            "email=wrong%40example.com",
            Some(&cookie),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This field is required."));
    }

    #[tokio::test]
    async fn test_request_password_with_missing_address_shows_required_error() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let cookie = signup_test_account(app.clone()).await;

        let response = post_form(app, "/request_password", "", Some(&cookie)).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("This field is required."));
    }

    #[tokio::test]
    async fn test_request_password_with_address_on_file_issues_reset() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let cookie = signup_test_account(app.clone()).await;

        let response = post_form(
            app,
            "/request_password",
            "email=test%40example.com",
            Some(&cookie),
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Check your email"));

        // A reset was recorded for the account
        let mut persistence = app_state.persistence.lock().await;
        let account_id = persistence
            .get_account_by_username("testuser")
            .unwrap()
            .unwrap()
            .account_id;
        let events = persistence.get_audit_events_for_account(account_id).unwrap();
        assert!(
            events
                .iter()
                .any(|event| event.action.name == "RequestPasswordReset")
        );
    }

    #[tokio::test]
    async fn test_logout_invalidates_the_session() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let cookie = signup_test_account(app.clone()).await;

        let response = post_form(app.clone(), "/logout", "", Some(&cookie)).await;
        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        // The old cookie no longer authenticates
        let response = get_page(app, "/change_password", Some(&cookie)).await;
        assert_eq!(response.status(), HttpStatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_homepage_greets_signed_in_account() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let cookie = signup_test_account(app.clone()).await;

        let signed_in = body_text(get_page(app.clone(), "/", Some(&cookie)).await).await;
        assert!(signed_in.contains("Signed in as testuser"));

        let anonymous = body_text(get_page(app, "/", None).await).await;
        assert!(anonymous.contains("Log in"));
    }

    #[tokio::test]
    async fn test_every_successful_operation_is_audited() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let cookie = signup_test_account(app.clone()).await;

        post_form(
            app.clone(),
            "/change_password",
            "new_password1=newpassword&new_password2=newpassword",
            Some(&cookie),
        )
        .await;

        let mut persistence = app_state.persistence.lock().await;
        let account_id = persistence
            .get_account_by_username("testuser")
            .unwrap()
            .unwrap()
            .account_id;
        let events = persistence.get_audit_events_for_account(account_id).unwrap();
        let actions: Vec<&str> = events
            .iter()
            .map(|event| event.action.name.as_str())
            .collect();
        assert_eq!(actions, vec!["Signup", "Login", "ChangePassword"]);
    }
}
