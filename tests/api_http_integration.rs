//! Integration tests for the REST API.
//!
//! Drives the full router (auth middleware, CORS, timeout) with in-memory
//! repositories, a fixed clock, and mock gateway and mailer:
//! 1. Signup, signin and profile
//! 2. Trial lifecycle and access checks
//! 3. Order creation, payment verification and subscription expiry
//! 4. Contact form and health endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use async_trait::async_trait;
use chrono::Duration;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use flora_backend::adapters::auth::{Argon2PasswordHasher, JwtSessionService};
use flora_backend::adapters::email::MockContactMailer;
use flora_backend::adapters::http::{app_router, AppState, RouterOptions};
use flora_backend::adapters::memory::{InMemoryEntitlementRepository, InMemoryUserRepository};
use flora_backend::adapters::razorpay::MockPaymentGateway;
use flora_backend::application::EntitlementService;
use flora_backend::domain::entitlement::{compute_signature, PaymentVerifier, PriceTable};
use flora_backend::domain::foundation::{AuthError, AuthenticatedUser, FixedClock, Timestamp};
use flora_backend::ports::SessionValidator;

// =============================================================================
// Test Infrastructure
// =============================================================================

const KEY_SECRET: &str = "razorpay_integration_secret";
const JWT_SECRET: &str = "integration-jwt-secret-0123456789abcdef";

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
    gateway: MockPaymentGateway,
    mailer: MockContactMailer,
}

fn t0() -> Timestamp {
    Timestamp::from_unix_millis(1_717_200_000_000).unwrap()
}

/// Session validator whose backing key store is down.
struct UnavailableSessionValidator;

#[async_trait]
impl SessionValidator for UnavailableSessionValidator {
    async fn validate(&self, _token: &str) -> Result<AuthenticatedUser, AuthError> {
        Err(AuthError::service_unavailable("signing key not loaded"))
    }
}

fn test_app_with_mailer(mailer: MockContactMailer) -> TestApp {
    build_test_app(mailer, None)
}

fn build_test_app(
    mailer: MockContactMailer,
    session_validator: Option<Arc<dyn SessionValidator>>,
) -> TestApp {
    let clock = Arc::new(FixedClock::new(t0()));
    let users = Arc::new(InMemoryUserRepository::new());
    let entitlement_repository = Arc::new(InMemoryEntitlementRepository::new());
    let gateway = MockPaymentGateway::new("rzp_test_key");

    let entitlements = EntitlementService::new(
        entitlement_repository.clone(),
        users.clone(),
        Arc::new(gateway.clone()),
        PaymentVerifier::new(SecretString::new(KEY_SECRET.to_string())),
        PriceTable::default(),
        clock.clone(),
    );
    let sessions = Arc::new(JwtSessionService::new(
        SecretString::new(JWT_SECRET.to_string()),
        3600,
        "flora-backend",
        clock.clone(),
    ));

    let state = AppState {
        users,
        entitlement_repository,
        entitlements,
        hasher: Arc::new(Argon2PasswordHasher::for_tests()),
        token_issuer: sessions.clone(),
        session_validator: match session_validator {
            Some(validator) => validator,
            None => sessions,
        },
        mailer: Arc::new(mailer.clone()),
        clock: clock.clone(),
    };

    TestApp {
        router: app_router(state, RouterOptions::default()),
        clock,
        gateway,
        mailer,
    }
}

fn test_app() -> TestApp {
    test_app_with_mailer(MockContactMailer::new())
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn signup(&self, email: &str) {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({ "name": "Ada Lovelace", "email": email, "password": "engine42" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    async fn signin(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/signin",
                None,
                json!({ "email": email, "password": "engine42" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn signed_up_user(&self, email: &str) -> String {
        self.signup(email).await;
        self.signin(email).await
    }

    async fn create_order(&self, token: &str, plan: &str, cycle: &str) -> String {
        let (status, body) = self
            .post(
                "/api/payment/create-order",
                Some(token),
                json!({ "planType": plan, "billingCycle": cycle }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["orderId"].as_str().unwrap().to_string()
    }

    async fn verify(&self, token: &str, order_id: &str, payment_id: &str, signature: &str) -> (StatusCode, Value) {
        self.post(
            "/api/payment/verify-payment",
            Some(token),
            json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": payment_id,
                "razorpay_signature": signature,
                "planType": "individual",
                "billingCycle": "monthly",
            }),
        )
        .await
    }
}

fn sign(order_id: &str, payment_id: &str) -> String {
    compute_signature(KEY_SECRET.as_bytes(), order_id, payment_id).unwrap()
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn signup_then_signin_returns_session_and_profile() {
    let app = test_app();
    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Ada", "email": " Ada@Example.com ", "password": "engine42" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    let user_id = body["userId"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": "ada@example.com", "password": "engine42" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id.as_str());
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@example.com");
    let token = body["token"].as_str().unwrap();

    let (status, body) = app.get("/api/auth/get", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["planType"], "free");
    assert_eq!(body["hasAccess"], false);
    assert_eq!(body["hasUsedTrial"], false);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let app = test_app();
    app.signup("ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "name": "Other", "email": "ADA@example.com", "password": "engine42" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn signup_with_missing_fields_is_a_validation_error() {
    let app = test_app();
    let (status, body) = app
        .post("/api/auth/signup", None, json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = test_app();
    app.signup("ada@example.com").await;

    let (wrong_status, wrong_body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": "ada@example.com", "password": "wrong-password" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post(
            "/api/auth/signin",
            None,
            json!({ "email": "nobody@example.com", "password": "engine42" }),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["errorCode"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();
    for uri in [
        "/api/auth/get",
        "/api/auth/check-gpt-access",
        "/api/auth/trial-status",
        "/api/payment/subscription-status",
    ] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["errorCode"], "UNAUTHORIZED");
    }

    let (status, _) = app.get("/api/auth/get", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn legacy_token_header_is_accepted() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/check-gpt-access")
        .header("x-auth-token", token)
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn session_expires_after_an_hour() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    app.clock.advance(Duration::minutes(61));
    let (status, _) = app.get("/api/auth/get", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_token_does_not_block_public_routes() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    app.clock.advance(Duration::hours(2));

    let (status, body) = app
        .post(
            "/api/auth/signin",
            Some(&token),
            json!({ "email": "ada@example.com", "password": "engine42" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["token"].is_string());

    let (status, body) = app
        .post(
            "/api/auth/signup",
            Some("garbage"),
            json!({ "name": "Grace", "email": "grace@example.com", "password": "compiler" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = app
        .post(
            "/api/contact/send",
            Some("garbage"),
            json!({ "name": "Grace", "email": "grace@example.com", "message": "Hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn expired_token_on_protected_route_says_expired() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    app.clock.advance(Duration::hours(2));

    let (status, body) = app.get("/api/auth/check-gpt-access", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errorCode"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn unavailable_session_validator_is_503_on_protected_routes_only() {
    let app = build_test_app(
        MockContactMailer::new(),
        Some(Arc::new(UnavailableSessionValidator)),
    );

    let (status, body) = app.get("/api/auth/get", Some("any-token")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["errorCode"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Authentication service unavailable");

    let (status, _) = app
        .post(
            "/api/auth/signup",
            Some("any-token"),
            json!({ "name": "Ada", "email": "ada@example.com", "password": "engine42" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/payment/create-order")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signin")
        .body(Body::from(r#"{"email":"ada@example.com","password":"engine42"}"#))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");

    let (status, body) = app
        .post("/api/contact/send", None, json!({ "name": 42, "email": "grace@example.com", "message": "Hi" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    assert!(app.mailer.sent().is_empty());
}

// =============================================================================
// Trial
// =============================================================================

#[tokio::test]
async fn start_trial_grants_seven_days_of_access() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    let (status, body) = app.post("/api/auth/start-trial", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Free trial started successfully");
    assert_eq!(body["hasAccess"], true);
    assert_eq!(body["isTrialActive"], true);
    assert_eq!(body["daysRemaining"], 7);

    let (_, access) = app.get("/api/auth/check-gpt-access", Some(&token)).await;
    assert_eq!(access["hasAccess"], true);
    let (_, trial) = app.get("/api/auth/trial-status", Some(&token)).await;
    assert_eq!(trial, access);

    let (status, body) = app.post("/api/auth/start-trial", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "TRIAL_ALREADY_ACTIVE");
    assert_eq!(body["reason"], "active");
}

#[tokio::test]
async fn lapsed_trial_cannot_be_restarted() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    app.post("/api/auth/start-trial", Some(&token), json!({})).await;

    app.clock.advance(Duration::days(8));
    let token = app.signin("ada@example.com").await;

    let (status, body) = app.get("/api/auth/check-gpt-access", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasAccess"], false);
    assert_eq!(body["isTrialActive"], false);
    assert_eq!(body["hasUsedTrial"], true);
    assert_eq!(body["daysRemaining"], 0);

    let (status, body) = app.post("/api/auth/start-trial", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "TRIAL_ALREADY_USED");
    assert_eq!(body["reason"], "used");
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn create_order_prices_the_plan_in_paise() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    let (status, body) = app
        .post(
            "/api/payment/create-order",
            Some(&token),
            json!({ "planType": "group", "billingCycle": "annual" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["amount"], 1328 * 12 * 100);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["keyId"], "rzp_test_key");
    assert_eq!(body["planType"], "group");

    let requests = app.gateway.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].receipt.len() <= 40);
    assert_eq!(requests[0].notes.email, "ada@example.com");
}

#[tokio::test]
async fn custom_and_unknown_plans_are_rejected() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;

    for (plan, cycle) in [("custom", "monthly"), ("platinum", "monthly"), ("individual", "weekly")] {
        let (status, body) = app
            .post(
                "/api/payment/create-order",
                Some(&token),
                json!({ "planType": plan, "billingCycle": cycle }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", plan, cycle);
        assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    }
    assert!(app.gateway.requests().is_empty());
}

#[tokio::test]
async fn gateway_outage_is_503() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    app.gateway.fail_next("connection refused");

    let (status, body) = app
        .post(
            "/api/payment/create-order",
            Some(&token),
            json!({ "planType": "individual", "billingCycle": "monthly" }),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["errorCode"], "GATEWAY_ERROR");
}

#[tokio::test]
async fn verified_payment_activates_and_replay_is_idempotent() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    app.post("/api/auth/start-trial", Some(&token), json!({})).await;
    let order_id = app.create_order(&token, "individual", "monthly").await;

    let signature = sign(&order_id, "pay_001");
    let (status, body) = app.verify(&token, &order_id, "pay_001", &signature).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["replayed"], false);
    assert_eq!(body["hasPaidPlan"], true);
    assert_eq!(body["planType"], "individual");
    assert_eq!(body["paymentStatus"], "completed");
    assert_eq!(body["daysRemaining"], 30);

    let (_, access) = app.get("/api/auth/check-gpt-access", Some(&token)).await;
    assert_eq!(access["hasAccess"], true);
    assert_eq!(access["isTrialActive"], false);

    app.clock.advance(Duration::days(1));
    let token = app.signin("ada@example.com").await;
    let (status, body) = app.verify(&token, &order_id, "pay_001", &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replayed"], true);
    assert_eq!(body["daysRemaining"], 29);
}

#[tokio::test]
async fn tampered_signature_changes_nothing() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    let order_id = app.create_order(&token, "individual", "monthly").await;

    let mut signature = sign(&order_id, "pay_001");
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.replace_range(signature.len() - 1.., last);

    let (status, body) = app.verify(&token, &order_id, "pay_001", &signature).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "PAYMENT_VERIFICATION_FAILED");

    let (_, status_body) = app.get("/api/payment/subscription-status", Some(&token)).await;
    assert_eq!(status_body["hasPaidPlan"], false);
    assert_eq!(status_body["planType"], "free");
}

#[tokio::test]
async fn payment_for_another_users_order_is_refused() {
    let app = test_app();
    let owner = app.signed_up_user("owner@example.com").await;
    let other = app.signed_up_user("other@example.com").await;
    let order_id = app.create_order(&owner, "individual", "monthly").await;

    let (status, body) = app
        .verify(&other, &order_id, "pay_001", &sign(&order_id, "pay_001"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "PAYMENT_VERIFICATION_FAILED");

    let (_, status_body) = app.get("/api/payment/subscription-status", Some(&other)).await;
    assert_eq!(status_body["hasPaidPlan"], false);
}

#[tokio::test]
async fn monthly_subscription_lapses_after_thirty_days() {
    let app = test_app();
    let token = app.signed_up_user("ada@example.com").await;
    let order_id = app.create_order(&token, "individual", "monthly").await;
    let (status, _) = app
        .verify(&token, &order_id, "pay_001", &sign(&order_id, "pay_001"))
        .await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(Duration::days(31));
    let token = app.signin("ada@example.com").await;

    let (status, body) = app.get("/api/payment/subscription-status", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasPaidPlan"], false);
    assert_eq!(body["paymentStatus"], "pending");
    assert_eq!(body["daysRemaining"], 0);
    assert!(body["lastPaymentDate"].is_string());

    let (_, access) = app.get("/api/auth/check-gpt-access", Some(&token)).await;
    assert_eq!(access["hasAccess"], false);
}

// =============================================================================
// Contact and health
// =============================================================================

#[tokio::test]
async fn contact_form_is_delivered() {
    let app = test_app();
    let (status, body) = app
        .post(
            "/api/contact/send",
            None,
            json!({ "name": "Grace", "email": "grace@example.com", "message": "Hello <there>" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email sent successfully");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Grace");
    assert_eq!(sent[0].message, "Hello <there>");
}

#[tokio::test]
async fn contact_form_validates_and_reports_delivery_failure() {
    let app = test_app();
    let (status, body) = app
        .post("/api/contact/send", None, json!({ "name": "Grace", "email": "grace@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");

    let app = test_app_with_mailer(MockContactMailer::failing("smtp down"));
    let (status, body) = app
        .post(
            "/api/contact/send",
            None,
            json!({ "name": "Grace", "email": "grace@example.com", "message": "Hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["errorCode"], "MAIL_DELIVERY_FAILED");
}

#[tokio::test]
async fn health_and_banner() {
    let app = test_app();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Flora API is running".to_string()));
}
