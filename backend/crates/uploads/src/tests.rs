//! Unit tests for the upload gate crate
//! Behavioural properties of the limiter plus the HTTP surface.

#[cfg(test)]
mod limiter_tests {
    use crate::application::config::UploadLimitConfig;
    use crate::application::limiter::UploadRateLimiter;
    use crate::domain::value_objects::{Identity, PlanTier};
    use crate::infra::memory::InMemoryRecordStore;
    use platform::clock::ManualClock;
    use std::sync::Arc;
    use std::time::Duration;

    fn limiter() -> (UploadRateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let limiter = UploadRateLimiter::with_store(
            InMemoryRecordStore::new(),
            UploadLimitConfig::default(),
            clock.clone(),
        )
        .unwrap();
        (limiter, clock)
    }

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    #[test]
    fn test_free_tier_admits_fifteen_then_rejects() {
        let (limiter, _clock) = limiter();
        let user = id("user1");

        for _ in 0..15 {
            assert!(limiter.check_and_consume(&user, PlanTier::Free).allowed());
        }

        let decision = limiter.check_and_consume(&user, PlanTier::Free);
        assert!(!decision.allowed());
        assert_eq!(decision.limit(), 15);
        assert_eq!(decision.remaining(), 0);
        assert!(decision.reset_in_ms() > 0);
        assert!(decision.reset_in_ms() <= 60_000);
    }

    #[test]
    fn test_pro_tier_admits_sixty_then_rejects() {
        let (limiter, _clock) = limiter();
        let user = id("agency-7");

        for _ in 0..60 {
            assert!(limiter.check_and_consume(&user, PlanTier::Pro).allowed());
        }
        let decision = limiter.check_and_consume(&user, PlanTier::Pro);
        assert!(!decision.allowed());
        assert_eq!(decision.limit(), 60);
    }

    #[test]
    fn test_repeated_rejections_do_not_count() {
        let (limiter, _clock) = limiter();
        let user = id("user1");

        for _ in 0..15 {
            limiter.check_and_consume(&user, PlanTier::Free);
        }
        for _ in 0..5 {
            let decision = limiter.check_and_consume(&user, PlanTier::Free);
            assert!(!decision.allowed());
            assert_eq!(decision.remaining(), 0);
        }
        assert_eq!(limiter.peek_status(&user, PlanTier::Free).count, 15);
    }

    #[test]
    fn test_window_rollover_starts_fresh() {
        let (limiter, clock) = limiter();
        let user = id("user1");

        for _ in 0..16 {
            limiter.check_and_consume(&user, PlanTier::Free);
        }

        clock.advance(Duration::from_millis(60_001));
        let decision = limiter.check_and_consume(&user, PlanTier::Free);
        assert!(decision.allowed());
        assert_eq!(decision.remaining(), 14);
    }

    #[test]
    fn test_identities_are_isolated() {
        let (limiter, _clock) = limiter();
        let owner = id("owner-a");
        let tenant = id("tenant-b");

        for _ in 0..16 {
            limiter.check_and_consume(&owner, PlanTier::Free);
        }

        let decision = limiter.check_and_consume(&tenant, PlanTier::Free);
        assert!(decision.allowed());
        assert_eq!(decision.remaining(), 14);
    }

    #[test]
    fn test_unknown_tier_gets_free_limit() {
        let (limiter, _clock) = limiter();
        let user = id("user1");
        let tier = PlanTier::resolve(Some("unknown_tier_xyz"));

        let first = limiter.check_and_consume(&user, tier);
        assert_eq!(first.limit(), 15);
        assert_eq!(first.remaining(), 14);

        for _ in 0..14 {
            limiter.check_and_consume(&user, tier);
        }
        assert!(!limiter.check_and_consume(&user, tier).allowed());
    }

    #[test]
    fn test_peek_is_stable_and_does_not_mutate() {
        let (limiter, clock) = limiter();
        let user = id("user1");

        for _ in 0..4 {
            limiter.check_and_consume(&user, PlanTier::Free);
        }
        clock.advance(Duration::from_secs(10));

        let first = limiter.peek_status(&user, PlanTier::Free);
        for _ in 0..5 {
            assert_eq!(limiter.peek_status(&user, PlanTier::Free), first);
        }
        assert_eq!(first.count, 4);
        assert_eq!(first.limit, 15);
        assert_eq!(first.reset_in_ms, 50_000);
        assert_eq!(first.percentage, 27);

        let decision = limiter.check_and_consume(&user, PlanTier::Free);
        assert_eq!(decision.remaining(), 10);
    }

    #[test]
    fn test_peek_never_opens_window() {
        let (limiter, clock) = limiter();
        let user = id("fresh");

        let status = limiter.peek_status(&user, PlanTier::Business);
        assert_eq!((status.count, status.reset_in_ms, status.percentage), (0, 0, 0));
        assert_eq!(limiter.tracked_identities(), 0);

        limiter.check_and_consume(&user, PlanTier::Business);
        clock.advance(Duration::from_secs(60));

        // Expired windows read as empty and are not rolled over by a peek
        let status = limiter.peek_status(&user, PlanTier::Business);
        assert_eq!((status.count, status.reset_in_ms, status.percentage), (0, 0, 0));
        assert_eq!(limiter.tracked_identities(), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (limiter, _clock) = limiter();
        let user = id("user1");

        limiter.reset(&user);
        assert_eq!(limiter.tracked_identities(), 0);

        for _ in 0..15 {
            limiter.check_and_consume(&user, PlanTier::Free);
        }
        limiter.reset(&user);
        limiter.reset(&user);
        assert_eq!(limiter.tracked_identities(), 0);

        let decision = limiter.check_and_consume(&user, PlanTier::Free);
        assert_eq!(decision.remaining(), 14);
    }

    #[test]
    fn test_cleanup_removes_only_expired() {
        let (limiter, clock) = limiter();
        let x = id("x");
        let y = id("y");

        limiter.check_and_consume(&x, PlanTier::Free);
        clock.advance(Duration::from_secs(40));
        limiter.check_and_consume(&y, PlanTier::Free);
        limiter.check_and_consume(&y, PlanTier::Free);
        clock.advance(Duration::from_secs(25));

        let before = limiter.peek_status(&y, PlanTier::Free);
        assert_eq!(limiter.cleanup_expired(), 1);
        let after = limiter.peek_status(&y, PlanTier::Free);

        assert_eq!(before.count, 2);
        assert_eq!(after.count, before.count);
        assert_eq!(limiter.tracked_identities(), 1);

        let decision = limiter.check_and_consume(&x, PlanTier::Free);
        assert_eq!(decision.remaining(), 14);
    }

    #[test]
    fn test_rejection_message_names_limit_and_seconds() {
        let (limiter, clock) = limiter();
        let user = id("user1");

        for _ in 0..15 {
            limiter.check_and_consume(&user, PlanTier::Free);
        }
        clock.advance(Duration::from_millis(17_500));

        let message = limiter
            .check_and_consume(&user, PlanTier::Free)
            .message()
            .unwrap();
        assert!(message.contains("15 uploads per minute"));
        assert!(message.contains("43 seconds"));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_objects::Decision;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use platform::client::CallerError;
    use platform::rate_limit::RateLimitSnapshot;

    #[test]
    fn test_error_into_response_status_codes() {
        let snapshot = RateLimitSnapshot {
            limit: 15,
            remaining: 0,
            reset_in_ms: 1_000,
            reset_at_ms: 1_000,
        };
        let test_cases: Vec<(UploadLimitError, StatusCode)> = vec![
            (UploadLimitError::EmptyIdentity, StatusCode::BAD_REQUEST),
            (
                UploadLimitError::MissingIdentity(CallerError::MissingHeader("x-user-id")),
                StatusCode::UNAUTHORIZED,
            ),
            (
                UploadLimitError::RateLimited(snapshot),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                UploadLimitError::InvalidConfig("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let decision = Decision::Rejected {
            limit: 15,
            reset_in_ms: 30_200,
            reset_at_ms: 1_700_000_030_200,
        };
        let response = UploadLimitError::from_decision(&decision)
            .unwrap()
            .into_response();

        let headers = response.headers();
        assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "15");
        assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "0");
        assert_eq!(headers.get("x-ratelimit-reset").unwrap(), "1700000030200");
        assert_eq!(headers.get("retry-after").unwrap(), "31");
    }

    #[test]
    fn test_admitted_decision_is_not_an_error() {
        let decision = Decision::Admitted {
            limit: 15,
            remaining: 3,
            reset_in_ms: 1,
            reset_at_ms: 1,
        };
        assert!(UploadLimitError::from_decision(&decision).is_none());
    }

    #[test]
    fn test_app_error_body_for_rate_limit() {
        let snapshot = RateLimitSnapshot {
            limit: 60,
            remaining: 0,
            reset_in_ms: 5_000,
            reset_at_ms: 5_000,
        };
        let app_error: crate::AppError = UploadLimitError::RateLimited(snapshot).into();
        let body = app_error.body();

        assert_eq!(body["code"], "RATE_LIMITED");
        assert_eq!(body["details"]["limit"], 60);
        assert_eq!(body["details"]["remaining"], 0);
        assert_eq!(body["details"]["resetIn"], 5_000);
        assert_eq!(
            body["error"],
            "Upload limit reached: 60 uploads per minute. Try again in 5 seconds."
        );
    }

    #[test]
    fn test_invalid_config_does_not_leak_details() {
        let app_error: crate::AppError =
            UploadLimitError::InvalidConfig("free tier must allow".into()).into();
        assert!(!app_error.message().contains("free tier"));
    }

    #[test]
    fn test_invalid_config_keeps_source_for_logs() {
        use std::error::Error;

        let app_error: crate::AppError =
            UploadLimitError::InvalidConfig("cleanup interval".into()).into();
        assert!(app_error.kind().is_server_error());
        let source = app_error.source().unwrap();
        assert!(source.to_string().contains("cleanup interval"));
    }

    #[test]
    fn test_caller_errors_are_client_errors() {
        let empty: crate::AppError = UploadLimitError::EmptyIdentity.into();
        let missing: crate::AppError =
            UploadLimitError::MissingIdentity(CallerError::MissingHeader("x-user-id")).into();

        assert_eq!(empty.code(), "VALIDATION_ERROR");
        assert_eq!(missing.code(), "UNAUTHORIZED");
        assert!(!empty.kind().is_server_error());
        assert!(!missing.kind().is_server_error());
    }
}

#[cfg(test)]
mod router_tests {
    use crate::application::config::UploadLimitConfig;
    use crate::application::limiter::UploadRateLimiter;
    use crate::infra::memory::InMemoryRecordStore;
    use crate::presentation::router::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use axum::routing::post;
    use platform::clock::ManualClock;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn limiter() -> Arc<UploadRateLimiter> {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        Arc::new(
            UploadRateLimiter::with_store(
                InMemoryRecordStore::new(),
                UploadLimitConfig::default(),
                clock,
            )
            .unwrap(),
        )
    }

    fn request(method: Method, uri: &str, user: Option<&str>, tier: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        if let Some(tier) = tier {
            builder = builder.header("x-plan-tier", tier);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_admits_and_reports_quota() {
        let app = upload_limit_router(limiter());

        let response = app
            .oneshot(request(Method::POST, "/check", Some("user1"), Some("pro")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-ratelimit-limit").unwrap(), "60");
        assert_eq!(response.headers().get("x-ratelimit-remaining").unwrap(), "59");

        let body = json(response).await;
        assert_eq!(body["allowed"], true);
        assert_eq!(body["limit"], 60);
        assert_eq!(body["remaining"], 59);
        assert_eq!(body["resetIn"], 60_000);
    }

    #[tokio::test]
    async fn test_check_rejects_sixteenth_free_upload() {
        let limiter = limiter();
        let app = upload_limit_router(limiter.clone());

        for _ in 0..15 {
            let response = app
                .clone()
                .oneshot(request(Method::POST, "/check", Some("user1"), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(request(Method::POST, "/check", Some("user1"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("retry-after").unwrap(), "60");

        let body = json(response).await;
        assert_eq!(body["code"], "RATE_LIMITED");
        assert_eq!(body["details"]["limit"], 15);
        assert_eq!(body["details"]["remaining"], 0);
        assert_eq!(body["details"]["resetIn"], 60_000);
    }

    #[tokio::test]
    async fn test_missing_and_empty_identity() {
        let app = upload_limit_router(limiter());

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/check", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(request(Method::POST, "/check", Some(""), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_status_does_not_consume() {
        let limiter = limiter();
        let app = upload_limit_router(limiter.clone());

        app.clone()
            .oneshot(request(Method::POST, "/check", Some("user1"), Some("business")))
            .await
            .unwrap();

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(request(Method::GET, "/status", Some("user1"), Some("business")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = json(response).await;
            assert_eq!(body["count"], 1);
            assert_eq!(body["limit"], 60);
            assert_eq!(body["percentage"], 2);
        }
    }

    #[tokio::test]
    async fn test_admin_reset() {
        let limiter = limiter();
        let app = upload_limit_router(limiter.clone());
        let admin = upload_limit_admin_router(limiter.clone());

        for _ in 0..16 {
            app.clone()
                .oneshot(request(Method::POST, "/check", Some("user1"), None))
                .await
                .unwrap();
        }

        let response = admin
            .clone()
            .oneshot(request(Method::DELETE, "/user1", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = admin
            .oneshot(request(Method::DELETE, "/nobody", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(request(Method::POST, "/check", Some("user1"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_gate_blocks_handler_when_exhausted() {
        let limiter = limiter();
        let uploads = Router::new().route("/attachments", post(|| async { StatusCode::CREATED }));
        let app = with_upload_gate(uploads, limiter.clone());

        for remaining in (0..15).rev() {
            let response = app
                .clone()
                .oneshot(request(Method::POST, "/attachments", Some("user1"), Some("free")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            assert_eq!(
                response.headers().get("x-ratelimit-remaining").unwrap(),
                remaining.to_string().as_str()
            );
        }

        let response = app
            .oneshot(request(Method::POST, "/attachments", Some("user1"), Some("free")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(limiter.tracked_identities(), 1);
    }
}
