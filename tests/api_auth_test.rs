//! Integration tests for connecting the Google calendar

mod test_utils;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serial_test::serial;
    use tower::util::ServiceExt;

    use slotbot::google::token_store::{SqliteTokenStore, TokenStore};

    use crate::test_utils::{BOOKING_REPLY, FakeCalendar, FakeModel, body_to_string, test_app, test_app_with};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests the consent URL carries the configured client
    #[tokio::test]
    #[serial]
    async fn it_returns_the_authorization_url() {
        let app = test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/auth/url"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("access_type=offline"));
    }

    /// Tests the callback needs an authorization code
    #[tokio::test]
    #[serial]
    async fn it_rejects_a_callback_without_code() {
        let app = test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/auth/callback?error=access_denied"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_string(response.into_body()).await;
        assert_eq!(body, "access_denied");
    }

    /// Tests the callback exchanges the code and stores the token
    #[tokio::test]
    #[serial]
    async fn it_stores_the_token_from_the_callback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("client_id".into(), "test_client_id".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"ya29.token","expires_in":3599,"refresh_token":"1//refresh","token_type":"Bearer"}"#,
            )
            .create_async()
            .await;

        let token_url = format!("{}/token", server.url());
        let app = test_app_with(
            FakeModel::replying(BOOKING_REPLY),
            FakeCalendar::free(),
            |config| {
                config.google_token_url = token_url;
                config.calendar_timeout = Duration::from_secs(5);
            },
        )
        .await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/auth/callback?code=auth-code"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["status"], "connected");
        assert_eq!(body["account"], app.config.calendar_account.as_str());
        mock.assert_async().await;

        let stored = SqliteTokenStore::new(app.db.clone())
            .load(&app.config.calendar_account)
            .await
            .unwrap()
            .expect("Token was not stored");
        assert_eq!(stored.refresh_token, "1//refresh");
        assert_eq!(stored.access_token.as_deref(), Some("ya29.token"));
    }

    /// Tests a failed exchange stores nothing
    #[tokio::test]
    #[serial]
    async fn it_stores_nothing_when_the_exchange_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let token_url = format!("{}/token", server.url());
        let app = test_app_with(
            FakeModel::replying(BOOKING_REPLY),
            FakeCalendar::free(),
            |config| config.google_token_url = token_url,
        )
        .await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/auth/callback?code=stale-code"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let stored = SqliteTokenStore::new(app.db.clone())
            .load(&app.config.calendar_account)
            .await
            .unwrap();
        assert!(stored.is_none());
    }
}
