//! Integration tests for the chat API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use serial_test::serial;
    use tower::util::ServiceExt;

    use slotbot::chat::{get_or_create_session, insert_chat_message};
    use slotbot::openai::{Message, Role};

    use crate::test_utils::{body_to_string, test_app};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests getting chat sessions returns empty list initially
    #[tokio::test]
    #[serial]
    async fn it_gets_empty_chat_sessions() {
        let app = test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/sessions"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"sessions\":[]"));
        assert!(body.contains("\"total_sessions\":0"));
    }

    /// Tests getting chat sessions with pagination
    #[tokio::test]
    #[serial]
    async fn it_gets_chat_sessions_with_pagination() {
        let app = test_app().await;

        for i in 0..3 {
            let session_id = format!("session-{}", i);
            get_or_create_session(&app.db, &session_id, Some("Priya"))
                .await
                .unwrap();
            insert_chat_message(&app.db, &session_id, &Message::new(Role::User, "Hello"))
                .await
                .unwrap();
        }

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/sessions?page=2&limit=2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["total_sessions"], 3);
        assert_eq!(body["total_pages"], 2);
        let sessions = body["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        // Newest first, so the last page holds the oldest session
        assert_eq!(sessions[0]["id"], "session-0");
        assert_eq!(sessions[0]["title"], "Booking by Priya");
    }

    /// Tests huge paging values give an empty page instead of an error
    #[tokio::test]
    #[serial]
    async fn it_handles_huge_paging_values() {
        let app = test_app().await;

        get_or_create_session(&app.db, "session-1", None)
            .await
            .unwrap();

        let uri = format!(
            "/api/chat/sessions?page={}&limit={}",
            usize::MAX,
            usize::MAX
        );
        let response = app.router.clone().oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["limit"], 100);
        assert_eq!(body["total_sessions"], 1);
        assert_eq!(body["sessions"], json!([]));
    }

    /// Tests fetching the transcript of a session
    #[tokio::test]
    #[serial]
    async fn it_gets_a_session_transcript() {
        let app = test_app().await;

        get_or_create_session(&app.db, "session-1", None)
            .await
            .unwrap();
        insert_chat_message(&app.db, "session-1", &Message::new(Role::User, "Book 3pm"))
            .await
            .unwrap();
        insert_chat_message(
            &app.db,
            "session-1",
            &Message::new(Role::Assistant, "Meeting booked!"),
        )
        .await
        .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/session-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(
            body["transcript"],
            json!([
                {"role": "user", "content": "Book 3pm"},
                {"role": "assistant", "content": "Meeting booked!"}
            ])
        );
    }

    /// Tests a missing session is not found
    #[tokio::test]
    #[serial]
    async fn it_returns_not_found_for_unknown_session() {
        let app = test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/does-not-exist"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests setting and reading back the selected session
    #[tokio::test]
    #[serial]
    async fn it_remembers_the_selected_session() {
        let app = test_app().await;

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/selected"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        assert_eq!(body, r#"{"session_id":null}"#);

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat/selected")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"session_id": "session-7"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .clone()
            .oneshot(get("/api/chat/selected"))
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        assert_eq!(body, r#"{"session_id":"session-7"}"#);
    }
}
