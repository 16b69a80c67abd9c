mod common;

use axum::http::StatusCode;
use common::{location, ADMIN_PASSWORD, ADMIN_USERNAME};

#[tokio::test]
async fn login_success_redirects_to_admin() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = env.login(&server).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let dashboard = server.get("/admin").await;
    dashboard.assert_status_ok();
    let body: serde_json::Value = dashboard.json();
    assert_eq!(body["username"].as_str(), Some(ADMIN_USERNAME));
}

#[tokio::test]
async fn wrong_password_stays_anonymous() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server
        .post("/login")
        .form(&[("username", ADMIN_USERNAME), ("password", "wrong")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/login?error="), "got {target}");

    let page = server.get(&target).await;
    page.assert_status_ok();
    let body: serde_json::Value = page.json();
    assert_eq!(body["error"].as_str(), Some("Invalid username or password"));
    assert!(body["username"].is_null());

    let dashboard = server.get("/admin").await;
    dashboard.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/login");
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let unknown = server
        .post("/login")
        .form(&[("username", "nobody"), ("password", ADMIN_PASSWORD)])
        .await;
    let wrong = server
        .post("/login")
        .form(&[("username", ADMIN_USERNAME), ("password", "nope")])
        .await;

    assert_eq!(unknown.status_code(), wrong.status_code());
    assert_eq!(location(&unknown), location(&wrong));
}

#[tokio::test]
async fn admin_routes_require_login() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    for path in ["/admin/posts/delete/x", "/admin/gallery/delete/x", "/admin/staff/delete/x"] {
        let response = server.post(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login", "{path}");
    }

    let response = server
        .post("/admin/social")
        .form(&[("instagram", "https://instagram.com/hijack")])
        .await;
    assert_eq!(location(&response), "/login");
    assert_eq!(env.data().await.social.instagram, None);
}

#[tokio::test]
async fn logout_ends_session() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    env.login(&server).await;
    server.get("/admin").await.assert_status_ok();

    let response = server.get("/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let dashboard = server.get("/admin").await;
    dashboard.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/login");
}

#[tokio::test]
async fn session_for_removed_admin_is_rejected() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    env.login(&server).await;
    server.get("/admin").await.assert_status_ok();

    // Admins cannot be deleted through the site; simulate an offline edit.
    env.state
        .store
        .mutate(|data| {
            data.admins.clear();
            Ok(())
        })
        .await
        .unwrap();

    let dashboard = server.get("/admin").await;
    dashboard.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/login");
}

#[tokio::test]
async fn legacy_dashboard_path_redirects() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server.get("/dashboard").await;
    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn without_bootstrap_nobody_can_log_in() {
    let env = common::TestEnv::start_with(None).await;
    let server = env.server();

    assert!(env.data().await.admins.is_empty());
    let response = env.login(&server).await;
    assert!(location(&response).starts_with("/login?error="));
}
