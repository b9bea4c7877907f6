mod common;

use axum::http::StatusCode;
use sea_orm::ConnectionTrait;

use common::{
    body_text, build_test_app, build_test_app_with_db, get, location, post_form, session_cookie,
    sign_up,
};

fn title_fields<'a>(media_type: &'a str, end_date: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("media_type", media_type),
        ("status", "Finished"),
        ("native_title", "Shingeki no Kyojin"),
        ("known_as", "Attack on Titan"),
        ("synopsis", ""),
        ("cover_url", ""),
        ("release_date", "2013-04-07"),
        ("end_date", end_date),
    ]
}

fn short_id(location: &str) -> i32 {
    location.trim_start_matches("/titles/").parse().unwrap()
}

#[tokio::test]
async fn private_pages_redirect_anonymous_visitors() {
    let app = build_test_app().await;

    for uri in ["/dashboard", "/connections", "/titles", "/titles/add", "/titles/1"] {
        let resp = get(&app, uri, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/", "{uri}");
    }
}

#[tokio::test]
async fn register_then_login_and_logout() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "mikasa").await;

    let resp = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("@mikasa"));

    let resp = post_form(&app, "/logout", &[], Some(&cookie)).await;
    assert_eq!(location(&resp), "/");
    let resp = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(location(&resp), "/");

    let resp = post_form(
        &app,
        "/login",
        &[("username", "mikasa"), ("password", "correct horse")],
        None,
    )
    .await;
    assert_eq!(location(&resp), "/dashboard");
    let fresh = session_cookie(&resp);
    assert_eq!(get(&app, "/dashboard", Some(&fresh)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_login_shows_message() {
    let app = build_test_app().await;
    sign_up(&app, "mikasa").await;

    let resp =
        post_form(&app, "/login", &[("username", "mikasa"), ("password", "wrong pass")], None)
            .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Invalid username or password."));

    let resp = post_form(&app, "/login", &[("username", ""), ("password", "")], None).await;
    assert!(body_text(resp).await.contains("Please enter both username and password."));
}

#[tokio::test]
async fn film_submission_redirects_to_detail() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    let fields = title_fields("Film", "2014-01-01");
    let resp = post_form(&app, "/titles/add", &fields, Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let target = location(&resp).to_string();
    assert!(target.starts_with("/titles/"), "{target}");
    short_id(&target);

    let body = body_text(get(&app, &target, Some(&cookie)).await).await;
    assert!(body.contains("Attack on Titan"));
    assert!(body.contains("Total Duration"));
    assert!(body.contains("Production Countries"));
    assert!(!body.contains("2014-01-01"));

    let listing = body_text(get(&app, "/titles", Some(&cookie)).await).await;
    assert!(listing.contains(&format!("href=\"{target}\"")));
}

#[tokio::test]
async fn tv_show_keeps_end_date() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    let resp =
        post_form(&app, "/titles/add", &title_fields("TV_Show", "2023-11-05"), Some(&cookie)).await;
    let target = location(&resp).to_string();

    let body = body_text(get(&app, &target, Some(&cookie)).await).await;
    assert!(body.contains("2023-11-05"));
    assert!(body.contains("Episodes"));
}

#[tokio::test]
async fn missing_native_title_rerenders_form() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    let mut fields = title_fields("Book", "");
    fields[2] = ("native_title", "  ");
    let resp = post_form(&app, "/titles/add", &fields, Some(&cookie)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Native title is required."));
    assert!(body.contains("Attack on Titan"));
}

#[tokio::test]
async fn unknown_media_type_is_bad_request() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    let resp = post_form(&app, "/titles/add", &title_fields("Podcast", ""), Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn anonymous_submission_writes_nothing() {
    let app = build_test_app().await;

    let resp = post_form(&app, "/titles/add", &title_fields("Film", ""), None).await;
    assert_eq!(location(&resp), "/");

    let cookie = sign_up(&app, "armin").await;
    let listing = body_text(get(&app, "/titles", Some(&cookie)).await).await;
    assert!(listing.contains("No titles yet."));
}

#[tokio::test]
async fn title_detail_is_private() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;
    let resp = post_form(&app, "/titles/add", &title_fields("Film", ""), Some(&cookie)).await;
    let target = location(&resp).to_string();
    assert_eq!(get(&app, &target, Some(&cookie)).await.status(), StatusCode::OK);

    let resp = get(&app, &target, None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert!(!body_text(resp).await.contains("Attack on Titan"));
}

#[tokio::test]
async fn failed_subtype_insert_rolls_back_and_keeps_form() {
    let (app, db) = build_test_app_with_db().await;
    let cookie = sign_up(&app, "armin").await;
    db.execute_unprepared("DROP TABLE films").await.unwrap();

    let resp = post_form(&app, "/titles/add", &title_fields("Film", ""), Some(&cookie)).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("no such table: films"), "{body}");
    assert!(body.contains(r#"value="Attack on Titan""#));
    assert!(body.contains(r#"value="Shingeki no Kyojin""#));

    let listing = body_text(get(&app, "/titles", Some(&cookie)).await).await;
    assert!(listing.contains("No titles yet."));
}

#[tokio::test]
async fn unknown_title_redirects_to_listing() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    for uri in ["/titles/999", "/titles/not-a-number"] {
        let resp = get(&app, uri, Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/titles");
    }
}

#[tokio::test]
async fn draft_fragment_disables_end_date_for_films() {
    let app = build_test_app().await;
    let cookie = sign_up(&app, "armin").await;

    let fields = title_fields("Film", "2014-01-01");
    let resp = post_form(&app, "/titles/add/draft", &fields, Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["datastar-selector"], "#title-form");
    assert_eq!(resp.headers()["datastar-mode"], "outer");
    let body = body_text(resp).await;
    assert!(body.contains("id=\"title-form\""));
    assert!(!body.contains("2014-01-01"));
}

#[tokio::test]
async fn stalking_shows_up_in_connections() {
    let app = build_test_app().await;
    let eren = sign_up(&app, "eren").await;
    let levi = sign_up(&app, "levi").await;

    let resp = post_form(&app, "/profile/levi/stalk", &[], Some(&eren)).await;
    assert_eq!(location(&resp), "/profile/levi");

    let profile = body_text(get(&app, "/profile/levi", Some(&eren)).await).await;
    assert!(profile.contains("Stalked"));

    let theirs = body_text(get(&app, "/connections", Some(&levi)).await).await;
    assert!(theirs.contains("/profile/eren"));
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let app = build_test_app().await;
    let resp = get(&app, "/profile/nobody", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
