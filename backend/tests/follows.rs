//! Following authors and the personalised feed.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use support::{TestSite, get, location, page, post_count, publish, sign_up};

#[actix_web::test]
async fn following_surfaces_the_authors_posts() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    let leo = sign_up(&app, "leo").await;
    let anna = sign_up(&app, "anna").await;
    let ivan = sign_up(&app, "ivan").await;
    publish(&app, &leo, "from leo", "").await;
    publish(&app, &ivan, "from ivan", "").await;

    assert_eq!(post_count(&page(&app, "/follow/", Some(&anna)).await), 0);

    let response = get(&app, "/profile/leo/follow/", Some(&anna)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile/leo/");

    let feed = page(&app, "/follow/", Some(&anna)).await;
    assert!(feed.contains("from leo"));
    assert!(!feed.contains("from ivan"));
    assert!(page(&app, "/profile/leo/", Some(&anna)).await.contains("/profile/leo/unfollow/"));
}

#[actix_web::test]
async fn unfollowing_removes_the_authors_posts() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    let leo = sign_up(&app, "leo").await;
    let anna = sign_up(&app, "anna").await;
    publish(&app, &leo, "from leo", "").await;
    get(&app, "/profile/leo/follow/", Some(&anna)).await;

    let response = get(&app, "/profile/leo/unfollow/", Some(&anna)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(post_count(&page(&app, "/follow/", Some(&anna)).await), 0);
}

#[actix_web::test]
async fn following_twice_keeps_a_single_edge() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    sign_up(&app, "leo").await;
    let anna = sign_up(&app, "anna").await;

    for _ in 0..2 {
        let response = get(&app, "/profile/leo/follow/", Some(&anna)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let first = get(&app, "/profile/leo/unfollow/", Some(&anna)).await;
    assert_eq!(first.status(), StatusCode::FOUND);
    let second = get(&app, "/profile/leo/unfollow/", Some(&anna)).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn self_follow_creates_no_edge() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    let leo = sign_up(&app, "leo").await;
    publish(&app, &leo, "my own words", "").await;

    let response = get(&app, "/profile/leo/follow/", Some(&leo)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(post_count(&page(&app, "/follow/", Some(&leo)).await), 0);
    let profile = page(&app, "/profile/leo/", Some(&leo)).await;
    assert!(!profile.contains("/profile/leo/follow/"));
    let unfollow = get(&app, "/profile/leo/unfollow/", Some(&leo)).await;
    assert_eq!(unfollow.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unfollowing_without_an_edge_is_not_found() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    let leo = sign_up(&app, "leo").await;
    let anna = sign_up(&app, "anna").await;
    publish(&app, &leo, "from leo", "").await;

    let response = get(&app, "/profile/leo/unfollow/", Some(&anna)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(post_count(&page(&app, "/follow/", Some(&anna)).await), 0);
}

#[actix_web::test]
async fn following_an_unknown_author_is_not_found() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;
    let anna = sign_up(&app, "anna").await;

    let response = get(&app, "/profile/ghost/follow/", Some(&anna)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn the_personal_feed_requires_login() {
    let site = TestSite::new();
    let app = actix_test::init_service(site.app()).await;

    let response = get(&app, "/follow/", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=%2Ffollow%2F");
}
