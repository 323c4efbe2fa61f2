//! Tests for the authoring service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{ImageStoreError, MockImageStore};
use crate::domain::test_fixtures::{StorageMocks, fixture_clock, fixture_timestamp, group, post, user};
use crate::domain::{Comment, CommentId, ErrorCode, GroupId, UploadedImage, User};

fn service(mocks: StorageMocks, images: MockImageStore) -> AuthoringService {
    AuthoringService::new(mocks.into_ports(), Arc::new(images), fixture_clock())
}

fn draft(text: &str, group: &str) -> PostDraft {
    PostDraft {
        text: text.to_owned(),
        group: group.to_owned(),
        ..PostDraft::default()
    }
}

fn expect_existing_post(mocks: &mut StorageMocks, existing: Post) {
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
}

#[tokio::test]
async fn empty_text_stores_nothing_and_keeps_the_group() {
    let mut mocks = StorageMocks::default();
    mocks.posts.expect_insert().never();
    mocks.groups.expect_find_by_id().never();
    let mut images = MockImageStore::new();
    images.expect_save().never();

    let author = UserId::random();
    let outcome = service(mocks, images)
        .create_post(author, draft("  ", "2"))
        .await
        .expect("outcome");

    let CreatePostOutcome::Rejected(invalid) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(invalid.form.group, "2");
    assert!(invalid.errors.text.is_some());
}

#[tokio::test]
async fn unknown_group_is_a_field_error() {
    let mut mocks = StorageMocks::default();
    mocks
        .groups
        .expect_find_by_id()
        .withf(|id| *id == GroupId::new(9))
        .return_once(|_| Ok(None));
    mocks.posts.expect_insert().never();

    let outcome = service(mocks, MockImageStore::new())
        .create_post(UserId::random(), draft("Hello", "9"))
        .await
        .expect("outcome");

    let CreatePostOutcome::Rejected(invalid) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(invalid.errors.group.as_deref(), Some(UNKNOWN_GROUP));
    assert_eq!(invalid.form.text, "Hello");
}

#[tokio::test]
async fn create_post_stamps_the_clock_and_stores_the_image() {
    let author: User = user("leo");
    let author_id = author.id();
    let cats = group(3, "cats");
    let mut mocks = StorageMocks::default();
    mocks
        .groups
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(cats)));
    let stored = post(11, &author, "Hello");
    mocks
        .posts
        .expect_insert()
        .withf(move |new_post| {
            new_post.author == author_id
                && new_post.created_at == fixture_timestamp()
                && new_post.group == Some(GroupId::new(3))
                && new_post.image.as_ref().map(ImagePath::as_str) == Some("posts/a.png")
        })
        .return_once(move |_| Ok(stored));
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .withf(|image| image.extension() == "png")
        .return_once(|_| Ok(ImagePath::new("posts/a.png").expect("path")));

    let mut submission = draft("Hello", "3");
    submission.image = Some(UploadedImage::new("cat.PNG", vec![1, 2, 3]));
    let outcome = service(mocks, images)
        .create_post(author_id, submission)
        .await
        .expect("outcome");

    assert!(matches!(outcome, CreatePostOutcome::Created(created) if created.id == PostId::new(11)));
}

#[tokio::test]
async fn image_store_failure_is_internal() {
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .return_once(|_| Err(ImageStoreError::io("disk full")));
    let mut mocks = StorageMocks::default();
    mocks.posts.expect_insert().never();

    let mut submission = draft("Hello", "");
    submission.image = Some(UploadedImage::new("cat.jpg", vec![1]));
    let err = service(mocks, images)
        .create_post(UserId::random(), submission)
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn edit_form_refuses_non_authors() {
    let author = user("leo");
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, post(4, &author, "mine"));

    let access = service(mocks, MockImageStore::new())
        .edit_form(UserId::random(), PostId::new(4))
        .await
        .expect("access");

    assert_eq!(access, EditAccess::NotAuthor(PostId::new(4)));
}

#[tokio::test]
async fn edit_form_prefills_for_the_author() {
    let author = user("leo");
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, post(4, &author, "mine"));

    let access = service(mocks, MockImageStore::new())
        .edit_form(author.id(), PostId::new(4))
        .await
        .expect("access");

    let EditAccess::Allowed { form, .. } = access else {
        panic!("expected access");
    };
    assert_eq!(form.text, "mine");
    assert_eq!(form.group, "");
}

#[tokio::test]
async fn non_author_edit_leaves_the_post_untouched() {
    let author = user("leo");
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, post(4, &author, "mine"));
    mocks.posts.expect_update().never();
    let mut images = MockImageStore::new();
    images.expect_save().never();

    let mut submission = draft("hijacked", "");
    submission.image = Some(UploadedImage::new("x.gif", vec![1]));
    let outcome = service(mocks, images)
        .edit_post(UserId::random(), PostId::new(4), submission)
        .await
        .expect("outcome");

    assert_eq!(outcome, EditPostOutcome::NotAuthor(PostId::new(4)));
}

#[tokio::test]
async fn edit_keeps_the_existing_image_without_a_new_upload() {
    let author = user("leo");
    let mut existing = post(4, &author, "mine");
    existing.image = Some(ImagePath::new("posts/old.jpg").expect("path"));
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, existing.clone());
    let mut updated = existing.clone();
    updated.text = crate::domain::PostText::new("edited").expect("text");
    mocks
        .posts
        .expect_update()
        .withf(|id, changes| {
            *id == PostId::new(4)
                && changes.text.as_str() == "edited"
                && changes.image.as_ref().map(ImagePath::as_str) == Some("posts/old.jpg")
        })
        .return_once(move |_, _| Ok(updated));

    let outcome = service(mocks, MockImageStore::new())
        .edit_post(author.id(), PostId::new(4), draft("edited", ""))
        .await
        .expect("outcome");

    assert!(matches!(outcome, EditPostOutcome::Updated(_)));
}

#[tokio::test]
async fn edit_with_clear_flag_drops_the_image() {
    let author = user("leo");
    let mut existing = post(4, &author, "mine");
    existing.image = Some(ImagePath::new("posts/old.jpg").expect("path"));
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, existing.clone());
    let mut updated = existing.clone();
    updated.image = None;
    mocks
        .posts
        .expect_update()
        .withf(|_, changes| changes.image.is_none())
        .return_once(move |_, _| Ok(updated));
    let mut images = MockImageStore::new();
    images.expect_save().never();

    let mut submission = draft("mine", "");
    submission.clear_image = true;
    let outcome = service(mocks, images)
        .edit_post(author.id(), PostId::new(4), submission)
        .await
        .expect("outcome");

    assert!(matches!(outcome, EditPostOutcome::Updated(post) if post.image.is_none()));
}

#[tokio::test]
async fn editing_a_missing_post_is_not_found() {
    let mut mocks = StorageMocks::default();
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(mocks, MockImageStore::new())
        .edit_post(UserId::random(), PostId::new(99), draft("x", ""))
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn blank_comment_is_rejected_without_storage() {
    let author = user("leo");
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, post(4, &author, "mine"));
    mocks.comments.expect_insert().never();

    let outcome = service(mocks, MockImageStore::new())
        .add_comment(author.id(), PostId::new(4), "   ".to_owned())
        .await
        .expect("outcome");

    assert!(matches!(outcome, AddCommentOutcome::Rejected { .. }));
}

#[tokio::test]
async fn comment_is_stored_for_an_existing_post() {
    let author = user("leo");
    let commenter = user("anna");
    let commenter_id = commenter.id();
    let mut mocks = StorageMocks::default();
    expect_existing_post(&mut mocks, post(4, &author, "mine"));
    let stored = Comment {
        id: CommentId::new(1),
        post_id: PostId::new(4),
        author: commenter.as_author(),
        text: CommentText::new("nice").expect("text"),
        created_at: fixture_timestamp(),
    };
    mocks
        .comments
        .expect_insert()
        .withf(move |comment| comment.author == commenter_id && comment.text.as_str() == "nice")
        .return_once(move |_| Ok(stored));

    let outcome = service(mocks, MockImageStore::new())
        .add_comment(commenter_id, PostId::new(4), "nice".to_owned())
        .await
        .expect("outcome");

    assert!(matches!(outcome, AddCommentOutcome::Added(_)));
}

#[tokio::test]
async fn commenting_on_a_missing_post_is_not_found() {
    let mut mocks = StorageMocks::default();
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(mocks, MockImageStore::new())
        .add_comment(UserId::random(), PostId::new(1), "hi".to_owned())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
