//! API tests against an in-process board server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use pretty_assertions::assert_eq;
use rboard::{
    AttachmentId, BoardClient, CommentId, Error, PostForm, PostFormAction, PostId, SearchType,
    Sort, SortBy, SortOrder, UploadFile, UserId,
};
use serde_json::{json, Value};

const TOKEN: &str = "header.eyJ1c2VySWQiOiJob25nIn0.sig";

/// What the server saw.
#[derive(Debug, Default)]
struct Seen {
    query: HashMap<String, String>,
    fields: Vec<(String, String)>,
    auth: Option<String>,
    path: Option<String>,
}

type Shared = Arc<Mutex<Seen>>;

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Record multipart fields; files are recorded as `file:<name>:<len>`.
async fn read_fields(mut multipart: Multipart) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await.unwrap();
        let value = match file_name {
            Some(f) => format!("file:{}:{}", f, data.len()),
            None => String::from_utf8_lossy(&data).into_owned(),
        };
        fields.push((name, value));
    }
    fields
}

fn post_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": "<p>Hello <strong>board</strong></p>",
        "videoUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "imgUrl": null,
        "author": { "id": "hong", "name": "Gildong" },
        "createdAt": "2024-05-01T09:00:00",
        "updatedAt": "2024-05-01T09:00:00",
        "view_cnt": 3,
        "attachments": [{
            "id": 8, "filename": "a_1.txt", "original_filename": "notes.txt",
            "file_path": "/uploads/a_1.txt", "file_size": 5, "mime_type": "text/plain"
        }],
        "comments": [
            { "id": 1, "content": "first", "author": { "id": "kim", "name": "Kim" },
              "createdAt": "2024-05-01T10:00:00", "updatedAt": "2024-05-01T10:00:00",
              "isDeleted": false, "parent_id": 0, "replies": [] },
            { "id": 2, "content": "second", "author": { "id": "lee", "name": "Lee" },
              "createdAt": "2024-05-02T10:00:00", "updatedAt": "2024-05-02T10:00:00",
              "isDeleted": false, "parent_id": 0,
              "replies": [
                { "id": 3, "content": "re", "author": { "id": "hong", "name": "Gildong" },
                  "createdAt": "2024-05-02T11:00:00", "updatedAt": "2024-05-02T11:00:00",
                  "isDeleted": false, "parent_id": 2, "replies": [] }
              ] }
        ]
    })
}

async fn login(multipart: Multipart) -> Response {
    let fields: HashMap<String, String> = read_fields(multipart).await.into_iter().collect();
    if fields.get("password").map(String::as_str) != Some("secret") {
        return detail(StatusCode::UNAUTHORIZED, "아이디 또는 비밀번호가 일치하지 않습니다");
    }
    Json(json!({ "access_token": TOKEN, "token_type": "bearer", "userName": "Gildong" }))
        .into_response()
}

async fn list_posts(State(seen): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    seen.lock().unwrap().query = q;
    Json(json!({
        "posts": [
            { "id": 13, "title": "newest", "author": { "id": "hong", "name": "Gildong" },
              "createdAt": "2024-05-01T09:00:00", "view_cnt": 9, "commentCount": 2 },
            { "id": 12, "title": "older", "author": { "id": "kim", "name": "Kim" },
              "createdAt": "2024-04-30T09:00:00", "view_cnt": 1, "commentCount": 0 }
        ],
        "total": 23
    }))
    .into_response()
}

async fn get_post(Path(id): Path<i64>) -> Response {
    if id == 404 {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    Json(post_json(id, "Hello")).into_response()
}

async fn create_post(State(seen): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    let title = fields
        .iter()
        .find(|(k, _)| k == "title")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let mut seen = seen.lock().unwrap();
    seen.auth = bearer(&headers);
    seen.fields = fields;
    Json(post_json(30, &title)).into_response()
}

async fn update_post(
    State(seen): State<Shared>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    seen.lock().unwrap().fields = read_fields(multipart).await;
    Json(post_json(id, "edited")).into_response()
}

async fn delete_post(Path(id): Path<i64>) -> Response {
    if id == 403 {
        return detail(StatusCode::FORBIDDEN, "Not authorized to delete this post");
    }
    Json(json!({ "message": "Post and its attachments deleted successfully" })).into_response()
}

async fn add_comment(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let fields = read_fields(multipart).await;
    let mut seen = seen.lock().unwrap();
    seen.auth = bearer(&headers);
    seen.fields = fields;
    Json(json!({ "message": "Comment created successfully", "comment_id": 77 })).into_response()
}

async fn list_comments(Path(id): Path<i64>) -> Response {
    Json(post_json(id, "x")["comments"].clone()).into_response()
}

async fn edit_comment(Path(_id): Path<i64>, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    if fields.iter().any(|(k, v)| k == "content" && v == "edited") {
        Json(json!({ "message": "Comment updated successfully" })).into_response()
    } else {
        detail(StatusCode::BAD_REQUEST, "unexpected content")
    }
}

async fn delete_comment(Path(id): Path<i64>) -> Response {
    if id == 13 {
        return detail(StatusCode::FORBIDDEN, "Not authorized to delete this comment");
    }
    Json(json!({ "message": "Comment deleted successfully" })).into_response()
}

async fn list_attachments(State(seen): State<Shared>, uri: Uri, Path(id): Path<i64>) -> Response {
    seen.lock().unwrap().path = Some(uri.path().to_owned());
    if id == 404 {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    Json(json!([
        { "id": 8, "filename": "a_1.txt", "original_filename": "notes.txt",
          "file_path": "/uploads/a_1.txt", "file_size": 5, "mime_type": "text/plain",
          "post_no": id },
        { "id": 9, "filename": "b_2.png", "file_size": 2048, "mime_type": "image/png" }
    ]))
    .into_response()
}

async fn download(Path((_post, attachment)): Path<(i64, i64)>) -> Response {
    if attachment != 8 {
        return detail(StatusCode::NOT_FOUND, "Attachment not found");
    }
    ([("content-type", "text/plain")], "hello").into_response()
}

async fn remove_attachment(Path((_post, _attachment)): Path<(i64, i64)>) -> Response {
    Json(json!({ "message": "Attachment deleted successfully" })).into_response()
}

async fn upload(Path(_id): Path<i64>, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    match fields.first() {
        Some((name, value)) if name == "file" => {
            let stored = value.split(':').nth(1).unwrap_or_default().to_owned();
            Json(json!({ "filename": stored, "id": 41 })).into_response()
        }
        _ => detail(StatusCode::UNPROCESSABLE_ENTITY, "file missing"),
    }
}

/// Start the server and return its API base URL.
async fn spawn_board() -> (String, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/:id/comments", get(list_comments).post(add_comment))
        .route("/api/comments/:id", delete(delete_comment).put(edit_comment))
        .route("/api/posts/:id/attachments", get(list_attachments))
        .route("/api/posts/:id/attachments/:aid", get(download))
        .route("/api/posts/:id/attachments/:aid/delete", axum::routing::put(remove_attachment))
        .route("/api/posts/:id/files", post(upload))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/", addr), seen)
}

fn client(base: &str) -> BoardClient {
    BoardClient::builder().base_url(base).build().unwrap()
}

fn authed(base: &str) -> BoardClient {
    BoardClient::builder()
        .base_url(base)
        .auth(TOKEN, "hong")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_login() {
    let (base, _) = spawn_board().await;

    let result = client(&base).auth().login("hong", "secret").await.unwrap();
    assert_eq!(result.user_id, UserId::new("hong"));
    assert_eq!(result.user_name, "Gildong");
    let auth = result.into_auth();
    assert_eq!(auth.claims().unwrap().user_id.as_deref(), Some("hong"));

    let err = client(&base).auth().login("hong", "wrong").await.unwrap_err();
    assert!(err.is_auth_error());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "아이디 또는 비밀번호가 일치하지 않습니다");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_list_sends_query_and_paginates() {
    let (base, seen) = spawn_board().await;

    let page = client(&base)
        .posts()
        .list()
        .search("rust", SearchType::Content)
        .sort(Sort::new(SortBy::Views, SortOrder::Asc))
        .page(3)
        .send()
        .await
        .unwrap();

    let query = seen.lock().unwrap().query.clone();
    assert_eq!(query.get("page").map(String::as_str), Some("3"));
    assert_eq!(query.get("search").map(String::as_str), Some("rust"));
    assert_eq!(query.get("search_type").map(String::as_str), Some("content"));
    assert_eq!(query.get("sortBy").map(String::as_str), Some("view_cnt"));
    assert_eq!(query.get("sortOrder").map(String::as_str), Some("asc"));
    assert!(!query.contains_key("author_id"));

    assert_eq!(page.total, 23);
    assert_eq!(page.pagination.total_pages(), 3);
    let numbers: Vec<i64> = page.numbered().map(|(n, _)| n).collect();
    assert_eq!(numbers, vec![3, 2]);
    assert_eq!(page.posts[0].comment_count, 2);
}

#[tokio::test]
async fn test_get_post_and_not_found() {
    let (base, _) = spawn_board().await;
    let client = client(&base);

    let post = client.posts().get(PostId(5)).await.unwrap();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.content.to_plain_text(), "Hello board");
    assert_eq!(post.video().unwrap().id, "dQw4w9WgXcQ");
    assert!(!post.can_delete());

    // Newest top-level comment first, replies under their parent.
    let order: Vec<(usize, i64)> = post
        .comments
        .walk()
        .map(|(depth, c)| (depth, c.id.get()))
        .collect();
    assert_eq!(order, vec![(0, 2), (1, 3), (0, 1)]);

    let err = client.posts().get(PostId(404)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_post_multipart() {
    let (base, seen) = spawn_board().await;
    let client = authed(&base);

    let mut form = PostForm::new();
    form.apply(PostFormAction::SetTitle("New post".into()));
    form.apply(PostFormAction::SetContent("<p>Body</p>".into()));
    form.apply(PostFormAction::SetVideoUrl("https://tv.naver.com/v/123".into()));
    form.apply(PostFormAction::AddAttachments(vec![UploadFile::new("notes.txt", "hello")]));
    client.drafts().save(&form).await.unwrap();

    let post = client.posts().create(&form).await.unwrap();
    assert_eq!(post.title, "New post");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.auth.as_deref(), Some(format!("Bearer {}", TOKEN).as_str()));
    let names: Vec<&str> = seen.fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["title", "content", "video_url", "files"]);
    assert_eq!(seen.fields[3].1, "file:notes.txt:5");
    drop(seen);

    assert!(client.drafts().load(None).await.is_none());
}

#[tokio::test]
async fn test_update_keeps_existing_attachments() {
    let (base, seen) = spawn_board().await;
    let client = authed(&base);

    let post = client.posts().get(PostId(9)).await.unwrap();
    let mut form = PostForm::from_post(&post);
    form.apply(PostFormAction::SetTitle("edited".into()));
    client.posts().update(post.id, &form).await.unwrap();

    let fields = seen.lock().unwrap().fields.clone();
    assert!(fields.contains(&("existing_files".to_owned(), "8".to_owned())));
    assert!(fields.contains(&("title".to_owned(), "edited".to_owned())));
    assert!(!fields.iter().any(|(k, _)| k == "img_url"));
}

#[tokio::test]
async fn test_delete_post_errors() {
    let (base, _) = spawn_board().await;
    let client = authed(&base);

    client.posts().delete(PostId(1)).await.unwrap();
    let err = client.posts().delete(PostId(403)).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(
        err.to_string(),
        "Board API error [403]: Not authorized to delete this post"
    );
}

#[tokio::test]
async fn test_comments() {
    let (base, seen) = spawn_board().await;
    let client = authed(&base);

    let id = client.comments().create(PostId(5), "  nice post ").await.unwrap();
    assert_eq!(id, CommentId(77));
    {
        let seen = seen.lock().unwrap();
        assert!(seen.auth.is_some());
        assert_eq!(
            seen.fields,
            vec![
                ("content".to_owned(), "nice post".to_owned()),
                ("parent_comment_id".to_owned(), "0".to_owned()),
            ]
        );
    }

    let id = client
        .comments()
        .reply(PostId(5), CommentId(2), "agreed")
        .await
        .unwrap();
    assert_eq!(id, CommentId(77));
    assert!(seen
        .lock()
        .unwrap()
        .fields
        .contains(&("parent_comment_id".to_owned(), "2".to_owned())));

    client.comments().update(CommentId(3), "edited").await.unwrap();

    let tree = client.comments().list(PostId(5)).await.unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.total(), 3);

    client.comments().delete(CommentId(3)).await.unwrap();
    let err = client.comments().delete(CommentId(13)).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 403, .. }));
}

#[tokio::test]
async fn test_list_attachments() {
    let (base, seen) = spawn_board().await;
    let client = client(&base);

    let attachments = client.attachments().list(PostId(5)).await.unwrap();
    assert_eq!(
        seen.lock().unwrap().path.as_deref(),
        Some("/api/posts/5/attachments")
    );
    assert_eq!(attachments.len(), 2);
    assert_eq!(attachments[0].id, AttachmentId(8));
    assert_eq!(attachments[0].display_name(), "notes.txt");
    assert_eq!(attachments[0].file_size, 5);
    assert_eq!(attachments[0].post_id, Some(PostId(5)));
    assert_eq!(attachments[1].display_name(), "b_2.png");
    assert_eq!(attachments[1].original_filename, None);
    assert_eq!(attachments[1].file_path, "");

    let err = client.attachments().list(PostId(404)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Board API error [404]: Post not found");
}

#[tokio::test]
async fn test_attachments() {
    let (base, _) = spawn_board().await;
    let client = authed(&base);

    let bytes = client
        .attachments()
        .download(PostId(5), AttachmentId(8))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello");

    let post = client.posts().get(PostId(5)).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = client
        .attachments()
        .download_to(post.id, &post.attachments[0], dir.path())
        .await
        .unwrap();
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("notes.txt"));
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");

    let err = client
        .attachments()
        .download(PostId(5), AttachmentId(9))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    client
        .attachments()
        .remove(PostId(5), AttachmentId(8))
        .await
        .unwrap();

    let uploaded = client
        .attachments()
        .upload(PostId(5), &UploadFile::new("photo.png", vec![0u8; 16]))
        .await
        .unwrap();
    assert_eq!(uploaded.id, AttachmentId(41));
    assert_eq!(uploaded.filename, "photo.png");
}
