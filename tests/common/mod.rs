//! In-process stand-in for the posts API, served by actix-web on a random
//! local port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use actix_web::dev::Service;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

/// Search term the mock answers slowly, to provoke overlapping loads.
pub const SLOW_QUERY: &str = "slow";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
}

pub struct MockState {
    pub posts: Vec<Value>,
    pub categories: Vec<String>,
    pub users: HashMap<String, String>,
    pub tokens: HashMap<String, String>,
    pub requests: Vec<Recorded>,
    next_id: u64,
}

impl MockState {
    fn seeded() -> Self {
        let posts = vec![
            json!({"id": 1, "title": "First post", "content": "This is the first post.",
                   "category": "News", "author": "ann", "date": "2024-05-01", "likes": 0}),
            json!({"id": 2, "title": "Second post", "content": "This is the second post.",
                   "category": "Tech", "author": "bob", "date": "2024-05-02",
                   "updated": "2024-05-04", "likes": 6}),
            json!({"id": 3, "title": "Garden notes", "content": "Tomatoes are up.",
                   "category": "Gardening", "author": "ann", "date": "2024-05-03", "likes": 1}),
        ];
        MockState {
            posts,
            categories: vec!["News".into(), "Tech".into(), "Life".into()],
            users: HashMap::from([
                ("ann".to_string(), "ann-pass".to_string()),
                ("bob".to_string(), "bob-pass".to_string()),
            ]),
            tokens: HashMap::new(),
            requests: Vec::new(),
            next_id: 4,
        }
    }

    fn user_for(&self, req: &HttpRequest) -> Option<String> {
        let header = req.headers().get("Authorization")?.to_str().ok()?;
        let token = header.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|p| p["id"].to_string() == id)
    }
}

type Shared = web::Data<Mutex<MockState>>;

pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }
}

fn error(status: u16, message: &str) -> HttpResponse {
    HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap())
        .json(json!({ "error": message }))
}

async fn list_posts(state: Shared, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let state = state.lock().unwrap();
    let posts: Vec<Value> = state
        .posts
        .iter()
        .filter(|p| match query.get("category") {
            Some(c) => p["category"] == c.as_str(),
            None => true,
        })
        .cloned()
        .collect();
    HttpResponse::Ok().json(json!({ "page": 1, "total_posts": posts.len(), "posts": posts }))
}

async fn search_posts(state: Shared, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let q = query.get("q").cloned().unwrap_or_default().to_lowercase();
    if q == SLOW_QUERY {
        actix_web::rt::time::sleep(Duration::from_millis(400)).await;
    }
    let state = state.lock().unwrap();
    let results: Vec<Value> = state
        .posts
        .iter()
        .filter(|p| {
            let title = p["title"].as_str().unwrap_or_default().to_lowercase();
            let content = p["content"].as_str().unwrap_or_default().to_lowercase();
            title.contains(&q) || content.contains(&q)
        })
        .cloned()
        .collect();
    if results.is_empty() {
        return error(404, &format!("No posts found matching '{}'", q));
    }
    HttpResponse::Ok().json(results)
}

async fn create_post(state: Shared, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.user_for(&req).is_none() {
        return error(401, "Authentication required");
    }
    let title = body["title"].as_str().unwrap_or_default();
    if title.is_empty() {
        return error(400, "Enter a title");
    }
    if state.posts.iter().any(|p| p["title"] == title) {
        return error(400, "duplicate title");
    }
    let id = state.next_id;
    state.next_id += 1;
    let post = json!({
        "id": id,
        "title": title,
        "content": body["content"],
        "category": body["category"],
        "author": body["author"],
        "date": chrono::Utc::now().format("%Y-%m-%d").to_string(),
        "likes": 0,
    });
    state.posts.push(post.clone());
    HttpResponse::Created().json(post)
}

async fn update_post(
    state: Shared,
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.user_for(&req).is_none() {
        return error(401, "Authentication required");
    }
    let Some(i) = state.position(&id) else {
        return error(404, &format!("Post with ID {} not found", id.as_str()));
    };
    let post = &mut state.posts[i];
    post["title"] = body["title"].clone();
    post["content"] = body["content"].clone();
    post["category"] = body["category"].clone();
    post["updated"] = json!(chrono::Utc::now().format("%Y-%m-%d").to_string());
    HttpResponse::Ok().json(post.clone())
}

async fn delete_post(state: Shared, req: HttpRequest, id: web::Path<String>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    if state.user_for(&req).is_none() {
        return error(401, "Authentication required");
    }
    let Some(i) = state.position(&id) else {
        return error(404, &format!("{} not found", id.as_str()));
    };
    state.posts.remove(i);
    HttpResponse::Ok().json(json!({ "message": format!("Post {} deleted", id.as_str()) }))
}

async fn like_post(state: Shared, id: web::Path<String>) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let Some(i) = state.position(&id) else {
        return error(404, "Post not found");
    };
    let likes = state.posts[i]["likes"].as_u64().unwrap_or(0) + 1;
    state.posts[i]["likes"] = json!(likes);
    HttpResponse::Ok().json(json!({ "likes": likes }))
}

async fn categories(state: Shared) -> HttpResponse {
    HttpResponse::Ok().json(state.lock().unwrap().categories.clone())
}

async fn register(state: Shared, body: web::Json<Value>) -> HttpResponse {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock().unwrap();
    if state.users.contains_key(&username) {
        return error(400, "User already exists");
    }
    state.users.insert(username, password);
    HttpResponse::Created().json(json!({ "message": "User registered successfully" }))
}

async fn login(state: Shared, body: web::Json<Value>) -> HttpResponse {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let mut state = state.lock().unwrap();
    if state.users.get(username).map(String::as_str) != Some(password) {
        return error(401, "Invalid username or password");
    }
    let token = format!("tok-{}", username);
    state.tokens.insert(token.clone(), username.to_string());
    HttpResponse::Ok().json(json!({ "message": "Login successful", "token": token }))
}

async fn broken() -> HttpResponse {
    HttpResponse::InternalServerError().body("<html>upstream exploded</html>")
}

/// Start a fresh mock API on its own thread.
pub fn spawn() -> MockApi {
    let state: Shared = web::Data::new(Mutex::new(MockState::seeded()));
    let data = state.clone();
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let server = HttpServer::new(move || {
                let log = data.clone();
                App::new()
                    .app_data(data.clone())
                    .wrap_fn(move |req, srv| {
                        log.lock().unwrap().requests.push(Recorded {
                            method: req.method().to_string(),
                            uri: req.uri().to_string(),
                            authorization: req
                                .headers()
                                .get("Authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string),
                        });
                        srv.call(req)
                    })
                    .service(
                        web::scope("/api")
                            .route("/posts", web::get().to(list_posts))
                            .route("/posts", web::post().to(create_post))
                            .route("/posts/search", web::get().to(search_posts))
                            .route("/posts/{id}", web::put().to(update_post))
                            .route("/posts/{id}", web::delete().to(delete_post))
                            .route("/posts/{id}/like", web::post().to(like_post))
                            .route("/categories", web::get().to(categories))
                            .route("/register", web::post().to(register))
                            .route("/login", web::post().to(login))
                            .route("/broken", web::get().to(broken)),
                    )
            })
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind mock api");

            tx.send(server.addrs()[0].port()).expect("report port");
            server.run().await.expect("mock api crashed");
        });
    });

    let port = rx.recv().expect("mock api did not start");
    MockApi {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    }
}
