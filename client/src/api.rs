//! HTTP client for the Recipe Catalog API
//!
//! Every authenticated call reads the bearer token from the same
//! [`TokenStore`] that login and register write to. Calls are not retried
//! or deduplicated; failures surface straight to the caller.

use crate::storage::TokenStore;
use recipe_catalog_shared::{
    AuthResponse, Category, ErrorResponse, LoginRequest, Recipe, UserProfile,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

/// Client-side failures, grouped by how the UI reacts to them
#[derive(Error, Debug)]
pub enum ClientError {
    /// 401: bad credentials or a missing/expired token
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// 5xx
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Server { status, .. } | ClientError::Rejected { status, .. } => {
                Some(*status)
            }
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Message from the server's error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { message }
            | ClientError::Server { message, .. }
            | ClientError::Rejected { message, .. } => Some(message.as_str()),
            ClientError::Network(_) => None,
        }
    }

    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => status.canonical_reason().unwrap_or("").to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            ClientError::Unauthorized { message }
        } else if status.is_server_error() {
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        } else {
            ClientError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// A file picked in the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    fn into_part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.file_name)
    }
}

/// Register form payload
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<Upload>,
}

/// Edit-profile payload; no avatar keeps the current one
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: String,
    pub username: String,
    pub avatar: Option<Upload>,
}

/// Recipe form payload; no image keeps the current one on update
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub category_id: Option<i32>,
    pub image: Option<Upload>,
}

impl RecipeDraft {
    fn into_form(self) -> Form {
        let mut form = Form::new().text("name", self.name);
        for ingredient in self.ingredients {
            form = form.text("ingredients", ingredient);
        }
        for instruction in self.instructions {
            form = form.text("instructions", instruction);
        }
        if let Some(category_id) = self.category_id {
            form = form.text("category_id", category_id.to_string());
        }
        if let Some(image) = self.image {
            form = form.part("image", image.into_part());
        }
        form
    }
}

/// API client bound to a base URL and a token store
#[derive(Debug, Clone)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    tokens: S,
}

impl<S: TokenStore> ApiClient<S> {
    pub fn new(base_url: impl Into<String>, tokens: S) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Whether a token is stored locally (it may still be expired)
    pub fn has_token(&self) -> bool {
        self.tokens.load().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(Self::send(builder).await?.json().await?)
    }

    fn remember(&self, auth: AuthResponse) -> AuthResponse {
        self.tokens.save(&auth.token);
        auth
    }

    /// GET /me
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        Self::send_json(self.authorized(self.http.get(self.url("/me")))).await
    }

    /// POST /login; stores the returned token
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse =
            Self::send_json(self.http.post(self.url("/login")).json(&body)).await?;
        Ok(self.remember(auth))
    }

    /// POST /register; stores the returned token
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResponse, ClientError> {
        let mut form = Form::new()
            .text("username", input.username)
            .text("password", input.password)
            .text("name", input.name);
        if let Some(avatar) = input.avatar {
            form = form.part("avatar", avatar.into_part());
        }

        let auth: AuthResponse =
            Self::send_json(self.http.post(self.url("/register")).multipart(form)).await?;
        Ok(self.remember(auth))
    }

    /// PUT /me
    pub async fn update_profile(
        &self,
        changes: ProfileChanges,
    ) -> Result<UserProfile, ClientError> {
        let mut form = Form::new()
            .text("name", changes.name)
            .text("username", changes.username);
        if let Some(avatar) = changes.avatar {
            form = form.part("avatar", avatar.into_part());
        }

        Self::send_json(self.authorized(self.http.put(self.url("/me")).multipart(form))).await
    }

    /// Forget the local token
    pub fn logout(&self) {
        self.tokens.clear();
    }

    /// GET /api/categories
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        Self::send_json(self.http.get(self.url("/api/categories"))).await
    }

    /// GET /api/recipes
    pub async fn recipes(&self) -> Result<Vec<Recipe>, ClientError> {
        Self::send_json(self.authorized(self.http.get(self.url("/api/recipes")))).await
    }

    /// GET /api/recipes/{id}
    pub async fn recipe(&self, id: Uuid) -> Result<Recipe, ClientError> {
        Self::send_json(self.http.get(self.url(&format!("/api/recipes/{}", id)))).await
    }

    /// POST /api/recipes
    pub async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe, ClientError> {
        let request = self
            .http
            .post(self.url("/api/recipes"))
            .multipart(draft.into_form());
        Self::send_json(self.authorized(request)).await
    }

    /// PUT /api/recipes/{id}
    pub async fn update_recipe(&self, id: Uuid, draft: RecipeDraft) -> Result<Recipe, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/api/recipes/{}", id)))
            .multipart(draft.into_form());
        Self::send_json(self.authorized(request)).await
    }

    /// DELETE /api/recipes/{id}
    pub async fn delete_recipe(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/recipes/{}", id)));
        Self::send(self.authorized(request)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth_body() -> serde_json::Value {
        json!({
            "token": "T1",
            "user": {"id": Uuid::nil(), "username": "alice", "name": "Alice A"}
        })
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body()))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), MemoryTokenStore::new());
        let auth = api.login("alice", "pw123").await.unwrap();

        assert_eq!(auth.user.username, "alice");
        assert_eq!(api.tokens().load().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_register_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(auth_body()))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), MemoryTokenStore::new());
        api.register(RegisterInput {
            username: "alice".to_string(),
            password: "pw123".to_string(),
            name: "Alice A".to_string(),
            avatar: Some(Upload::new("me.png", vec![1, 2, 3])),
        })
        .await
        .unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap();
        assert!(content_type
            .to_str()
            .unwrap()
            .starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"avatar\"; filename=\"me.png\""));
        assert_eq!(api.tokens().load().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_me_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": Uuid::nil(), "username": "alice", "name": "Alice A", "avatar": null
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), MemoryTokenStore::with_token("T1"));
        let me = api.me().await.unwrap();

        assert_eq!(me.name, "Alice A");
        assert_eq!(me.avatar, None);
    }

    #[tokio::test]
    async fn test_update_recipe_uses_stored_token() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(format!("/api/recipes/{}", id)))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": "Salad",
                "image": null,
                "ingredients": ["Lettuce"],
                "instructions": ["Chop and mix."],
                "category_id": 8,
                "user_id": null,
                "created_at": "2024-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), MemoryTokenStore::with_token("T1"));
        let recipe = api
            .update_recipe(
                id,
                RecipeDraft {
                    name: "Salad".to_string(),
                    ingredients: vec!["Lettuce".to_string()],
                    instructions: vec!["Chop and mix.".to_string()],
                    category_id: Some(8),
                    image: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(recipe.category_id, Some(8));
    }

    #[tokio::test]
    async fn test_error_statuses_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "UNAUTHORIZED", "message": "Invalid login credentials."}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": "FORBIDDEN", "message": "Recipe belongs to another user."}
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri(), MemoryTokenStore::new());

        let err = api.login("alice", "bad").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized { .. }));
        assert_eq!(err.server_message(), Some("Invalid login credentials."));
        assert_eq!(api.tokens().load(), None);

        let err = api.me().await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));

        let err = api.delete_recipe(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.server_message(), Some("Recipe belongs to another user."));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ApiClient::new("http://localhost:3000/", MemoryTokenStore::new());
        assert_eq!(api.url("/me"), "http://localhost:3000/me");
    }

    #[test]
    fn test_logout_clears_token() {
        let api = ApiClient::new("http://localhost:3000", MemoryTokenStore::with_token("T1"));
        assert!(api.has_token());
        api.logout();
        assert!(!api.has_token());
    }
}
