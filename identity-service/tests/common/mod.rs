#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use credentials::HashingCost;
use http_body_util::BodyExt;
use identity_service::domain::identity::service::IdentityService;
use identity_service::identity::errors::StoreError;
use identity_service::identity::errors::UniqueField;
use identity_service::identity::models::Identity;
use identity_service::identity::models::IdentityId;
use identity_service::identity::ports::IdentityRepository;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::hashing::Argon2CredentialHasher;
use tower::ServiceExt;

/// Identity store kept in memory, with the same uniqueness rules as Postgres.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: Mutex<Vec<Identity>>,
    save_calls: Mutex<usize>,
}

impl InMemoryIdentityRepository {
    pub fn len(&self) -> usize {
        self.identities.lock().unwrap().len()
    }

    pub fn save_calls(&self) -> usize {
        *self.save_calls.lock().unwrap()
    }

    fn find<P>(&self, predicate: P) -> Option<Identity>
    where
        P: Fn(&Identity) -> bool,
    {
        self.identities
            .lock()
            .unwrap()
            .iter()
            .find(|identity| predicate(identity))
            .cloned()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn save(&self, identity: &Identity) -> Result<IdentityId, StoreError> {
        *self.save_calls.lock().unwrap() += 1;

        if identity.secret.hashed_value().is_none() {
            return Err(StoreError::PlaintextSecret);
        }

        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.username == identity.username) {
            return Err(StoreError::Duplicate {
                field: UniqueField::Username,
                value: identity.username.to_string(),
            });
        }
        if identities.iter().any(|i| i.email == identity.email) {
            return Err(StoreError::Duplicate {
                field: UniqueField::Email,
                value: identity.email.to_string(),
            });
        }

        let id = IdentityId(identities.len() as i32 + 1);
        let mut stored = identity.clone();
        stored.id = id;
        identities.push(stored);

        Ok(id)
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        Ok(self.find(|identity| identity.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.find(|identity| identity.username.as_str() == username))
    }

    async fn find_by_username_or_email(
        &self,
        login: &str,
    ) -> Result<Option<Identity>, StoreError> {
        Ok(self.find(|identity| {
            identity.username.as_str() == login || identity.email.as_str() == login
        }))
    }
}

/// Test application wiring the real router, service and Argon2 hasher
/// over an in-memory store
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryIdentityRepository>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let repository = Arc::new(InMemoryIdentityRepository::default());
        let hasher = Arc::new(
            Argon2CredentialHasher::new(HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .expect("Failed to create hasher"),
        );
        let service = Arc::new(IdentityService::new(Arc::clone(&repository), hasher));

        Self {
            router: create_router(service),
            repository,
        }
    }

    /// Send a JSON POST and return status plus parsed body
    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    /// Send a raw-body POST (used for malformed payloads)
    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::get(path)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        (status, body)
    }

    /// Register the canonical test identity
    pub async fn register_default(&self) -> (StatusCode, serde_json::Value) {
        self.post_json(
            "/api/v1/users/create-user",
            serde_json::json!({
                "userName": "eduardolima806",
                "displayName": "Eduardo Lima",
                "email": "eduardolima.dev.io@gmail.com",
                "password": "P4$$w0rd"
            }),
        )
        .await
    }
}
