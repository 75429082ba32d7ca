/*!
 * # Authentication Module
 *
 * JWT (HS256) session authentication for professional accounts. A login
 * issues an access token whose claims carry the user's owning salon id;
 * the auth middleware validates the bearer token and places an
 * [`AuthUser`] in request extensions, which the tenant scope guard then
 * resolves into the tenant key for every data access in the request.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{salon, user},
    errors::ServiceError,
};

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Subject (user ID)
    pub name: String,     // User's display name
    pub email: String,    // User's email
    pub salon_id: String, // Owning salon (the tenant key)
    pub jti: String,      // JWT ID
    pub iat: i64,         // Issued at time
    pub exp: i64,         // Expiration time
    pub nbf: i64,         // Not valid before time
    pub iss: String,      // Issuer
    pub aud: String,      // Audience
}

/// Authenticated principal extracted from a validated token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub salon_id: Uuid,
    pub token_id: String,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
        }
    }
}

/// Issued session token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Registration payload: creates the salon (tenant) and its first user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "Salon name is required"))]
    pub salon_name: String,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login credentials
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: TokenResponse,
    pub user_id: Uuid,
    pub salon_id: Uuid,
    pub salon_slug: String,
}

/// Authentication service that handles account creation, login and
/// token validation
#[derive(Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Registers a new salon and its owning professional account
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let now = Utc::now();
        let slug = slugify(&request.salon_name);

        let existing_slug = salon::Entity::find()
            .filter(salon::Column::Slug.eq(slug.clone()))
            .one(db)
            .await?;
        if existing_slug.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A salon with slug '{}' already exists",
                slug
            )));
        }

        let existing_email = user::Entity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(db)
            .await?;
        if existing_email.is_some() {
            return Err(ServiceError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let salon_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let txn = db.begin().await?;

        salon::ActiveModel {
            id: Set(salon_id),
            name: Set(request.salon_name.clone()),
            slug: Set(slug.clone()),
            about: Set(None),
            phone: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let user_model = user::ActiveModel {
            id: Set(user_id),
            email: Set(request.email.clone()),
            password_hash: Set(password_hash),
            name: Set(request.name.clone()),
            salon_id: Set(salon_id),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(%salon_id, %user_id, slug = %slug, "Registered new salon");

        let token = self.generate_token(&user_model)?;
        Ok(AuthResponse {
            token,
            user_id,
            salon_id,
            salon_slug: slug,
        })
    }

    /// Authenticates a professional by email and password
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db;
        let account = user::Entity::find()
            .filter(user::Column::Email.eq(request.email.clone()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !account.active {
            return Err(ServiceError::Unauthorized(
                "Account is deactivated".to_string(),
            ));
        }

        if !verify_password(&request.password, &account.password_hash)? {
            warn!(email = %request.email, "Failed login attempt");
            return Err(ServiceError::Unauthorized(
                "Invalid credentials".to_string(),
            ));
        }

        let salon_record = salon::Entity::find_by_id(account.salon_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError("Account has no associated salon".to_string())
            })?;

        let token = self.generate_token(&account)?;
        Ok(AuthResponse {
            token,
            user_id: account.id,
            salon_id: account.salon_id,
            salon_slug: salon_record.slug,
        })
    }

    /// Generates a signed access token for a user
    pub fn generate_token(&self, account: &user::Model) -> Result<TokenResponse, ServiceError> {
        let now = Utc::now();
        let expires_in = self.config.access_token_expiration.as_secs() as i64;

        let claims = Claims {
            sub: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            salon_id: account.salon_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + expires_in,
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("Token creation failed: {}", e)))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Validates a JWT token and extracts the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.clone()]);
        validation.set_audience(&[self.config.jwt_audience.clone()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::Unauthorized("Token has expired".to_string())
            }
            _ => ServiceError::Unauthorized("Invalid authentication token".to_string()),
        })?
        .claims;

        Ok(claims)
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Derives a URL-safe slug from a salon name. ASCII separators and
/// punctuation collapse into single dashes; non-ASCII characters are
/// dropped without leaving a separator behind.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_ascii() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Authentication middleware that validates the bearer token and attaches
/// the authenticated user to request extensions
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return ServiceError::InternalError(
                "Authentication service not available".to_string(),
            )
            .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service) {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extract authentication info from request headers
fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, ServiceError> {
    let auth_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServiceError::Unauthorized("No authentication token provided".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| ServiceError::Unauthorized("No authentication token provided".to_string()))?;

    let claims = auth_service.validate_token(token)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServiceError::Unauthorized("Invalid authentication token".to_string()))?;
    let salon_id = Uuid::parse_str(&claims.salon_id)
        .map_err(|_| ServiceError::Unauthorized("Invalid authentication token".to_string()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        name: claims.name,
        salon_id,
        token_id: claims.jti,
    })
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    axum::Router::new()
        .route("/register", axum::routing::post(register_handler))
        .route("/login", axum::routing::post(login_handler))
        .layer(DefaultBodyLimit::max(1024 * 64)) // 64KB limit
}

/// Register handler
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Salon and account created", body = AuthResponse),
        (status = 409, description = "Slug or email already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let response = auth_service.register(request).await?;
    Ok(Json(response))
}

/// Login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_normalizes_names() {
        assert_eq!(slugify("Bella Hair & Beauty"), "bella-hair-beauty");
        assert_eq!(slugify("  Studio  27 "), "studio-27");
        assert_eq!(slugify("Ünïcode Salon"), "ncode-salon");
        assert_eq!(slugify("Café Río"), "caf-ro");
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn token_round_trip_carries_salon_id() {
        let config = AuthConfig::new(
            "unit_test_secret_key_that_is_at_least_sixty_four_characters_long_0".into(),
            "salonflow-api".into(),
            "salonflow-app".into(),
            Duration::from_secs(3600),
        );
        let service = AuthService::new(config, Arc::new(DatabaseConnection::Disconnected));

        let salon_id = Uuid::new_v4();
        let account = user::Model {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            password_hash: String::new(),
            name: "Owner".into(),
            salon_id,
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        let token = service.generate_token(&account).unwrap();
        let claims = service.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.salon_id, salon_id.to_string());
        assert_eq!(claims.sub, account.id.to_string());
    }

    #[test]
    fn validate_token_rejects_garbage() {
        let config = AuthConfig::new(
            "unit_test_secret_key_that_is_at_least_sixty_four_characters_long_0".into(),
            "salonflow-api".into(),
            "salonflow-app".into(),
            Duration::from_secs(3600),
        );
        let service = AuthService::new(config, Arc::new(DatabaseConnection::Disconnected));

        let err = service.validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
