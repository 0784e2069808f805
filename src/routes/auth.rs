use actix_web::{post, get, web, HttpResponse};
use actix_web::cookie::{Cookie, SameSite};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait, PaginatorTrait};
use serde::{Deserialize, Serialize};
use chrono::Utc;
use validator::Validate;

use crate::models::users::{Entity as Users, Column as UserColumn, ActiveModel as UserActiveModel};
use crate::utils::{password, jwt};
use crate::middleware::AuthUser;

// DTO pour la création du compte admin
#[derive(Deserialize, Validate)]
pub struct SetupRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Réponse après setup/login
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
}

// Réponse pour /auth/me
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i32,
    pub username: String,
}

fn cookie_session(token: &str) -> Cookie<'static> {
    Cookie::build(jwt::SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// POST /auth/setup - Créer le compte admin (PUBLIC, une seule fois)
#[post("/setup")]
pub async fn setup(
    body: web::Json<SetupRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Refuser si un compte existe déjà
    let existants = match Users::find().count(db.get_ref()).await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("database error: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };
    if existants > 0 {
        return HttpResponse::Conflict().json(serde_json::json!({
            "error": "Admin account already exists"
        }));
    }

    // 2. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("failed to hash password: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    // 3. Créer le compte
    let nouveau = UserActiveModel {
        username: Set(body.username.clone()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let user = match nouveau.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("failed to create admin account: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    // 4. Générer le token de session
    let token = match jwt::generate_token(user.id, &user.username) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to generate token: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    HttpResponse::Created()
        .cookie(cookie_session(&token))
        .json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
        })
}

/// POST /auth/login - Se connecter (PUBLIC) ; pose le cookie de session
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver le compte
    let user = Users::find()
        .filter(UserColumn::Username.eq(&body.username))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid username or password"
            }));
        }
        Err(e) => {
            tracing::error!("database error: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!("password verification error: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid username or password"
        }));
    }

    // 3. Générer le token de session
    let token = match jwt::generate_token(user.id, &user.username) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to generate token: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    HttpResponse::Ok()
        .cookie(cookie_session(&token))
        .json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
        })
}

/// POST /auth/logout - Expire le cookie de session
#[post("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = cookie_session("");
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "success": true
    }))
}

/// GET /auth/me - Vérifier la session (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth_user.user_id,
        username: auth_user.username,
    })
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(setup)
            .service(login)
            .service(logout)
            .service(me)
    );
}
