use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Admin authentifié, extrait du cookie de session ou d'un header Bearer.
/// Utilisé comme extracteur dans toutes les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

fn unauthorized(message: &str) -> Ready<Result<AuthUser, Error>> {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    ready(Err(actix_web::error::InternalError::from_response(
        "",
        response,
    ).into()))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Cookie de session HTTP-only posé par /auth/login
        let mut token = req
            .cookie(jwt::SESSION_COOKIE)
            .map(|c| c.value().to_string());

        // 2. Sinon, header "Authorization: Bearer <token>"
        if token.is_none() {
            token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|t| t.to_string());
        }

        let token = match token {
            Some(t) => t,
            None => return unauthorized("Authentication required"),
        };

        // 3. Vérifier le token de session
        let claims = match jwt::verify_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": format!("Invalid token: {}", e)
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        ready(Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        }))
    }
}
