use actix_web::HttpResponse;
use sea_orm::DbErr;
use thiserror::Error;

/// Erreurs des services, traduites en réponses JSON `{"error": ...}`.
///
/// Taxonomie : Validation et Conflit -> 400, NotFound -> 404,
/// Db et Interne -> 500 (message générique, détail loggé côté serveur).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Conflit d'état : montante résolue, palier non-dernier, combiné incomplet...
    #[error("{0}")]
    Conflit(String),
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("{0}")]
    Interne(String),
}

impl ServiceError {
    pub fn to_response(&self) -> HttpResponse {
        match self {
            ServiceError::Validation(msg) | ServiceError::Conflit(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::NotFound(msg) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": msg }))
            }
            ServiceError::Db(e) => {
                tracing::error!("database error: {e}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            ServiceError::Interne(msg) => {
                tracing::error!("internal error: {msg}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
