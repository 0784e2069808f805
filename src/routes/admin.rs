use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::middleware::AuthUser;
use crate::models::dto::BankrollInitialeRequest;
use crate::services::bankroll_service::BankrollService;

/// POST /api/admin/reset - Efface montantes, paliers et historique,
/// remet la bankroll à zéro. Irréversible.
#[post("/reset")]
pub async fn reset(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BankrollService::reset(db.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "All data has been reset"
        })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/admin/bankroll-initiale - Rebase la bankroll de départ,
/// le delta se propage dans actuelle/disponible via le journal
#[post("/bankroll-initiale")]
pub async fn bankroll_initiale(
    _auth_user: AuthUser,
    body: web::Json<BankrollInitialeRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BankrollService::definir_bankroll_initiale(db.get_ref(), body.montant).await {
        Ok(parametres) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "settings": parametres
        })),
        Err(e) => e.to_response(),
    }
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(reset)
            .service(bankroll_initiale)
    );
}
