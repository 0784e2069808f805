use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use rust_decimal::Decimal;

use crate::middleware::AuthUser;
use crate::models::historique_bankroll;
use crate::models::dto::BankrollOperationRequest;
use crate::services::bankroll_service::BankrollService;

// DTO pour l'état de la bankroll
#[derive(Serialize)]
pub struct BankrollResponse {
    pub bankroll_initiale: Decimal,
    pub bankroll_actuelle: Decimal,
    pub bankroll_disponible: Decimal,
    pub mise_engagee_totale: Decimal,
    pub historique: Vec<historique_bankroll::Model>,
}

/// GET /api/bankroll - Solde courant + dernières opérations
#[get("")]
pub async fn get_bankroll(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let parametres = match BankrollService::get_or_init(db.get_ref()).await {
        Ok(p) => p,
        Err(e) => return e.to_response(),
    };

    let mise_engagee_totale = match BankrollService::mise_engagee_totale(db.get_ref()).await {
        Ok(total) => total,
        Err(e) => return e.to_response(),
    };

    let historique = historique_bankroll::Entity::find()
        .order_by_desc(historique_bankroll::Column::DateOperation)
        .limit(20)
        .all(db.get_ref())
        .await;

    match historique {
        Ok(historique) => HttpResponse::Ok().json(BankrollResponse {
            bankroll_initiale: parametres.bankroll_initiale,
            bankroll_actuelle: parametres.bankroll_actuelle,
            bankroll_disponible: parametres.bankroll_disponible,
            mise_engagee_totale,
            historique,
        }),
        Err(e) => {
            tracing::error!("failed to fetch bankroll history: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

/// POST /api/bankroll - Dépôt ou retrait manuel
#[post("")]
pub async fn operation_bankroll(
    _auth_user: AuthUser,
    body: web::Json<BankrollOperationRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match BankrollService::operation_manuelle(db.get_ref(), body.into_inner()).await {
        Ok((parametres, operation)) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "settings": parametres,
            "operation": operation
        })),
        Err(e) => e.to_response(),
    }
}

pub fn bankroll_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bankroll")
            .service(get_bankroll)
            .service(operation_bankroll)
    );
}
