use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::middleware::AuthUser;
use crate::services::stats_service::StatsService;

/// GET /api/stats - Taux de réussite, ROI global, gains/pertes agrégés
#[get("")]
pub async fn stats_globales(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match StatsService::stats_globales(db.get_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => e.to_response(),
    }
}

pub fn stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/stats").service(stats_globales));
}
