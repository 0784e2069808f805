use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::middleware::AuthUser;
use crate::models::dto::HistoriqueFilter;
use crate::services::stats_service::StatsService;

/// GET /api/historique?periode=7j&type_operation=GAIN_MONTANTE
#[get("")]
pub async fn get_historique(
    _auth_user: AuthUser,
    filtre: web::Query<HistoriqueFilter>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match StatsService::historique(db.get_ref(), filtre.into_inner()).await {
        Ok(reponse) => HttpResponse::Ok().json(reponse),
        Err(e) => e.to_response(),
    }
}

/// POST /api/historique - même filtre, passé en corps JSON
#[post("")]
pub async fn post_historique(
    _auth_user: AuthUser,
    filtre: web::Json<HistoriqueFilter>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match StatsService::historique(db.get_ref(), filtre.into_inner()).await {
        Ok(reponse) => HttpResponse::Ok().json(reponse),
        Err(e) => e.to_response(),
    }
}

pub fn historique_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/historique")
            .service(get_historique)
            .service(post_historique)
    );
}
