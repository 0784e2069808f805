use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::dto::{CreateMontanteRequest, UpdateMontanteRequest};
use crate::services::montante_service::MontanteService;
use super::palier::ajouter_palier;

/// GET /api/montantes - Liste avec numero_affichage, gain_actuel, progression
#[get("")]
pub async fn lister_montantes(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match MontanteService::lister(db.get_ref()).await {
        Ok(montantes) => HttpResponse::Ok().json(montantes),
        Err(e) => e.to_response(),
    }
}

/// POST /api/montantes - Créer une montante (réserve la mise sur la bankroll)
#[post("")]
pub async fn creer_montante(
    _auth_user: AuthUser,
    body: web::Json<CreateMontanteRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match MontanteService::creer(db.get_ref(), body.into_inner()).await {
        Ok(montante) => HttpResponse::Created().json(montante),
        Err(e) => e.to_response(),
    }
}

/// GET /api/montantes/{id} - Détail avec les paliers ordonnés
#[get("/{id}")]
pub async fn detail_montante(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match MontanteService::detail(db.get_ref(), &path.into_inner()).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => e.to_response(),
    }
}

/// PUT /api/montantes/{id} - nom/objectif tant qu'EN_COURS ;
/// etat = ARRETEE déclenche l'arrêt manuel
#[put("/{id}")]
pub async fn modifier_montante(
    _auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateMontanteRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match MontanteService::mettre_a_jour(db.get_ref(), &path.into_inner(), body.into_inner()).await
    {
        Ok(montante) => HttpResponse::Ok().json(montante),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/montantes/{id} - Supprime la montante et ses paliers
#[delete("/{id}")]
pub async fn supprimer_montante(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match MontanteService::supprimer(db.get_ref(), &path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Montante deleted"
        })),
        Err(e) => e.to_response(),
    }
}

pub fn montante_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/montantes")
            .service(lister_montantes)
            .service(creer_montante)
            .service(detail_montante)
            .service(modifier_montante)
            .service(supprimer_montante)
            .service(ajouter_palier)
    );
}
