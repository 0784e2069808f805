use actix_web::{delete, patch, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::dto::{CombineUpdateRequest, CreatePalierRequest, UpdatePalierRequest};
use crate::services::palier_service::PalierService;

/// POST /api/montantes/{id}/paliers - Ajouter un palier (mise reportée
/// automatiquement depuis le palier précédent). Enregistré dans le
/// scope /montantes.
#[post("/{id}/paliers")]
pub async fn ajouter_palier(
    _auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CreatePalierRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match PalierService::ajouter(db.get_ref(), &path.into_inner(), body.into_inner()).await {
        Ok(palier) => HttpResponse::Created().json(PalierService::vers_reponse(palier)),
        Err(e) => e.to_response(),
    }
}

/// PUT /api/paliers/{id} - Éditer la cote (EN_ATTENTE) ou résoudre un
/// pari SIMPLE ; la montante et la bankroll suivent dans la même transaction
#[put("/{id}")]
pub async fn modifier_palier(
    _auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdatePalierRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match PalierService::mettre_a_jour(db.get_ref(), &path.into_inner(), body.into_inner()).await {
        Ok((palier, montante)) => HttpResponse::Ok().json(serde_json::json!({
            "palier": palier,
            "montante": montante
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/paliers/{id} - Supprimer le dernier palier (retour en
/// arrière d'un cran de la montante)
#[delete("/{id}")]
pub async fn supprimer_palier(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match PalierService::supprimer(db.get_ref(), &path.into_inner()).await {
        Ok(montante) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "montante": montante
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/paliers/combine - Mise à jour groupée des sous-matchs d'un
/// combiné et tentative de résolution
#[patch("/combine")]
pub async fn resoudre_combine(
    _auth_user: AuthUser,
    body: web::Json<CombineUpdateRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match PalierService::resoudre_combine(db.get_ref(), body.into_inner()).await {
        Ok((palier, montante, finalise)) => HttpResponse::Ok().json(serde_json::json!({
            "palier": palier,
            "montante": montante,
            "finalise": finalise
        })),
        Err(e) => e.to_response(),
    }
}

pub fn palier_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/paliers")
            .service(resoudre_combine)
            .service(modifier_palier)
            .service(supprimer_palier)
    );
}
