pub mod admin;
pub mod auth;
pub mod bankroll;
pub mod health;
pub mod historique;
pub mod montante;
pub mod palier;
pub mod stats;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(montante::montante_routes)
            .configure(palier::palier_routes)
            .configure(bankroll::bankroll_routes)
            .configure(historique::historique_routes)
            .configure(stats::stats_routes)
            .configure(admin::admin_routes)
    );
}
