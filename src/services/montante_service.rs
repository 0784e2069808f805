use sea_orm::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{montante, palier};
use crate::models::dto::{CreateMontanteRequest, MontanteDetailResponse, MontanteResponse, UpdateMontanteRequest};
use crate::models::montante::EtatMontante;
use crate::services::bankroll_service::BankrollService;
use crate::services::palier_service::PalierService;
use crate::services::resolution;
use crate::utils::errors::ServiceError;

pub struct MontanteService;

impl MontanteService {
    /// Crée une montante EN_COURS et réserve sa mise contre la bankroll.
    /// Refusé si la bankroll disponible ne couvre pas la mise initiale.
    pub async fn creer(
        db: &DatabaseConnection,
        requete: CreateMontanteRequest,
    ) -> Result<montante::Model, ServiceError> {
        if requete.mise_initiale <= Decimal::ZERO {
            return Err(ServiceError::Validation(
                "mise_initiale must be greater than 0".to_string(),
            ));
        }

        let txn = db.begin().await?;

        let parametres = BankrollService::get_or_init(&txn).await?;
        if requete.mise_initiale > parametres.bankroll_disponible {
            return Err(ServiceError::Validation(format!(
                "Insufficient available bankroll: {} available, {} required",
                parametres.bankroll_disponible, requete.mise_initiale
            )));
        }

        let nouvelle = montante::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nom: Set(requete.nom),
            mise_initiale: Set(requete.mise_initiale),
            objectif: Set(requete.objectif),
            etat: Set(EtatMontante::EnCours),
            mise_engagee: Set(requete.mise_initiale),
            gain_final: Set(None),
            progression: Set(Decimal::ZERO),
            roi: Set(None),
            date_creation: Set(Utc::now()),
            date_fin: Set(None),
        };
        let creee = nouvelle.insert(&txn).await?;

        BankrollService::reconcilier_disponible(&txn).await?;
        txn.commit().await?;
        Ok(creee)
    }

    pub async fn chercher<C: ConnectionTrait>(
        db: &C,
        id: &str,
    ) -> Result<montante::Model, ServiceError> {
        montante::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Montante not found: {id}")))
    }

    /// Liste triée des plus récentes aux plus anciennes, avec le rang
    /// d'affichage (1 = première créée) et le nombre de paliers.
    pub async fn lister(db: &DatabaseConnection) -> Result<Vec<MontanteResponse>, ServiceError> {
        let montantes = montante::Entity::find()
            .order_by_asc(montante::Column::DateCreation)
            .all(db)
            .await?;

        let paliers = palier::Entity::find().all(db).await?;
        let mut nb_paliers: HashMap<String, usize> = HashMap::new();
        for p in &paliers {
            *nb_paliers.entry(p.montante_id.clone()).or_insert(0) += 1;
        }

        let mut reponses: Vec<MontanteResponse> = montantes
            .into_iter()
            .enumerate()
            .map(|(rang, m)| {
                let nb = nb_paliers.get(&m.id).copied().unwrap_or(0);
                Self::vers_reponse(m, (rang + 1) as i64, nb)
            })
            .collect();

        // plus récentes d'abord
        reponses.reverse();
        Ok(reponses)
    }

    pub async fn detail(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<MontanteDetailResponse, ServiceError> {
        let m = Self::chercher(db, id).await?;

        let paliers = palier::Entity::find()
            .filter(palier::Column::MontanteId.eq(&m.id))
            .order_by_asc(palier::Column::NumeroPalier)
            .all(db)
            .await?;

        let rang = montante::Entity::find()
            .filter(montante::Column::DateCreation.lte(m.date_creation))
            .count(db)
            .await?;

        let nb = paliers.len();
        Ok(MontanteDetailResponse {
            montante: Self::vers_reponse(m, rang as i64, nb),
            paliers: paliers.into_iter().map(PalierService::vers_reponse).collect(),
        })
    }

    /// Édition limitée : nom/objectif tant que la montante est EN_COURS,
    /// etat = ARRETEE pour l'arrêt manuel. Les champs financiers dérivés ne
    /// sont jamais modifiables par le client.
    pub async fn mettre_a_jour(
        db: &DatabaseConnection,
        id: &str,
        requete: UpdateMontanteRequest,
    ) -> Result<montante::Model, ServiceError> {
        if let Some(etat) = requete.etat {
            if etat != EtatMontante::Arretee {
                return Err(ServiceError::Validation(
                    "etat only accepts ARRETEE (manual stop)".to_string(),
                ));
            }
            return Self::arreter(db, id).await;
        }

        let txn = db.begin().await?;
        let m = Self::chercher(&txn, id).await?;
        if m.etat.est_terminal() {
            return Err(ServiceError::Conflit(
                "Cannot edit a resolved montante".to_string(),
            ));
        }

        let mut actif: montante::ActiveModel = m.into();
        if let Some(nom) = requete.nom {
            actif.nom = Set(nom);
        }
        if let Some(objectif) = requete.objectif {
            actif.objectif = Set(objectif);
        }
        let m = actif.update(&txn).await?;
        txn.commit().await?;
        Ok(m)
    }

    /// Arrêt manuel : clôt la chaîne sur son gain courant sans objectif atteint.
    pub async fn arreter(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<montante::Model, ServiceError> {
        let txn = db.begin().await?;
        let m = Self::chercher(&txn, id).await?;
        if m.etat.est_terminal() {
            return Err(ServiceError::Conflit(
                "Montante is already resolved".to_string(),
            ));
        }

        let transition = resolution::arreter(m.mise_initiale, m.mise_engagee);
        let m = Self::appliquer_transition(&txn, m, &transition).await?;
        txn.commit().await?;
        Ok(m)
    }

    /// Applique une transition d'état, journalise l'écriture bankroll éventuelle
    /// et réconcilie le disponible. Doit être appelé dans une transaction.
    pub(crate) async fn appliquer_transition<C: ConnectionTrait>(
        db: &C,
        m: montante::Model,
        transition: &resolution::TransitionMontante,
    ) -> Result<montante::Model, ServiceError> {
        let id = m.id.clone();
        let nom = m.nom.clone();
        let terminal = transition.etat.est_terminal();

        let mut actif: montante::ActiveModel = m.into();
        actif.etat = Set(transition.etat);
        actif.mise_engagee = Set(transition.mise_engagee);
        actif.gain_final = Set(transition.gain_final);
        actif.progression = Set(transition.progression);
        actif.roi = Set(transition.roi);
        if terminal {
            actif.date_fin = Set(Some(Utc::now()));
        }
        let m = actif.update(db).await?;

        if let Some((type_operation, montant)) = transition.ecriture {
            BankrollService::enregistrer_operation(
                db,
                type_operation,
                montant,
                Some(id),
                Some(format!("Montante \"{nom}\"")),
            )
            .await?;
        }

        BankrollService::reconcilier_disponible(db).await?;
        Ok(m)
    }

    /// Supprime la montante et ses paliers (cascade). Une montante EN_COURS
    /// libère sa mise réservée ; le journal n'est pas touché (référence faible).
    pub async fn supprimer(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
        let txn = db.begin().await?;
        let m = Self::chercher(&txn, id).await?;

        palier::Entity::delete_many()
            .filter(palier::Column::MontanteId.eq(&m.id))
            .exec(&txn)
            .await?;

        let etait_en_cours = m.etat == EtatMontante::EnCours;
        montante::Entity::delete_by_id(&m.id).exec(&txn).await?;

        if etait_en_cours {
            BankrollService::reconcilier_disponible(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    fn vers_reponse(m: montante::Model, numero_affichage: i64, nb_paliers: usize) -> MontanteResponse {
        // EN_COURS : la mise engagée porte le gain courant ; terminée : le gain final
        let gain_actuel = if m.etat == EtatMontante::EnCours {
            m.mise_engagee
        } else {
            m.gain_final.unwrap_or(Decimal::ZERO)
        };

        MontanteResponse {
            id: m.id,
            nom: m.nom,
            numero_affichage,
            mise_initiale: m.mise_initiale,
            objectif: m.objectif,
            etat: m.etat,
            mise_engagee: m.mise_engagee,
            gain_actuel,
            gain_final: m.gain_final,
            progression: m.progression,
            roi: m.roi,
            nb_paliers,
            date_creation: m.date_creation,
            date_fin: m.date_fin,
        }
    }
}
