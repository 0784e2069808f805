use sea_orm::*;
use rust_decimal::Decimal;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{historique_bankroll, montante, palier, settings};
use crate::models::dto::BankrollOperationRequest;
use crate::models::historique_bankroll::TypeOperation;
use crate::models::montante::EtatMontante;
use crate::services::calculs;
use crate::utils::errors::ServiceError;

pub struct BankrollService;

impl BankrollService {
    /// Charge la ligne settings unique, en la créant à zéro au premier accès.
    pub async fn get_or_init<C: ConnectionTrait>(db: &C) -> Result<settings::Model, ServiceError> {
        if let Some(existant) = settings::Entity::find_by_id(settings::SETTINGS_ID)
            .one(db)
            .await?
        {
            return Ok(existant);
        }

        let nouveau = settings::ActiveModel {
            id: Set(settings::SETTINGS_ID),
            bankroll_initiale: Set(Decimal::ZERO),
            bankroll_actuelle: Set(Decimal::ZERO),
            bankroll_disponible: Set(Decimal::ZERO),
            updated_at: Set(Utc::now()),
        };
        Ok(nouveau.insert(db).await?)
    }

    /// Somme des mises réservées par les montantes EN_COURS.
    pub async fn mise_engagee_totale<C: ConnectionTrait>(db: &C) -> Result<Decimal, ServiceError> {
        let en_cours = montante::Entity::find()
            .filter(montante::Column::Etat.eq(EtatMontante::EnCours))
            .all(db)
            .await?;

        Ok(en_cours.iter().map(|m| m.mise_engagee).sum())
    }

    /// Recalcule bankroll_disponible = max(0, actuelle - engagée).
    /// À appeler après chaque mutation touchant les fonds, dans la même transaction.
    pub async fn reconcilier_disponible<C: ConnectionTrait>(
        db: &C,
    ) -> Result<settings::Model, ServiceError> {
        let courant = Self::get_or_init(db).await?;
        let engagee = Self::mise_engagee_totale(db).await?;

        if engagee > courant.bankroll_actuelle {
            tracing::warn!(
                "committed stakes ({engagee}) exceed current bankroll ({})",
                courant.bankroll_actuelle
            );
        }

        let disponible = calculs::disponible(courant.bankroll_actuelle, engagee);
        let mut actif: settings::ActiveModel = courant.into();
        actif.bankroll_disponible = Set(disponible);
        actif.updated_at = Set(Utc::now());
        Ok(actif.update(db).await?)
    }

    /// Applique une opération sur bankroll_actuelle et journalise exactement
    /// une écriture avec les soldes avant/après. Le montant est stocké positif,
    /// le signe est porté par le type.
    pub async fn enregistrer_operation<C: ConnectionTrait>(
        db: &C,
        type_operation: TypeOperation,
        montant: Decimal,
        montante_id: Option<String>,
        description: Option<String>,
    ) -> Result<historique_bankroll::Model, ServiceError> {
        if montant <= Decimal::ZERO {
            return Err(ServiceError::Validation(
                "montant must be greater than 0".to_string(),
            ));
        }

        let courant = Self::get_or_init(db).await?;
        let avant = courant.bankroll_actuelle;
        let apres = avant + calculs::montant_signe(type_operation, montant);

        let mut actif: settings::ActiveModel = courant.into();
        actif.bankroll_actuelle = Set(apres);
        actif.updated_at = Set(Utc::now());
        actif.update(db).await?;

        let entree = historique_bankroll::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            type_operation: Set(type_operation),
            montant: Set(montant),
            montant_avant: Set(avant),
            montant_apres: Set(apres),
            montante_id: Set(montante_id),
            description: Set(description),
            date_operation: Set(Utc::now()),
        };
        Ok(entree.insert(db).await?)
    }

    /// Dépôt ou retrait manuel (POST /bankroll), transactionnel.
    pub async fn operation_manuelle(
        db: &DatabaseConnection,
        requete: BankrollOperationRequest,
    ) -> Result<(settings::Model, historique_bankroll::Model), ServiceError> {
        if !matches!(
            requete.type_operation,
            TypeOperation::Depot | TypeOperation::Retrait
        ) {
            return Err(ServiceError::Validation(
                "type_operation must be DEPOT or RETRAIT".to_string(),
            ));
        }
        if requete.montant <= Decimal::ZERO {
            return Err(ServiceError::Validation(
                "montant must be greater than 0".to_string(),
            ));
        }

        let txn = db.begin().await?;

        if requete.type_operation == TypeOperation::Retrait {
            let courant = Self::get_or_init(&txn).await?;
            if requete.montant > courant.bankroll_disponible {
                return Err(ServiceError::Validation(format!(
                    "Insufficient available bankroll: {} available, {} requested",
                    courant.bankroll_disponible, requete.montant
                )));
            }
        }

        let entree = Self::enregistrer_operation(
            &txn,
            requete.type_operation,
            requete.montant,
            None,
            requete.description,
        )
        .await?;
        let parametres = Self::reconcilier_disponible(&txn).await?;

        txn.commit().await?;
        Ok((parametres, entree))
    }

    /// Rebase la bankroll initiale ; le delta se propage dans actuelle/disponible
    /// via une écriture DEPOT ou RETRAIT, pour que le rejeu du journal reste exact.
    pub async fn definir_bankroll_initiale(
        db: &DatabaseConnection,
        montant: Decimal,
    ) -> Result<settings::Model, ServiceError> {
        if montant < Decimal::ZERO {
            return Err(ServiceError::Validation(
                "Initial bankroll cannot be negative".to_string(),
            ));
        }

        let txn = db.begin().await?;
        let courant = Self::get_or_init(&txn).await?;
        let delta = montant - courant.bankroll_initiale;

        if delta < Decimal::ZERO && -delta > courant.bankroll_actuelle {
            return Err(ServiceError::Validation(format!(
                "Cannot lower the initial bankroll by {} with only {} on hand",
                -delta, courant.bankroll_actuelle
            )));
        }

        let mut actif: settings::ActiveModel = courant.into();
        actif.bankroll_initiale = Set(montant);
        actif.updated_at = Set(Utc::now());
        actif.update(&txn).await?;

        if delta > Decimal::ZERO {
            Self::enregistrer_operation(
                &txn,
                TypeOperation::Depot,
                delta,
                None,
                Some("Ajustement de la bankroll initiale".to_string()),
            )
            .await?;
        } else if delta < Decimal::ZERO {
            Self::enregistrer_operation(
                &txn,
                TypeOperation::Retrait,
                -delta,
                None,
                Some("Ajustement de la bankroll initiale".to_string()),
            )
            .await?;
        }

        let parametres = Self::reconcilier_disponible(&txn).await?;
        txn.commit().await?;
        Ok(parametres)
    }

    /// Remise à zéro complète : montantes, paliers, journal, settings.
    pub async fn reset(db: &DatabaseConnection) -> Result<(), ServiceError> {
        let txn = db.begin().await?;

        palier::Entity::delete_many().exec(&txn).await?;
        montante::Entity::delete_many().exec(&txn).await?;
        historique_bankroll::Entity::delete_many().exec(&txn).await?;

        let courant = Self::get_or_init(&txn).await?;
        let mut actif: settings::ActiveModel = courant.into();
        actif.bankroll_initiale = Set(Decimal::ZERO);
        actif.bankroll_actuelle = Set(Decimal::ZERO);
        actif.bankroll_disponible = Set(Decimal::ZERO);
        actif.updated_at = Set(Utc::now());
        actif.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
