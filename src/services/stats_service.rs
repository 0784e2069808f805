use sea_orm::*;
use rust_decimal::Decimal;
use chrono::{Duration, Utc};

use crate::models::{historique_bankroll, montante};
use crate::models::dto::{HistoriqueFilter, HistoriqueResponse, HistoriqueStats, StatsResponse};
use crate::models::historique_bankroll::TypeOperation;
use crate::models::montante::EtatMontante;
use crate::services::calculs;
use crate::utils::errors::ServiceError;

pub struct StatsService;

impl StatsService {
    /// Agrégation globale : répartition des états, taux de réussite,
    /// gains/pertes journalisés, ROI sur les montantes terminées.
    pub async fn stats_globales(db: &DatabaseConnection) -> Result<StatsResponse, ServiceError> {
        let montantes = montante::Entity::find().all(db).await?;
        let operations = historique_bankroll::Entity::find().all(db).await?;

        let nb_en_cours = montantes
            .iter()
            .filter(|m| m.etat == EtatMontante::EnCours)
            .count();
        let nb_reussies = montantes
            .iter()
            .filter(|m| m.etat == EtatMontante::Reussi)
            .count();
        let nb_perdues = montantes
            .iter()
            .filter(|m| m.etat == EtatMontante::Perdu)
            .count();
        let nb_arretees = montantes
            .iter()
            .filter(|m| m.etat == EtatMontante::Arretee)
            .count();

        let terminees: Vec<&montante::Model> = montantes
            .iter()
            .filter(|m| m.etat.est_terminal())
            .collect();

        let taux_reussite = if terminees.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(nb_reussies) / Decimal::from(terminees.len()) * Decimal::ONE_HUNDRED
        };

        let gains_totaux: Decimal = operations
            .iter()
            .filter(|o| o.type_operation == TypeOperation::GainMontante)
            .map(|o| o.montant)
            .sum();
        let pertes_totales: Decimal = operations
            .iter()
            .filter(|o| o.type_operation == TypeOperation::PerteMontante)
            .map(|o| o.montant)
            .sum();

        let mises_terminees: Decimal = terminees.iter().map(|m| m.mise_initiale).sum();
        let roi_global = if mises_terminees.is_zero() {
            Decimal::ZERO
        } else {
            (gains_totaux - pertes_totales) / mises_terminees * Decimal::ONE_HUNDRED
        };

        // série de REUSSI consécutifs, dans l'ordre de clôture
        let mut cloturees: Vec<&montante::Model> = terminees.clone();
        cloturees.sort_by_key(|m| m.date_fin);
        let etats: Vec<EtatMontante> = cloturees.iter().map(|m| m.etat).collect();

        Ok(StatsResponse {
            nb_montantes: montantes.len(),
            nb_en_cours,
            nb_reussies,
            nb_perdues,
            nb_arretees,
            taux_reussite,
            gains_totaux,
            pertes_totales,
            bilan_net: gains_totaux - pertes_totales,
            roi_global,
            meilleure_serie: meilleure_serie(&etats),
        })
    }

    /// Vue filtrée du journal (période + type) avec agrégats.
    pub async fn historique(
        db: &DatabaseConnection,
        filtre: HistoriqueFilter,
    ) -> Result<HistoriqueResponse, ServiceError> {
        let mut requete = historique_bankroll::Entity::find();

        if let Some(type_operation) = filtre.type_operation {
            requete = requete
                .filter(historique_bankroll::Column::TypeOperation.eq(type_operation));
        }
        if let Some(jours) = jours_de_periode(filtre.periode.as_deref())? {
            let depuis = Utc::now() - Duration::days(jours);
            requete = requete.filter(historique_bankroll::Column::DateOperation.gte(depuis));
        }

        let operations = requete
            .order_by_desc(historique_bankroll::Column::DateOperation)
            .all(db)
            .await?;

        let stats = agreger(&operations);
        Ok(HistoriqueResponse { operations, stats })
    }
}

fn jours_de_periode(periode: Option<&str>) -> Result<Option<i64>, ServiceError> {
    match periode {
        None | Some("tout") => Ok(None),
        Some("7j") => Ok(Some(7)),
        Some("30j") => Ok(Some(30)),
        Some("90j") => Ok(Some(90)),
        Some(autre) => Err(ServiceError::Validation(format!(
            "Invalid periode: {autre} (expected 7j, 30j, 90j or tout)"
        ))),
    }
}

fn agreger(operations: &[historique_bankroll::Model]) -> HistoriqueStats {
    let mut stats = HistoriqueStats {
        total_depots: Decimal::ZERO,
        total_retraits: Decimal::ZERO,
        total_gains: Decimal::ZERO,
        total_pertes: Decimal::ZERO,
        solde_net: Decimal::ZERO,
        nb_operations: operations.len(),
    };

    for operation in operations {
        match operation.type_operation {
            TypeOperation::Depot => stats.total_depots += operation.montant,
            TypeOperation::Retrait => stats.total_retraits += operation.montant,
            TypeOperation::GainMontante => stats.total_gains += operation.montant,
            TypeOperation::PerteMontante => stats.total_pertes += operation.montant,
        }
        stats.solde_net += calculs::montant_signe(operation.type_operation, operation.montant);
    }

    stats
}

/// Plus longue série de REUSSI consécutifs.
fn meilleure_serie(etats: &[EtatMontante]) -> usize {
    let mut meilleure = 0;
    let mut courante = 0;
    for etat in etats {
        if *etat == EtatMontante::Reussi {
            courante += 1;
            meilleure = meilleure.max(courante);
        } else {
            courante = 0;
        }
    }
    meilleure
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn operation(type_operation: TypeOperation, montant: Decimal) -> historique_bankroll::Model {
        historique_bankroll::Model {
            id: format!("op-{montant}"),
            type_operation,
            montant,
            montant_avant: Decimal::ZERO,
            montant_apres: Decimal::ZERO,
            montante_id: None,
            description: None,
            date_operation: Utc::now(),
        }
    }

    #[test]
    fn test_jours_de_periode() {
        assert_eq!(jours_de_periode(None).unwrap(), None);
        assert_eq!(jours_de_periode(Some("tout")).unwrap(), None);
        assert_eq!(jours_de_periode(Some("7j")).unwrap(), Some(7));
        assert_eq!(jours_de_periode(Some("30j")).unwrap(), Some(30));
        assert_eq!(jours_de_periode(Some("90j")).unwrap(), Some(90));
        assert!(jours_de_periode(Some("1an")).is_err());
    }

    #[test]
    fn test_agreger() {
        let operations = vec![
            operation(TypeOperation::Depot, dec!(100)),
            operation(TypeOperation::GainMontante, dec!(30)),
            operation(TypeOperation::PerteMontante, dec!(10)),
            operation(TypeOperation::Retrait, dec!(25)),
        ];
        let stats = agreger(&operations);
        assert_eq!(stats.total_depots, dec!(100));
        assert_eq!(stats.total_gains, dec!(30));
        assert_eq!(stats.total_pertes, dec!(10));
        assert_eq!(stats.total_retraits, dec!(25));
        assert_eq!(stats.solde_net, dec!(95));
        assert_eq!(stats.nb_operations, 4);
    }

    #[test]
    fn test_meilleure_serie() {
        use EtatMontante::*;
        assert_eq!(meilleure_serie(&[]), 0);
        assert_eq!(meilleure_serie(&[Reussi, Reussi, Perdu, Reussi]), 2);
        assert_eq!(meilleure_serie(&[Perdu, Arretee, Perdu]), 0);
        assert_eq!(meilleure_serie(&[Reussi, Reussi, Reussi]), 3);
    }
}
