// Calculs purs sur la bankroll et les montantes : aucun effet de bord,
// aucune requête. Les services appliquent ces résultats en base.
use rust_decimal::Decimal;

use crate::models::historique_bankroll::TypeOperation;
use crate::models::montante::Objectif;

/// Progression en % par rapport à la mise initiale.
/// Une mise nulle retourne 0 au lieu d'échouer ; l'API valide mise > 0 en amont.
pub fn progression(mise: Decimal, gain: Decimal) -> Decimal {
    if mise.is_zero() {
        return Decimal::ZERO;
    }
    (gain - mise) / mise * Decimal::ONE_HUNDRED
}

/// ROI en % sur le gain final. 0 tant que la montante n'est pas terminée.
pub fn roi(mise: Decimal, gain_final: Option<Decimal>) -> Decimal {
    match gain_final {
        Some(gain) if !mise.is_zero() => (gain - mise) / mise * Decimal::ONE_HUNDRED,
        _ => Decimal::ZERO,
    }
}

pub fn objectif_atteint(mise: Decimal, gain: Decimal, objectif: Objectif) -> bool {
    gain >= mise * objectif.multiplicateur()
}

/// Bankroll disponible = actuelle - engagée, plancher à 0.
/// Le sur-engagement est signalé par l'appelant, jamais représenté en négatif.
pub fn disponible(actuelle: Decimal, engagee: Decimal) -> Decimal {
    (actuelle - engagee).max(Decimal::ZERO)
}

/// Montant signé d'une opération (stocké positif, signe porté par le type).
pub fn montant_signe(type_operation: TypeOperation, montant: Decimal) -> Decimal {
    if type_operation.credite() {
        montant
    } else {
        -montant
    }
}

/// Rejoue le journal dans l'ordre chronologique. Doit reproduire exactement
/// bankroll_actuelle à partir de bankroll_initiale.
pub fn rejouer_historique(
    bankroll_initiale: Decimal,
    operations: &[(TypeOperation, Decimal)],
) -> Decimal {
    operations
        .iter()
        .fold(bankroll_initiale, |solde, (type_operation, montant)| {
            solde + montant_signe(*type_operation, *montant)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_progression_identite() {
        assert_eq!(progression(dec!(100), dec!(100)), Decimal::ZERO);
        assert_eq!(progression(dec!(37.5), dec!(37.5)), Decimal::ZERO);
    }

    #[test]
    fn test_progression_gain_et_perte() {
        assert_eq!(progression(dec!(100), dec!(200)), dec!(100));
        assert_eq!(progression(dec!(100), dec!(50)), dec!(-50));
        assert_eq!(progression(dec!(100), dec!(0)), dec!(-100));
    }

    #[test]
    fn test_progression_mise_nulle() {
        assert_eq!(progression(Decimal::ZERO, dec!(50)), Decimal::ZERO);
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi(dec!(100), Some(dec!(250))), dec!(150));
        assert_eq!(roi(dec!(100), None), Decimal::ZERO);
        assert_eq!(roi(Decimal::ZERO, Some(dec!(10))), Decimal::ZERO);
    }

    #[test]
    fn test_objectif_atteint_seuil() {
        assert!(objectif_atteint(dec!(100), dec!(200), Objectif::X2));
        assert!(!objectif_atteint(dec!(100), dec!(199.99), Objectif::X2));
        assert!(objectif_atteint(dec!(10), dec!(30), Objectif::X3));
        assert!(objectif_atteint(dec!(10), dec!(101), Objectif::X10));
        assert!(!objectif_atteint(dec!(10), dec!(49.99), Objectif::X5));
    }

    #[test]
    fn test_disponible_plancher_zero() {
        assert_eq!(disponible(dec!(100), dec!(30)), dec!(70));
        assert_eq!(disponible(dec!(100), dec!(150)), Decimal::ZERO);
    }

    #[test]
    fn test_rejouer_historique() {
        let operations = vec![
            (TypeOperation::Depot, dec!(100)),
            (TypeOperation::PerteMontante, dec!(10)),
            (TypeOperation::GainMontante, dec!(30)),
            (TypeOperation::Retrait, dec!(50)),
        ];
        assert_eq!(rejouer_historique(dec!(200), &operations), dec!(270));
        assert_eq!(rejouer_historique(Decimal::ZERO, &[]), Decimal::ZERO);
    }
}
