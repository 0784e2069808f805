// Résolution pure des paliers et transitions d'état des montantes.
// Les services traduisent ces valeurs en écritures SeaORM ; ici tout est
// calculable et testable sans base de données.
use rust_decimal::Decimal;

use crate::models::historique_bankroll::TypeOperation;
use crate::models::montante::{EtatMontante, Objectif};
use crate::models::palier::{DetailMatch, StatutMatch, StatutPalier};
use crate::services::calculs;
use crate::utils::errors::ServiceError;

/// Issue d'un palier résolu : statut terminal, cote réalisée, gain.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuePalier {
    pub statut: StatutPalier,
    pub cote_finale: Decimal,
    pub gain: Decimal,
}

/// Résout un pari SIMPLE.
/// GAGNE : gain = mise * cote. ANNULE : mise remboursée. PERDU : gain = 0.
pub fn resoudre_simple(
    mise: Decimal,
    cote: Decimal,
    statut: StatutPalier,
) -> Result<IssuePalier, ServiceError> {
    match statut {
        StatutPalier::Gagne => Ok(IssuePalier {
            statut: StatutPalier::Gagne,
            cote_finale: cote,
            gain: mise * cote,
        }),
        StatutPalier::Annule => Ok(IssuePalier {
            statut: StatutPalier::Annule,
            cote_finale: Decimal::ONE,
            gain: mise,
        }),
        StatutPalier::Perdu => Ok(IssuePalier {
            statut: StatutPalier::Perdu,
            cote_finale: Decimal::ZERO,
            gain: Decimal::ZERO,
        }),
        StatutPalier::EnAttente => Err(ServiceError::Validation(
            "Statut must be GAGNE, PERDU or ANNULE".to_string(),
        )),
    }
}

/// Résultat de l'algorithme de résolution d'un combiné.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionCombine {
    /// Des sous-matchs restent EN_ATTENTE et aucun n'est PERDU :
    /// le palier ne peut pas encore être finalisé.
    Indeterminee,
    Resolue(IssuePalier),
}

/// Résout un pari COMBINE à partir de ses sous-matchs, appliqué à chaque
/// mise à jour de statut :
/// 1. un sous-match PERDU fait perdre tout le palier (court-circuit) ;
/// 2. sinon, un sous-match EN_ATTENTE bloque la finalisation ;
/// 3. la cote effective est le produit des cotes GAGNE, les ANNULE
///    comptant pour 1 (comme s'ils n'avaient jamais été misés) ;
/// 4. tout ANNULE => palier ANNULE, mise remboursée ;
/// 5. sinon GAGNE, gain = mise * cote effective.
pub fn resoudre_combine(mise: Decimal, matchs: &[DetailMatch]) -> ResolutionCombine {
    if matchs.iter().any(|m| m.statut == StatutMatch::Perdu) {
        return ResolutionCombine::Resolue(IssuePalier {
            statut: StatutPalier::Perdu,
            cote_finale: Decimal::ZERO,
            gain: Decimal::ZERO,
        });
    }

    if matchs.iter().any(|m| m.statut == StatutMatch::EnAttente) {
        return ResolutionCombine::Indeterminee;
    }

    if matchs.iter().all(|m| m.statut == StatutMatch::Annule) {
        return ResolutionCombine::Resolue(IssuePalier {
            statut: StatutPalier::Annule,
            cote_finale: Decimal::ONE,
            gain: mise,
        });
    }

    let cote_effective = matchs
        .iter()
        .filter(|m| m.statut == StatutMatch::Gagne)
        .fold(Decimal::ONE, |produit, m| produit * m.cote);

    ResolutionCombine::Resolue(IssuePalier {
        statut: StatutPalier::Gagne,
        cote_finale: cote_effective,
        gain: mise * cote_effective,
    })
}

/// Nouvel état d'une montante après la résolution d'un palier, et
/// l'écriture bankroll à journaliser le cas échéant (montant positif,
/// signe porté par le type d'opération).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMontante {
    pub etat: EtatMontante,
    pub mise_engagee: Decimal,
    pub gain_final: Option<Decimal>,
    pub progression: Decimal,
    pub roi: Option<Decimal>,
    pub ecriture: Option<(TypeOperation, Decimal)>,
}

/// Applique l'issue d'un palier à la montante :
/// - PERDU : montante PERDU, tout est perdu, PERTE_MONTANTE de la mise initiale ;
/// - GAGNE et objectif atteint : montante REUSSI, GAIN_MONTANTE du net ;
/// - GAGNE sans atteindre l'objectif : reste EN_COURS, le gain est relancé ;
/// - ANNULE : reste EN_COURS, mise remboursée, progression inchangée.
pub fn appliquer_issue(
    mise_initiale: Decimal,
    objectif: Objectif,
    issue: &IssuePalier,
) -> TransitionMontante {
    match issue.statut {
        StatutPalier::Perdu => TransitionMontante {
            etat: EtatMontante::Perdu,
            mise_engagee: Decimal::ZERO,
            gain_final: Some(Decimal::ZERO),
            progression: -Decimal::ONE_HUNDRED,
            roi: Some(-Decimal::ONE_HUNDRED),
            ecriture: Some((TypeOperation::PerteMontante, mise_initiale)),
        },
        StatutPalier::Gagne if calculs::objectif_atteint(mise_initiale, issue.gain, objectif) => {
            let progression = calculs::progression(mise_initiale, issue.gain);
            TransitionMontante {
                etat: EtatMontante::Reussi,
                mise_engagee: Decimal::ZERO,
                gain_final: Some(issue.gain),
                progression,
                roi: Some(progression),
                ecriture: Some((TypeOperation::GainMontante, issue.gain - mise_initiale)),
            }
        }
        // GAGNE sans objectif, ou ANNULE (gain = mise remboursée)
        _ => TransitionMontante {
            etat: EtatMontante::EnCours,
            mise_engagee: issue.gain,
            gain_final: None,
            progression: calculs::progression(mise_initiale, issue.gain),
            roi: None,
            ecriture: None,
        },
    }
}

/// Arrêt manuel : la chaîne est close sur son gain courant sans avoir
/// atteint l'objectif. L'écriture est dimensionnée sur le net ; un arrêt
/// à l'équilibre ne journalise rien.
pub fn arreter(mise_initiale: Decimal, gain_courant: Decimal) -> TransitionMontante {
    let net = gain_courant - mise_initiale;
    let progression = calculs::progression(mise_initiale, gain_courant);
    let ecriture = if net > Decimal::ZERO {
        Some((TypeOperation::GainMontante, net))
    } else if net < Decimal::ZERO {
        Some((TypeOperation::PerteMontante, -net))
    } else {
        None
    };

    TransitionMontante {
        etat: EtatMontante::Arretee,
        mise_engagee: Decimal::ZERO,
        gain_final: Some(gain_courant),
        progression,
        roi: Some(progression),
        ecriture,
    }
}

/// Retour en arrière après suppression du dernier palier d'une montante
/// EN_COURS : (mise_engagee, progression) recalculées depuis le gain du
/// palier précédent, ou réinitialisées s'il n'en reste aucun.
pub fn apres_suppression(
    mise_initiale: Decimal,
    gain_precedent: Option<Decimal>,
) -> (Decimal, Decimal) {
    match gain_precedent {
        Some(gain) => (gain, calculs::progression(mise_initiale, gain)),
        None => (mise_initiale, Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn m(cote: Decimal, statut: StatutMatch) -> DetailMatch {
        DetailMatch {
            nom: "match".to_string(),
            cote,
            statut,
        }
    }

    #[test]
    fn test_simple_gagne() {
        let issue = resoudre_simple(dec!(10), dec!(2.5), StatutPalier::Gagne).unwrap();
        assert_eq!(issue.gain, dec!(25.0));
        assert_eq!(issue.cote_finale, dec!(2.5));
    }

    #[test]
    fn test_simple_annule_rembourse_la_mise() {
        let issue = resoudre_simple(dec!(10), dec!(2.5), StatutPalier::Annule).unwrap();
        assert_eq!(issue.gain, dec!(10));
        assert_eq!(issue.cote_finale, Decimal::ONE);
    }

    #[test]
    fn test_simple_perdu() {
        let issue = resoudre_simple(dec!(10), dec!(2.5), StatutPalier::Perdu).unwrap();
        assert_eq!(issue.gain, Decimal::ZERO);
        assert_eq!(issue.cote_finale, Decimal::ZERO);
    }

    #[test]
    fn test_simple_en_attente_refuse() {
        assert!(resoudre_simple(dec!(10), dec!(2.5), StatutPalier::EnAttente).is_err());
    }

    #[test]
    fn test_combine_tous_gagnes_produit_des_cotes() {
        let matchs = vec![
            m(dec!(2.0), StatutMatch::Gagne),
            m(dec!(1.5), StatutMatch::Gagne),
        ];
        match resoudre_combine(dec!(10), &matchs) {
            ResolutionCombine::Resolue(issue) => {
                assert_eq!(issue.statut, StatutPalier::Gagne);
                assert_eq!(issue.cote_finale, dec!(3.00));
                assert_eq!(issue.gain, dec!(30.000));
            }
            ResolutionCombine::Indeterminee => panic!("should resolve"),
        }
    }

    #[test]
    fn test_combine_un_perdu_court_circuite() {
        // Un PERDU fait tout perdre, même avec des matchs encore EN_ATTENTE
        let matchs = vec![
            m(dec!(2.0), StatutMatch::Gagne),
            m(dec!(4.0), StatutMatch::Perdu),
            m(dec!(1.8), StatutMatch::EnAttente),
        ];
        match resoudre_combine(dec!(10), &matchs) {
            ResolutionCombine::Resolue(issue) => {
                assert_eq!(issue.statut, StatutPalier::Perdu);
                assert_eq!(issue.gain, Decimal::ZERO);
                assert_eq!(issue.cote_finale, Decimal::ZERO);
            }
            ResolutionCombine::Indeterminee => panic!("should short-circuit"),
        }
    }

    #[test]
    fn test_combine_en_attente_bloque() {
        let matchs = vec![
            m(dec!(2.0), StatutMatch::Gagne),
            m(dec!(1.5), StatutMatch::EnAttente),
        ];
        assert_eq!(
            resoudre_combine(dec!(10), &matchs),
            ResolutionCombine::Indeterminee
        );
    }

    #[test]
    fn test_combine_tous_annules_rembourse() {
        let matchs = vec![
            m(dec!(2.0), StatutMatch::Annule),
            m(dec!(1.5), StatutMatch::Annule),
        ];
        match resoudre_combine(dec!(10), &matchs) {
            ResolutionCombine::Resolue(issue) => {
                assert_eq!(issue.statut, StatutPalier::Annule);
                assert_eq!(issue.gain, dec!(10));
            }
            ResolutionCombine::Indeterminee => panic!("should resolve"),
        }
    }

    #[test]
    fn test_combine_annule_sort_du_produit() {
        let matchs = vec![
            m(dec!(2.0), StatutMatch::Gagne),
            m(dec!(1.5), StatutMatch::Annule),
            m(dec!(3.0), StatutMatch::Gagne),
        ];
        match resoudre_combine(dec!(10), &matchs) {
            ResolutionCombine::Resolue(issue) => {
                assert_eq!(issue.statut, StatutPalier::Gagne);
                assert_eq!(issue.cote_finale, dec!(6.00));
            }
            ResolutionCombine::Indeterminee => panic!("should resolve"),
        }
    }

    #[test]
    fn test_transition_gagne_objectif_non_atteint() {
        let issue = resoudre_simple(dec!(10), dec!(2.0), StatutPalier::Gagne).unwrap();
        let transition = appliquer_issue(dec!(10), Objectif::X3, &issue);
        assert_eq!(transition.etat, EtatMontante::EnCours);
        assert_eq!(transition.mise_engagee, dec!(20.0));
        assert_eq!(transition.progression, dec!(100));
        assert_eq!(transition.gain_final, None);
        assert_eq!(transition.ecriture, None);
    }

    #[test]
    fn test_transition_objectif_atteint_journalise_le_net() {
        // Deuxième palier d'une chaîne x3 : 20 relancés à 2.0 => 40 >= 30
        let issue = resoudre_simple(dec!(20.0), dec!(2.0), StatutPalier::Gagne).unwrap();
        let transition = appliquer_issue(dec!(10), Objectif::X3, &issue);
        assert_eq!(transition.etat, EtatMontante::Reussi);
        assert_eq!(transition.gain_final, Some(dec!(40.00)));
        assert_eq!(transition.mise_engagee, Decimal::ZERO);
        assert_eq!(
            transition.ecriture,
            Some((TypeOperation::GainMontante, dec!(30.00)))
        );
    }

    #[test]
    fn test_transition_perdu() {
        let issue = resoudre_simple(dec!(20), dec!(2.0), StatutPalier::Perdu).unwrap();
        let transition = appliquer_issue(dec!(10), Objectif::X3, &issue);
        assert_eq!(transition.etat, EtatMontante::Perdu);
        assert_eq!(transition.gain_final, Some(Decimal::ZERO));
        assert_eq!(transition.progression, dec!(-100));
        assert_eq!(transition.roi, Some(dec!(-100)));
        assert_eq!(
            transition.ecriture,
            Some((TypeOperation::PerteMontante, dec!(10)))
        );
    }

    #[test]
    fn test_transition_annule_conserve_la_progression() {
        let issue = resoudre_simple(dec!(20), dec!(3.0), StatutPalier::Annule).unwrap();
        let transition = appliquer_issue(dec!(10), Objectif::X5, &issue);
        assert_eq!(transition.etat, EtatMontante::EnCours);
        assert_eq!(transition.mise_engagee, dec!(20));
        assert_eq!(transition.progression, dec!(100));
    }

    #[test]
    fn test_arret_en_gain() {
        let transition = arreter(dec!(10), dec!(25));
        assert_eq!(transition.etat, EtatMontante::Arretee);
        assert_eq!(transition.gain_final, Some(dec!(25)));
        assert_eq!(
            transition.ecriture,
            Some((TypeOperation::GainMontante, dec!(15)))
        );
    }

    #[test]
    fn test_arret_a_l_equilibre_sans_ecriture() {
        let transition = arreter(dec!(10), dec!(10));
        assert_eq!(transition.ecriture, None);
        assert_eq!(transition.progression, Decimal::ZERO);
    }

    #[test]
    fn test_arret_en_perte() {
        let transition = arreter(dec!(10), dec!(4));
        assert_eq!(
            transition.ecriture,
            Some((TypeOperation::PerteMontante, dec!(6)))
        );
    }

    #[test]
    fn test_chaine_complete_x3() {
        let mise_initiale = dec!(10);

        // palier 1 : 10 à 2.0, gagné => la montante relance 20
        let issue1 = resoudre_simple(mise_initiale, dec!(2.0), StatutPalier::Gagne).unwrap();
        let t1 = appliquer_issue(mise_initiale, Objectif::X3, &issue1);
        assert_eq!(t1.etat, EtatMontante::EnCours);
        assert_eq!(t1.mise_engagee, dec!(20.0));

        // palier 2 : 20 à 2.0, gagné => 40 >= 30, objectif atteint
        let issue2 = resoudre_simple(t1.mise_engagee, dec!(2.0), StatutPalier::Gagne).unwrap();
        let t2 = appliquer_issue(mise_initiale, Objectif::X3, &issue2);
        assert_eq!(t2.etat, EtatMontante::Reussi);
        assert_eq!(t2.gain_final, Some(dec!(40.00)));
        assert_eq!(
            t2.ecriture,
            Some((TypeOperation::GainMontante, dec!(30.00)))
        );
    }

    #[test]
    fn test_suppression_du_seul_palier_reinitialise() {
        let (mise_engagee, progression) = apres_suppression(dec!(10), None);
        assert_eq!(mise_engagee, dec!(10));
        assert_eq!(progression, Decimal::ZERO);
    }

    #[test]
    fn test_suppression_revient_au_palier_precedent() {
        let (mise_engagee, progression) = apres_suppression(dec!(10), Some(dec!(20)));
        assert_eq!(mise_engagee, dec!(20));
        assert_eq!(progression, dec!(100));
    }
}
