use sea_orm::*;
use rust_decimal::Decimal;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{montante, palier};
use crate::models::dto::{CombineUpdateRequest, CreatePalierRequest, PalierResponse, UpdatePalierRequest};
use crate::models::palier::{DetailMatch, StatutMatch, StatutPalier, TypePari};
use crate::services::bankroll_service::BankrollService;
use crate::services::montante_service::MontanteService;
use crate::services::resolution::{self, ResolutionCombine};
use crate::utils::errors::ServiceError;

pub struct PalierService;

impl PalierService {
    /// Ajoute un palier à une montante EN_COURS. La mise portée est la mise
    /// engagée courante (gain du palier précédent, ou mise initiale).
    pub async fn ajouter(
        db: &DatabaseConnection,
        montante_id: &str,
        requete: CreatePalierRequest,
    ) -> Result<palier::Model, ServiceError> {
        let txn = db.begin().await?;

        let m = MontanteService::chercher(&txn, montante_id).await?;
        if m.etat.est_terminal() {
            return Err(ServiceError::Conflit(
                "Cannot add a palier to a resolved montante".to_string(),
            ));
        }

        let dernier = Self::dernier_palier(&txn, &m.id).await?;
        if let Some(ref d) = dernier {
            if !d.statut.est_resolu() {
                return Err(ServiceError::Conflit(
                    "Previous palier is not resolved yet".to_string(),
                ));
            }
        }
        let numero = dernier.as_ref().map(|d| d.numero_palier + 1).unwrap_or(1);

        let (cote, details) = match requete.type_pari {
            TypePari::Simple => {
                let cote = requete.cote.ok_or_else(|| {
                    ServiceError::Validation("cote is required for a SIMPLE palier".to_string())
                })?;
                Self::valider_cote(cote)?;
                (cote, None)
            }
            TypePari::Combine => {
                let matchs = requete.details_matchs.unwrap_or_default();
                if matchs.len() < 2 {
                    return Err(ServiceError::Validation(
                        "A COMBINE palier requires at least 2 matches".to_string(),
                    ));
                }
                let mut details = Vec::with_capacity(matchs.len());
                let mut produit = Decimal::ONE;
                for sous_match in matchs {
                    Self::valider_cote(sous_match.cote)?;
                    produit *= sous_match.cote;
                    details.push(DetailMatch {
                        nom: sous_match.nom,
                        cote: sous_match.cote,
                        statut: StatutMatch::EnAttente,
                    });
                }
                (produit, Some(Self::serialiser_matchs(&details)?))
            }
        };

        let nouveau = palier::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            montante_id: Set(m.id.clone()),
            numero_palier: Set(numero),
            mise: Set(m.mise_engagee),
            type_pari: Set(requete.type_pari),
            cote: Set(cote),
            cote_finale: Set(None),
            details_matchs: Set(details),
            statut: Set(StatutPalier::EnAttente),
            gain: Set(None),
            date_creation: Set(Utc::now()),
        };
        let cree = nouveau.insert(&txn).await?;

        txn.commit().await?;
        Ok(cree)
    }

    /// Édite la cote annoncée (palier EN_ATTENTE) ou résout un pari SIMPLE.
    /// La résolution déclenche la transition de la montante, l'écriture
    /// bankroll et la réconciliation dans la même transaction.
    pub async fn mettre_a_jour(
        db: &DatabaseConnection,
        palier_id: &str,
        requete: UpdatePalierRequest,
    ) -> Result<(PalierResponse, montante::Model), ServiceError> {
        let txn = db.begin().await?;
        let (p, m) = Self::charger_dernier(&txn, palier_id).await?;

        if let Some(statut) = requete.statut {
            if p.statut.est_resolu() {
                return Err(ServiceError::Conflit(
                    "Palier is already resolved".to_string(),
                ));
            }
            if p.type_pari == TypePari::Combine {
                return Err(ServiceError::Conflit(
                    "Use PATCH /paliers/combine to resolve a combined palier".to_string(),
                ));
            }

            let cote = match requete.cote {
                Some(c) => {
                    Self::valider_cote(c)?;
                    c
                }
                None => p.cote,
            };
            let issue = resolution::resoudre_simple(p.mise, cote, statut)?;

            let mise_initiale = m.mise_initiale;
            let objectif = m.objectif;
            let mut actif: palier::ActiveModel = p.into();
            actif.cote = Set(cote);
            actif.statut = Set(issue.statut);
            actif.cote_finale = Set(Some(issue.cote_finale));
            actif.gain = Set(Some(issue.gain));
            let p = actif.update(&txn).await?;

            let transition = resolution::appliquer_issue(mise_initiale, objectif, &issue);
            let m = MontanteService::appliquer_transition(&txn, m, &transition).await?;

            txn.commit().await?;
            return Ok((Self::vers_reponse(p), m));
        }

        if let Some(cote) = requete.cote {
            if p.statut.est_resolu() {
                return Err(ServiceError::Conflit(
                    "Cannot edit a resolved palier".to_string(),
                ));
            }
            if p.type_pari == TypePari::Combine {
                return Err(ServiceError::Conflit(
                    "Edit the sub-matches of a combined palier instead".to_string(),
                ));
            }
            Self::valider_cote(cote)?;

            let mut actif: palier::ActiveModel = p.into();
            actif.cote = Set(cote);
            let p = actif.update(&txn).await?;

            txn.commit().await?;
            return Ok((Self::vers_reponse(p), m));
        }

        Err(ServiceError::Validation(
            "Nothing to update: provide cote or statut".to_string(),
        ))
    }

    /// Mise à jour groupée des sous-matchs d'un combiné, puis tentative de
    /// résolution :
    /// - un sous-match PERDU fait perdre le palier immédiatement ;
    /// - tous terminaux => GAGNE (produit des cotes) ou ANNULE (remboursé) ;
    /// - sinon le palier reste EN_ATTENTE ; `finaliser` devient une erreur.
    /// Retourne (palier, montante, finalisé).
    pub async fn resoudre_combine(
        db: &DatabaseConnection,
        requete: CombineUpdateRequest,
    ) -> Result<(PalierResponse, montante::Model, bool), ServiceError> {
        let txn = db.begin().await?;
        let (p, m) = Self::charger_dernier(&txn, &requete.palier_id).await?;

        if p.type_pari != TypePari::Combine {
            return Err(ServiceError::Conflit(
                "Palier is not a combined bet".to_string(),
            ));
        }
        if p.statut.est_resolu() {
            return Err(ServiceError::Conflit(
                "Palier is already resolved".to_string(),
            ));
        }

        let valeur = p.details_matchs.clone().ok_or_else(|| {
            ServiceError::Interne("Combined palier without details_matchs".to_string())
        })?;
        let mut matchs: Vec<DetailMatch> = serde_json::from_value(valeur)
            .map_err(|e| ServiceError::Interne(format!("Corrupted details_matchs: {e}")))?;

        for maj in &requete.matchs {
            let detail = matchs.get_mut(maj.index).ok_or_else(|| {
                ServiceError::Validation(format!("Unknown match index: {}", maj.index))
            })?;
            detail.statut = maj.statut;
        }

        match resolution::resoudre_combine(p.mise, &matchs) {
            ResolutionCombine::Indeterminee => {
                if requete.finaliser {
                    return Err(ServiceError::Conflit(
                        "Cannot finalize: some matches are still EN_ATTENTE".to_string(),
                    ));
                }
                let mut actif: palier::ActiveModel = p.into();
                actif.details_matchs = Set(Some(Self::serialiser_matchs(&matchs)?));
                let p = actif.update(&txn).await?;

                txn.commit().await?;
                Ok((Self::vers_reponse(p), m, false))
            }
            ResolutionCombine::Resolue(issue) => {
                let mise_initiale = m.mise_initiale;
                let objectif = m.objectif;
                let mut actif: palier::ActiveModel = p.into();
                actif.details_matchs = Set(Some(Self::serialiser_matchs(&matchs)?));
                actif.statut = Set(issue.statut);
                actif.cote_finale = Set(Some(issue.cote_finale));
                actif.gain = Set(Some(issue.gain));
                let p = actif.update(&txn).await?;

                let transition = resolution::appliquer_issue(mise_initiale, objectif, &issue);
                let m = MontanteService::appliquer_transition(&txn, m, &transition).await?;

                txn.commit().await?;
                Ok((Self::vers_reponse(p), m, true))
            }
        }
    }

    /// Supprime le dernier palier d'une montante EN_COURS et la fait
    /// revenir un cran en arrière. Seul retour arrière autorisé.
    pub async fn supprimer(
        db: &DatabaseConnection,
        palier_id: &str,
    ) -> Result<montante::Model, ServiceError> {
        let txn = db.begin().await?;
        let (p, m) = Self::charger_dernier(&txn, palier_id).await?;

        let precedent = palier::Entity::find()
            .filter(palier::Column::MontanteId.eq(&m.id))
            .filter(palier::Column::NumeroPalier.eq(p.numero_palier - 1))
            .one(&txn)
            .await?;
        let gain_precedent = precedent.and_then(|prev| prev.gain);

        palier::Entity::delete_by_id(p.id.clone()).exec(&txn).await?;

        let (mise_engagee, progression) =
            resolution::apres_suppression(m.mise_initiale, gain_precedent);
        let mut actif: montante::ActiveModel = m.into();
        actif.mise_engagee = Set(mise_engagee);
        actif.progression = Set(progression);
        actif.gain_final = Set(None);
        actif.roi = Set(None);
        let m = actif.update(&txn).await?;

        BankrollService::reconcilier_disponible(&txn).await?;
        txn.commit().await?;
        Ok(m)
    }

    pub(crate) fn vers_reponse(p: palier::Model) -> PalierResponse {
        let details_matchs = p
            .details_matchs
            .and_then(|v| serde_json::from_value::<Vec<DetailMatch>>(v).ok());

        PalierResponse {
            id: p.id,
            montante_id: p.montante_id,
            numero_palier: p.numero_palier,
            type_pari: p.type_pari,
            mise: p.mise,
            cote: p.cote,
            cote_finale: p.cote_finale,
            statut: p.statut,
            gain: p.gain,
            details_matchs,
            date_creation: p.date_creation,
        }
    }

    async fn dernier_palier<C: ConnectionTrait>(
        db: &C,
        montante_id: &str,
    ) -> Result<Option<palier::Model>, ServiceError> {
        Ok(palier::Entity::find()
            .filter(palier::Column::MontanteId.eq(montante_id))
            .order_by_desc(palier::Column::NumeroPalier)
            .one(db)
            .await?)
    }

    /// Charge un palier et sa montante, en exigeant qu'il soit le dernier
    /// d'une montante EN_COURS. Les paliers antérieurs sont immuables.
    async fn charger_dernier<C: ConnectionTrait>(
        db: &C,
        palier_id: &str,
    ) -> Result<(palier::Model, montante::Model), ServiceError> {
        let p = palier::Entity::find_by_id(palier_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Palier not found: {palier_id}")))?;

        let m = MontanteService::chercher(db, &p.montante_id).await?;
        if m.etat.est_terminal() {
            return Err(ServiceError::Conflit(
                "Montante is already resolved".to_string(),
            ));
        }

        let dernier = Self::dernier_palier(db, &m.id).await?;
        if dernier.map(|d| d.id) != Some(p.id.clone()) {
            return Err(ServiceError::Conflit(
                "Only the last palier can be modified".to_string(),
            ));
        }

        Ok((p, m))
    }

    fn valider_cote(cote: Decimal) -> Result<(), ServiceError> {
        if cote < Decimal::new(101, 2) {
            return Err(ServiceError::Validation(
                "cote must be at least 1.01".to_string(),
            ));
        }
        Ok(())
    }

    fn serialiser_matchs(matchs: &[DetailMatch]) -> Result<serde_json::Value, ServiceError> {
        serde_json::to_value(matchs)
            .map_err(|e| ServiceError::Interne(format!("Failed to serialize matches: {e}")))
    }
}
