// DTO partagés entre les routes (requêtes validées et réponses structurées)
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use super::historique_bankroll::TypeOperation;
use super::montante::{EtatMontante, Objectif};
use super::palier::{DetailMatch, StatutMatch, StatutPalier, TypePari};

// ---------------------------------------------------------------------------
// Montantes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMontanteRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: String,
    pub mise_initiale: Decimal,
    pub objectif: Objectif,
}

/// Modifications autorisées tant que la montante est EN_COURS.
/// etat n'accepte que ARRETEE (arrêt manuel).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMontanteRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: Option<String>,
    pub objectif: Option<Objectif>,
    pub etat: Option<EtatMontante>,
}

#[derive(Debug, Serialize)]
pub struct MontanteResponse {
    pub id: String,
    pub nom: String,
    pub numero_affichage: i64,
    pub mise_initiale: Decimal,
    pub objectif: Objectif,
    pub etat: EtatMontante,
    pub mise_engagee: Decimal,
    pub gain_actuel: Decimal,
    pub gain_final: Option<Decimal>,
    pub progression: Decimal,
    pub roi: Option<Decimal>,
    pub nb_paliers: usize,
    pub date_creation: DateTime<Utc>,
    pub date_fin: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MontanteDetailResponse {
    #[serde(flatten)]
    pub montante: MontanteResponse,
    pub paliers: Vec<PalierResponse>,
}

// ---------------------------------------------------------------------------
// Paliers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePalierRequest {
    #[serde(rename = "type")]
    pub type_pari: TypePari,
    /// SIMPLE : cote obligatoire. COMBINE : ignorée, produit des sous-matchs.
    pub cote: Option<Decimal>,
    /// COMBINE : au moins deux sous-matchs
    #[validate(nested)]
    pub details_matchs: Option<Vec<CreateMatchRequest>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchRequest {
    #[validate(length(min = 1, max = 200))]
    pub nom: String,
    pub cote: Decimal,
}

/// Édition du dernier palier : cote annoncée tant qu'il est EN_ATTENTE,
/// statut pour résoudre un pari SIMPLE.
#[derive(Debug, Deserialize)]
pub struct UpdatePalierRequest {
    pub cote: Option<Decimal>,
    pub statut: Option<StatutPalier>,
}

/// Mise à jour groupée des sous-matchs d'un combiné (PATCH /paliers/combine).
#[derive(Debug, Deserialize)]
pub struct CombineUpdateRequest {
    pub palier_id: String,
    pub matchs: Vec<MatchStatutUpdate>,
    /// true = exiger la résolution ; erreur si des sous-matchs restent EN_ATTENTE
    #[serde(default)]
    pub finaliser: bool,
}

#[derive(Debug, Deserialize)]
pub struct MatchStatutUpdate {
    pub index: usize,
    pub statut: StatutMatch,
}

#[derive(Debug, Serialize)]
pub struct PalierResponse {
    pub id: String,
    pub montante_id: String,
    pub numero_palier: i32,
    #[serde(rename = "type")]
    pub type_pari: TypePari,
    pub mise: Decimal,
    pub cote: Decimal,
    pub cote_finale: Option<Decimal>,
    pub statut: StatutPalier,
    pub gain: Option<Decimal>,
    pub details_matchs: Option<Vec<DetailMatch>>,
    pub date_creation: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Bankroll / historique
// ---------------------------------------------------------------------------

/// Dépôt ou retrait manuel (POST /bankroll). Les types GAIN_MONTANTE et
/// PERTE_MONTANTE sont réservés aux résolutions de montantes.
#[derive(Debug, Deserialize)]
pub struct BankrollOperationRequest {
    pub type_operation: TypeOperation,
    pub montant: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BankrollInitialeRequest {
    pub montant: Decimal,
}

/// Filtre commun à GET (query) et POST (body) /historique.
#[derive(Debug, Default, Deserialize)]
pub struct HistoriqueFilter {
    /// "7j" | "30j" | "90j" | "tout" (défaut)
    pub periode: Option<String>,
    pub type_operation: Option<TypeOperation>,
}

#[derive(Debug, Serialize)]
pub struct HistoriqueStats {
    pub total_depots: Decimal,
    pub total_retraits: Decimal,
    pub total_gains: Decimal,
    pub total_pertes: Decimal,
    pub solde_net: Decimal,
    pub nb_operations: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoriqueResponse {
    pub operations: Vec<super::historique_bankroll::Model>,
    pub stats: HistoriqueStats,
}

// ---------------------------------------------------------------------------
// Stats globales
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub nb_montantes: usize,
    pub nb_en_cours: usize,
    pub nb_reussies: usize,
    pub nb_perdues: usize,
    pub nb_arretees: usize,
    /// Pourcentage de REUSSI parmi les montantes terminées
    pub taux_reussite: Decimal,
    pub gains_totaux: Decimal,
    pub pertes_totales: Decimal,
    pub bilan_net: Decimal,
    /// (gains - pertes) / Σ mises initiales des montantes terminées, en %
    pub roi_global: Decimal,
    pub meilleure_serie: usize,
}
