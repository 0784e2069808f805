use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Journal append-only des opérations bankroll. Jamais modifié ni supprimé,
/// sauf par le reset administrateur complet.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "historique_bankroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub type_operation: TypeOperation,
    // Stocké positif, le signe est porté par type_operation
    // (DEPOT/GAIN_MONTANTE créditent, RETRAIT/PERTE_MONTANTE débitent)
    pub montant: Decimal,
    pub montant_avant: Decimal,
    pub montant_apres: Decimal,
    // Référence faible : survit à la suppression de la montante
    pub montante_id: Option<String>,
    pub description: Option<String>,
    pub date_operation: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeOperation {
    #[sea_orm(string_value = "DEPOT")]
    Depot,
    #[sea_orm(string_value = "RETRAIT")]
    Retrait,
    #[sea_orm(string_value = "GAIN_MONTANTE")]
    GainMontante,
    #[sea_orm(string_value = "PERTE_MONTANTE")]
    PerteMontante,
}

impl TypeOperation {
    /// true si l'opération crédite la bankroll, false si elle la débite.
    pub fn credite(&self) -> bool {
        matches!(self, TypeOperation::Depot | TypeOperation::GainMontante)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
