use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub montante_id: String,
    // 1-based, séquentiel, sans trou. Seul le dernier palier d'une montante
    // EN_COURS peut être modifié, résolu ou supprimé.
    pub numero_palier: i32,
    // Mise portée dans ce palier : gain du palier précédent, ou mise initiale
    pub mise: Decimal,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub type_pari: TypePari,
    // Cote annoncée à la création. Pour un combiné : produit des cotes annoncées.
    pub cote: Decimal,
    // Cote réalisée, fixée à la résolution (les matchs ANNULE d'un combiné
    // sortent du produit). Deux champs distincts : la cote annoncée n'est
    // jamais écrasée.
    pub cote_finale: Option<Decimal>,
    // COMBINE uniquement : liste ordonnée de sous-matchs {nom, cote, statut}
    pub details_matchs: Option<Json>,
    pub statut: StatutPalier,
    pub gain: Option<Decimal>,
    pub date_creation: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypePari {
    #[sea_orm(string_value = "SIMPLE")]
    Simple,
    #[sea_orm(string_value = "COMBINE")]
    Combine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutPalier {
    #[sea_orm(string_value = "EN_ATTENTE")]
    EnAttente,
    #[sea_orm(string_value = "GAGNE")]
    Gagne,
    #[sea_orm(string_value = "PERDU")]
    Perdu,
    #[sea_orm(string_value = "ANNULE")]
    Annule,
}

impl StatutPalier {
    pub fn est_resolu(&self) -> bool {
        !matches!(self, StatutPalier::EnAttente)
    }
}

/// Statut individuel d'un sous-match de combiné (stocké dans details_matchs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatutMatch {
    EnAttente,
    Gagne,
    Perdu,
    Annule,
}

/// Un sous-match d'un pari combiné, sérialisé dans la colonne JSON details_matchs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailMatch {
    pub nom: String,
    pub cote: Decimal,
    pub statut: StatutMatch,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::montante::Entity",
        from = "Column::MontanteId",
        to = "super::montante::Column::Id"
    )]
    Montante,
}

impl Related<super::montante::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Montante.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
