use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "montantes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nom: String,
    // Immuable après création : toute la chaîne se calcule à partir d'elle
    pub mise_initiale: Decimal,
    pub objectif: Objectif,
    pub etat: EtatMontante,
    // Mise actuellement réservée contre la bankroll.
    // Après chaque palier GAGNE non final, elle porte le gain courant
    // (la mise relancée au palier suivant). 0 dès qu'un état terminal est atteint.
    pub mise_engagee: Decimal,
    pub gain_final: Option<Decimal>,
    // Pourcentage par rapport à la mise initiale
    pub progression: Decimal,
    pub roi: Option<Decimal>,
    pub date_creation: DateTimeUtc,
    pub date_fin: Option<DateTimeUtc>,
}

/// Multiplicateur visé qui clôt la montante en REUSSI une fois atteint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objectif {
    #[sea_orm(string_value = "X2")]
    X2,
    #[sea_orm(string_value = "X3")]
    X3,
    #[sea_orm(string_value = "X5")]
    X5,
    #[sea_orm(string_value = "X10")]
    X10,
}

impl Objectif {
    pub fn multiplicateur(&self) -> Decimal {
        match self {
            Objectif::X2 => Decimal::TWO,
            Objectif::X3 => Decimal::from(3),
            Objectif::X5 => Decimal::from(5),
            Objectif::X10 => Decimal::TEN,
        }
    }
}

/// Cycle de vie : EN_COURS -> {REUSSI, PERDU, ARRETEE}, sans retour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EtatMontante {
    #[sea_orm(string_value = "EN_COURS")]
    EnCours,
    #[sea_orm(string_value = "REUSSI")]
    Reussi,
    #[sea_orm(string_value = "PERDU")]
    Perdu,
    #[sea_orm(string_value = "ARRETEE")]
    Arretee,
}

impl EtatMontante {
    pub fn est_terminal(&self) -> bool {
        !matches!(self, EtatMontante::EnCours)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::palier::Entity")]
    Palier,
}

impl Related<super::palier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Palier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
