use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Singleton (id = 1) : état courant de la bankroll.
/// Invariant : bankroll_disponible = max(0, bankroll_actuelle - Σ mise_engagee des montantes EN_COURS)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub bankroll_initiale: Decimal,
    pub bankroll_actuelle: Decimal,
    pub bankroll_disponible: Decimal,
    pub updated_at: DateTimeUtc,
}

/// Identifiant de la ligne unique.
pub const SETTINGS_ID: i32 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
