//! Player entity (agency clients)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    pub position: String,

    /// Current team
    pub team: String,

    pub date_of_birth: Date,

    /// Height in centimetres
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    pub nationality: String,

    /// Free-form season statistics
    pub stats: Option<Json>,

    pub contract_start: Option<Date>,

    pub contract_end: Option<Date>,

    pub contract_value: Option<f64>,

    pub created_at: ChronoDateTimeUtc,

    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Player is billed through invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
