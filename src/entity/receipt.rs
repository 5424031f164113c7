use sea_orm::entity::prelude::*;

/// State every generated receipt starts in.
pub const DEFAULT_STATE: &str = "OPEN";
pub const DEFAULT_SOURCE: &str = "ANYWHERE";
pub const DEFAULT_TARGET: &str = "SOMETHING";

/// A fiscal receipt, parent of the `items` rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fiscal_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub state: String,
    pub source: String,
    pub target: String,
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItem,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
