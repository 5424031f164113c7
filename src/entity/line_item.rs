use sea_orm::entity::prelude::*;

/// A line of a fiscal receipt. Exactly one of the `*_item_id` columns is set
/// for a well-formed row; the database does not enforce it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub price: i64,
    pub amount: i32,
    pub fiscal_receipt_id: Uuid,
    pub book_item_id: Option<Uuid>,
    pub chemical_item_id: Option<Uuid>,
    pub clothing_item_id: Option<Uuid>,
    pub drink_item_id: Option<Uuid>,
    pub electronic_item_id: Option<Uuid>,
    pub film_item_id: Option<Uuid>,
    pub fitness_item_id: Option<Uuid>,
    pub food_item_id: Option<Uuid>,
    pub game_item_id: Option<Uuid>,
    pub hardware_item_id: Option<Uuid>,
    pub hygiene_item_id: Option<Uuid>,
    pub music_item_id: Option<Uuid>,
    pub software_item_id: Option<Uuid>,
    pub tool_item_id: Option<Uuid>,
    pub toy_item_id: Option<Uuid>,
    pub vehicle_item_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receipt::Entity",
        from = "Column::FiscalReceiptId",
        to = "super::receipt::Column::Id"
    )]
    FiscalReceipt,
    #[sea_orm(
        belongs_to = "super::book_item::Entity",
        from = "Column::BookItemId",
        to = "super::book_item::Column::Id"
    )]
    BookItem,
    #[sea_orm(
        belongs_to = "super::chemical_item::Entity",
        from = "Column::ChemicalItemId",
        to = "super::chemical_item::Column::Id"
    )]
    ChemicalItem,
    #[sea_orm(
        belongs_to = "super::clothing_item::Entity",
        from = "Column::ClothingItemId",
        to = "super::clothing_item::Column::Id"
    )]
    ClothingItem,
    #[sea_orm(
        belongs_to = "super::drink_item::Entity",
        from = "Column::DrinkItemId",
        to = "super::drink_item::Column::Id"
    )]
    DrinkItem,
    #[sea_orm(
        belongs_to = "super::electronic_item::Entity",
        from = "Column::ElectronicItemId",
        to = "super::electronic_item::Column::Id"
    )]
    ElectronicItem,
    #[sea_orm(
        belongs_to = "super::film_item::Entity",
        from = "Column::FilmItemId",
        to = "super::film_item::Column::Id"
    )]
    FilmItem,
    #[sea_orm(
        belongs_to = "super::fitness_item::Entity",
        from = "Column::FitnessItemId",
        to = "super::fitness_item::Column::Id"
    )]
    FitnessItem,
    #[sea_orm(
        belongs_to = "super::food_item::Entity",
        from = "Column::FoodItemId",
        to = "super::food_item::Column::Id"
    )]
    FoodItem,
    #[sea_orm(
        belongs_to = "super::game_item::Entity",
        from = "Column::GameItemId",
        to = "super::game_item::Column::Id"
    )]
    GameItem,
    #[sea_orm(
        belongs_to = "super::hardware_item::Entity",
        from = "Column::HardwareItemId",
        to = "super::hardware_item::Column::Id"
    )]
    HardwareItem,
    #[sea_orm(
        belongs_to = "super::hygiene_item::Entity",
        from = "Column::HygieneItemId",
        to = "super::hygiene_item::Column::Id"
    )]
    HygieneItem,
    #[sea_orm(
        belongs_to = "super::music_item::Entity",
        from = "Column::MusicItemId",
        to = "super::music_item::Column::Id"
    )]
    MusicItem,
    #[sea_orm(
        belongs_to = "super::software_item::Entity",
        from = "Column::SoftwareItemId",
        to = "super::software_item::Column::Id"
    )]
    SoftwareItem,
    #[sea_orm(
        belongs_to = "super::tool_item::Entity",
        from = "Column::ToolItemId",
        to = "super::tool_item::Column::Id"
    )]
    ToolItem,
    #[sea_orm(
        belongs_to = "super::toy_item::Entity",
        from = "Column::ToyItemId",
        to = "super::toy_item::Column::Id"
    )]
    ToyItem,
    #[sea_orm(
        belongs_to = "super::vehicle_item::Entity",
        from = "Column::VehicleItemId",
        to = "super::vehicle_item::Column::Id"
    )]
    VehicleItem,
}

impl Related<super::receipt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FiscalReceipt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Every subtype reference column, in category order.
    pub fn subtype_references(&self) -> [Option<Uuid>; 16] {
        [
            self.book_item_id,
            self.chemical_item_id,
            self.clothing_item_id,
            self.drink_item_id,
            self.electronic_item_id,
            self.film_item_id,
            self.fitness_item_id,
            self.food_item_id,
            self.game_item_id,
            self.hardware_item_id,
            self.hygiene_item_id,
            self.music_item_id,
            self.software_item_id,
            self.tool_item_id,
            self.toy_item_id,
            self.vehicle_item_id,
        ]
    }

    /// Number of subtype reference columns that are set.
    pub fn subtype_reference_count(&self) -> usize {
        self.subtype_references()
            .iter()
            .filter(|reference| reference.is_some())
            .count()
    }
}
