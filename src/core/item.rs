use std::{fmt, str::FromStr};

use async_trait::async_trait;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use uuid::Uuid;

use crate::{
    entity::{
        book_item, chemical_item, clothing_item, drink_item, electronic_item, film_item,
        fitness_item, food_item, game_item, hardware_item, hygiene_item, line_item, music_item,
        receipt, software_item, tool_item, toy_item, vehicle_item,
    },
    error::BatchError,
};

/// Represents the result of writing or migrating records.
pub type ItemWriterResult<T = ()> = Result<T, BatchError>;

/// The sixteen item categories a line item can point to.
///
/// Tags are the historical type names (`BookItem`, `DrinkItem`, ...), which is
/// also what `--mix` accepts on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
pub enum Category {
    #[strum(serialize = "BookItem")]
    Book,
    #[strum(serialize = "ChemicalItem")]
    Chemical,
    #[strum(serialize = "ClothingItem")]
    Clothing,
    #[strum(serialize = "DrinkItem")]
    Drink,
    #[strum(serialize = "ElectronicItem")]
    Electronic,
    #[strum(serialize = "FilmItem")]
    Film,
    #[strum(serialize = "FitnessItem")]
    Fitness,
    #[strum(serialize = "FoodItem")]
    Food,
    #[strum(serialize = "GameItem")]
    Game,
    #[strum(serialize = "HardwareItem")]
    Hardware,
    #[strum(serialize = "HygieneItem")]
    Hygiene,
    #[strum(serialize = "MusicItem")]
    Music,
    #[strum(serialize = "SoftwareItem")]
    Software,
    #[strum(serialize = "ToolItem")]
    Tool,
    #[strum(serialize = "ToyItem")]
    Toy,
    #[strum(serialize = "VehicleItem")]
    Vehicle,
}

impl Category {
    /// Parses a category tag, rejecting anything outside the sixteen known ones.
    pub fn parse(tag: &str) -> Result<Self, BatchError> {
        Category::from_str(tag.trim()).map_err(|_| BatchError::UnknownCategory(tag.to_owned()))
    }

    pub fn table_name(self) -> &'static str {
        match self {
            Category::Book => "book_items",
            Category::Chemical => "chemical_items",
            Category::Clothing => "clothing_items",
            Category::Drink => "drink_items",
            Category::Electronic => "electronic_items",
            Category::Film => "film_items",
            Category::Fitness => "fitness_items",
            Category::Food => "food_items",
            Category::Game => "game_items",
            Category::Hardware => "hardware_items",
            Category::Hygiene => "hygiene_items",
            Category::Music => "music_items",
            Category::Software => "software_items",
            Category::Tool => "tool_items",
            Category::Toy => "toy_items",
            Category::Vehicle => "vehicle_items",
        }
    }
}

/// A persisted item of one of the sixteen categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtypeRecord {
    Book(book_item::Model),
    Chemical(chemical_item::Model),
    Clothing(clothing_item::Model),
    Drink(drink_item::Model),
    Electronic(electronic_item::Model),
    Film(film_item::Model),
    Fitness(fitness_item::Model),
    Food(food_item::Model),
    Game(game_item::Model),
    Hardware(hardware_item::Model),
    Hygiene(hygiene_item::Model),
    Music(music_item::Model),
    Software(software_item::Model),
    Tool(tool_item::Model),
    Toy(toy_item::Model),
    Vehicle(vehicle_item::Model),
}

impl SubtypeRecord {
    pub fn id(&self) -> Uuid {
        match self {
            SubtypeRecord::Book(item) => item.id,
            SubtypeRecord::Chemical(item) => item.id,
            SubtypeRecord::Clothing(item) => item.id,
            SubtypeRecord::Drink(item) => item.id,
            SubtypeRecord::Electronic(item) => item.id,
            SubtypeRecord::Film(item) => item.id,
            SubtypeRecord::Fitness(item) => item.id,
            SubtypeRecord::Food(item) => item.id,
            SubtypeRecord::Game(item) => item.id,
            SubtypeRecord::Hardware(item) => item.id,
            SubtypeRecord::Hygiene(item) => item.id,
            SubtypeRecord::Music(item) => item.id,
            SubtypeRecord::Software(item) => item.id,
            SubtypeRecord::Tool(item) => item.id,
            SubtypeRecord::Toy(item) => item.id,
            SubtypeRecord::Vehicle(item) => item.id,
        }
    }

    pub fn price(&self) -> i64 {
        match self {
            SubtypeRecord::Book(item) => item.price,
            SubtypeRecord::Chemical(item) => item.price,
            SubtypeRecord::Clothing(item) => item.price,
            SubtypeRecord::Drink(item) => item.price,
            SubtypeRecord::Electronic(item) => item.price,
            SubtypeRecord::Film(item) => item.price,
            SubtypeRecord::Fitness(item) => item.price,
            SubtypeRecord::Food(item) => item.price,
            SubtypeRecord::Game(item) => item.price,
            SubtypeRecord::Hardware(item) => item.price,
            SubtypeRecord::Hygiene(item) => item.price,
            SubtypeRecord::Music(item) => item.price,
            SubtypeRecord::Software(item) => item.price,
            SubtypeRecord::Tool(item) => item.price,
            SubtypeRecord::Toy(item) => item.price,
            SubtypeRecord::Vehicle(item) => item.price,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            SubtypeRecord::Book(_) => Category::Book,
            SubtypeRecord::Chemical(_) => Category::Chemical,
            SubtypeRecord::Clothing(_) => Category::Clothing,
            SubtypeRecord::Drink(_) => Category::Drink,
            SubtypeRecord::Electronic(_) => Category::Electronic,
            SubtypeRecord::Film(_) => Category::Film,
            SubtypeRecord::Fitness(_) => Category::Fitness,
            SubtypeRecord::Food(_) => Category::Food,
            SubtypeRecord::Game(_) => Category::Game,
            SubtypeRecord::Hardware(_) => Category::Hardware,
            SubtypeRecord::Hygiene(_) => Category::Hygiene,
            SubtypeRecord::Music(_) => Category::Music,
            SubtypeRecord::Software(_) => Category::Software,
            SubtypeRecord::Tool(_) => Category::Tool,
            SubtypeRecord::Toy(_) => Category::Toy,
            SubtypeRecord::Vehicle(_) => Category::Vehicle,
        }
    }
}

/// The shape of a table, used to migrate the schema and to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Receipt,
    LineItem,
    Subtype(Category),
}

impl RecordKind {
    /// Every table, parents before the `items` table that references them.
    pub fn all() -> Vec<RecordKind> {
        let mut kinds = Vec::with_capacity(Category::COUNT + 2);
        kinds.push(RecordKind::Receipt);
        kinds.extend(Category::iter().map(RecordKind::Subtype));
        kinds.push(RecordKind::LineItem);
        kinds
    }

    pub fn table_name(self) -> &'static str {
        match self {
            RecordKind::Receipt => "fiscal_receipts",
            RecordKind::LineItem => "items",
            RecordKind::Subtype(category) => category.table_name(),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Receipt => write!(f, "FiscalReceipt"),
            RecordKind::LineItem => write!(f, "Item"),
            RecordKind::Subtype(category) => write!(f, "{}", category),
        }
    }
}

/// A record handed to a [`RecordWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Receipt(receipt::Model),
    Subtype(SubtypeRecord),
    LineItem(line_item::Model),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Receipt(_) => RecordKind::Receipt,
            Record::Subtype(subtype) => RecordKind::Subtype(subtype.category()),
            Record::LineItem(_) => RecordKind::LineItem,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Record::Receipt(receipt) => receipt.id,
            Record::Subtype(subtype) => subtype.id(),
            Record::LineItem(line_item) => line_item.id,
        }
    }
}

/// The store every generated record goes to.
///
/// A writer is shared by all workers of a batch, so implementations must be
/// safe to call concurrently. Connection pooling is the writer's own concern.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Creates the tables for `kinds` when they do not exist yet.
    async fn migrate(&self, kinds: &[RecordKind]) -> ItemWriterResult;

    /// Persists one record and returns the identifier the store assigned to it.
    async fn create(&self, record: Record) -> ItemWriterResult<Uuid>;
}
