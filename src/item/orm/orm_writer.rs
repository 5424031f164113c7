use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PrimaryKeyTrait, Schema, sea_query::TableCreateStatement,
};
use uuid::Uuid;

use crate::{
    BatchError,
    core::item::{Category, ItemWriterResult, Record, RecordKind, RecordWriter, SubtypeRecord},
    entity::{
        book_item, chemical_item, clothing_item, drink_item, electronic_item, film_item,
        fitness_item, food_item, game_item, hardware_item, hygiene_item, line_item, music_item,
        receipt, software_item, tool_item, toy_item, vehicle_item,
    },
};

/// A writer persisting generated records through a SeaORM connection.
///
/// This writer implements [`RecordWriter`] on top of any database SeaORM
/// supports. Every call to `create` inserts exactly one row and echoes the
/// primary key back, so a failure is always attributable to one record.
///
/// # Concurrency
///
/// The writer is shared by every fan-out worker of a batch. A
/// [`DatabaseConnection`] is a handle on a connection pool, so concurrent
/// inserts are spread over the pool and wait for a free connection when all
/// are busy. The writer itself holds no mutable state.
///
/// # Schema
///
/// `migrate` issues `CREATE TABLE IF NOT EXISTS` statements derived from the
/// entities, in the order of the given kinds. Use [`RecordKind::all`] so
/// referenced tables are created before the `items` table.
///
/// # Database Support
///
/// - MySQL / MariaDB (the default target)
/// - PostgreSQL
/// - SQLite
///
/// # Examples
///
/// ```no_run
/// use fiscal_seeder::core::item::{RecordKind, RecordWriter};
/// use fiscal_seeder::item::orm::OrmRecordWriter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let writer = OrmRecordWriter::connect("sqlite::memory:", 1).await?;
/// writer.migrate(&RecordKind::all()).await?;
/// # Ok(())
/// # }
/// ```
pub struct OrmRecordWriter {
    /// Database connection (pool handle)
    connection: DatabaseConnection,
}

impl OrmRecordWriter {
    /// Creates a writer over an existing connection.
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Opens a connection pool of at most `max_connections` to `url`.
    ///
    /// # Returns
    /// - `Ok(OrmRecordWriter)` once the database answered
    /// - `Err(BatchError::Connection)` if it could not be reached
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, BatchError> {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .max_connections(max_connections.max(1))
            .min_connections(1)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let connection = Database::connect(options)
            .await
            .map_err(|err| BatchError::Connection(err.to_string()))?;

        log::info!("Connected to {:?} database", connection.get_database_backend());
        Ok(Self::new(connection))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    async fn create_table(&self, statement: TableCreateStatement) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection.execute(backend.build(&statement)).await?;
        Ok(())
    }
}

/// Builds the `CREATE TABLE IF NOT EXISTS` statement of `kind`.
fn table_statement(schema: &Schema, kind: RecordKind) -> TableCreateStatement {
    let mut statement = match kind {
        RecordKind::Receipt => schema.create_table_from_entity(receipt::Entity),
        RecordKind::LineItem => schema.create_table_from_entity(line_item::Entity),
        RecordKind::Subtype(category) => match category {
            Category::Book => schema.create_table_from_entity(book_item::Entity),
            Category::Chemical => schema.create_table_from_entity(chemical_item::Entity),
            Category::Clothing => schema.create_table_from_entity(clothing_item::Entity),
            Category::Drink => schema.create_table_from_entity(drink_item::Entity),
            Category::Electronic => schema.create_table_from_entity(electronic_item::Entity),
            Category::Film => schema.create_table_from_entity(film_item::Entity),
            Category::Fitness => schema.create_table_from_entity(fitness_item::Entity),
            Category::Food => schema.create_table_from_entity(food_item::Entity),
            Category::Game => schema.create_table_from_entity(game_item::Entity),
            Category::Hardware => schema.create_table_from_entity(hardware_item::Entity),
            Category::Hygiene => schema.create_table_from_entity(hygiene_item::Entity),
            Category::Music => schema.create_table_from_entity(music_item::Entity),
            Category::Software => schema.create_table_from_entity(software_item::Entity),
            Category::Tool => schema.create_table_from_entity(tool_item::Entity),
            Category::Toy => schema.create_table_from_entity(toy_item::Entity),
            Category::Vehicle => schema.create_table_from_entity(vehicle_item::Entity),
        },
    };
    statement.if_not_exists();
    statement
}

/// Inserts one active model and returns its primary key.
async fn insert_one<A>(connection: &DatabaseConnection, active_model: A) -> Result<Uuid, DbErr>
where
    A: ActiveModelTrait + Send,
    <<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
{
    let result = <A as ActiveModelTrait>::Entity::insert(active_model)
        .exec(connection)
        .await?;
    Ok(result.last_insert_id)
}

/// Inserts a subtype record into the table of its category.
async fn insert_subtype(db: &DatabaseConnection, subtype: SubtypeRecord) -> Result<Uuid, DbErr> {
    match subtype {
        SubtypeRecord::Book(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Chemical(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Clothing(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Drink(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Electronic(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Film(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Fitness(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Food(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Game(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Hardware(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Hygiene(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Music(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Software(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Tool(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Toy(model) => insert_one(db, model.into_active_model()).await,
        SubtypeRecord::Vehicle(model) => insert_one(db, model.into_active_model()).await,
    }
}

#[async_trait]
impl RecordWriter for OrmRecordWriter {
    /// Creates the tables of `kinds`, stopping at the first failure.
    ///
    /// A failure here is fatal for a run: it is reported as
    /// `BatchError::Migration` naming the table that could not be created.
    async fn migrate(&self, kinds: &[RecordKind]) -> ItemWriterResult {
        let schema = Schema::new(self.connection.get_database_backend());

        for &kind in kinds {
            self.create_table(table_statement(&schema, kind))
                .await
                .map_err(|err| BatchError::Migration {
                    kind,
                    message: err.to_string(),
                })?;
            log::debug!("Table {} is ready", kind.table_name());
        }

        log::info!("Schema migrated ({} tables)", kinds.len());
        Ok(())
    }

    /// Inserts `record` as a single row.
    ///
    /// # Returns
    /// - `Ok(Uuid)` with the primary key of the inserted row
    /// - `Err(BatchError::ItemWriter)` naming the record kind and id otherwise
    async fn create(&self, record: Record) -> ItemWriterResult<Uuid> {
        let kind = record.kind();
        let id = record.id();
        let connection = &self.connection;

        let result = match record {
            Record::Receipt(model) => insert_one(connection, model.into_active_model()).await,
            Record::LineItem(model) => insert_one(connection, model.into_active_model()).await,
            Record::Subtype(subtype) => insert_subtype(connection, subtype).await,
        };

        match result {
            Ok(inserted) => {
                log::debug!("Inserted {} {}", kind, inserted);
                Ok(inserted)
            }
            Err(db_err) => {
                let message = format!("Failed to insert into {}: {}", kind.table_name(), db_err);
                log::error!("{}", message);
                Err(BatchError::ItemWriter { kind, id, message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Schema};

    use super::{OrmRecordWriter, table_statement};
    use crate::{
        BatchError,
        core::item::{Category, Record, RecordKind, RecordWriter},
        item::fake::{seeded_rng, subtype_factory::new_subtype},
    };

    fn inserted_one() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn create_echoes_the_record_id() {
        let connection = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([inserted_one()])
            .into_connection();
        let writer = OrmRecordWriter::new(connection);
        let book = new_subtype(&mut seeded_rng(8), Category::Book, 42);

        let id = writer.create(Record::Subtype(book.clone())).await.unwrap();

        assert_eq!(id, book.id());
    }

    #[tokio::test]
    async fn failed_insert_names_the_record() {
        let connection = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_errors([sea_orm::DbErr::Custom("disk full".to_string())])
            .into_connection();
        let writer = OrmRecordWriter::new(connection);
        let tool = new_subtype(&mut seeded_rng(8), Category::Tool, 42);

        let error = writer.create(Record::Subtype(tool.clone())).await.unwrap_err();

        match error {
            BatchError::ItemWriter { kind, id, message } => {
                assert_eq!(kind, RecordKind::Subtype(Category::Tool));
                assert_eq!(id, tool.id());
                assert!(message.contains("tool_items"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn migrate_runs_one_statement_per_table() {
        let kinds = RecordKind::all();
        let connection = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results(kinds.iter().map(|_| inserted_one()))
            .into_connection();
        let writer = OrmRecordWriter::new(connection);

        writer.migrate(&kinds).await.unwrap();

        let log = writer.connection.into_transaction_log();
        assert_eq!(log.len(), kinds.len());
    }

    #[tokio::test]
    async fn failed_migration_is_reported_with_its_table() {
        let connection = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([inserted_one()])
            .append_exec_errors([sea_orm::DbErr::Custom("denied".to_string())])
            .into_connection();
        let writer = OrmRecordWriter::new(connection);

        let error = writer.migrate(&RecordKind::all()).await.unwrap_err();

        assert!(error.is_fatal());
        assert!(matches!(
            error,
            BatchError::Migration {
                kind: RecordKind::Subtype(Category::Book),
                ..
            }
        ));
    }

    #[test]
    fn statements_create_tables_if_missing() {
        let backend = DatabaseBackend::MySql;
        let schema = Schema::new(backend);

        let items = backend
            .build(&table_statement(&schema, RecordKind::LineItem))
            .to_string();
        assert!(items.starts_with("CREATE TABLE IF NOT EXISTS `items`"));
        assert!(items.contains("`fiscal_receipt_id`"));
        assert!(items.contains("`vehicle_item_id`"));

        let electronics = backend
            .build(&table_statement(&schema, RecordKind::Subtype(Category::Electronic)))
            .to_string();
        assert!(electronics.contains("`type`"));
    }
}
