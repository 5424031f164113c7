/// ORM record writer persisting generated records through SeaORM.
pub mod orm_writer;

pub use orm_writer::OrmRecordWriter;
