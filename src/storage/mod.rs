// SQLite storage module

pub mod init;
pub mod orm_storage;

pub use init::init_storage;
pub use orm_storage::Storage;
