pub mod repositories;

pub use repositories::works::PostgresWorksRepository;
