use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::memory::InMemoryWorksRepository;
use crate::database::ports::works::{WorksReadPort, WorksWritePort};
#[cfg(feature = "database")]
use crate::database::postgres::PostgresDatabase;

/// Repository ports used by the application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub works_read: Arc<dyn WorksReadPort>,
    pub works_write: Arc<dyn WorksWritePort>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("works_read", &type_name_of_val(self.works_read.as_ref()))
            .field("works_write", &type_name_of_val(self.works_write.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    /// Both ports backed by the same in-process store.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(InMemoryWorksRepository::new()))
    }

    pub fn from_memory(repo: Arc<InMemoryWorksRepository>) -> Self {
        Self {
            works_read: repo.clone(),
            works_write: repo,
        }
    }

    #[cfg(feature = "database")]
    pub fn from_postgres(db: &PostgresDatabase) -> Self {
        let works = Arc::new(db.works_repository());
        Self {
            works_read: works.clone(),
            works_write: works,
        }
    }

    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    works_read: Option<Arc<dyn WorksReadPort>>,
    works_write: Option<Arc<dyn WorksWritePort>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("works_read", &self.works_read.is_some())
            .field("works_write", &self.works_write.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_works_read(mut self, repo: Arc<dyn WorksReadPort>) -> Self {
        self.works_read = Some(repo);
        self
    }

    pub fn with_works_write(mut self, repo: Arc<dyn WorksWritePort>) -> Self {
        self.works_write = Some(repo);
        self
    }

    /// Returns a string error naming the first missing port.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            works_read: self
                .works_read
                .ok_or_else(|| "missing WorksReadPort".to_string())?,
            works_write: self
                .works_write
                .ok_or_else(|| "missing WorksWritePort".to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_reports_missing_port() {
        let repo = Arc::new(InMemoryWorksRepository::new());
        let err = AppUnitOfWork::builder()
            .with_works_read(repo)
            .build()
            .unwrap_err();
        assert_eq!(err, "missing WorksWritePort");
    }

    #[test]
    fn debug_names_the_adapters() {
        let uow = AppUnitOfWork::in_memory();
        let rendered = format!("{uow:?}");
        assert!(rendered.contains("InMemoryWorksRepository"));
    }
}
