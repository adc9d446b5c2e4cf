//! Process-local adapters used by tests and `--in-memory` development runs.

mod works;

pub use works::InMemoryWorksRepository;
