//! Repository ports (interfaces) for the work administration context.
//! Implementations live under `database::infrastructure`.

pub mod works;
