pub mod unit_of_work;
pub mod work_service;

pub use unit_of_work::{AppUnitOfWork, AppUnitOfWorkBuilder};
pub use work_service::{NetworkPolicy, PagingPolicy, WorkListing, WorkService};
