//! Role-based destination resolution

mod service;

pub use service::RoleRouter;
