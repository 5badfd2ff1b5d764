#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sheet_service;
pub mod sheet_view;

pub use app_services::AppServices;
pub use error::{AppServicesError, SessionError};
pub use sheet_service::SheetService;
pub use sheet_view::SheetSnapshot;
