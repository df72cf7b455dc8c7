pub mod auth_service;
pub mod customer_service;
pub mod matter_service;
pub mod portal_service;
pub mod validation;

pub use auth_service::AuthService;
pub use customer_service::CustomerService;
pub use matter_service::MatterService;
pub use portal_service::PortalService;
