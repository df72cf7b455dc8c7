pub mod customer;
pub mod matter;
pub mod user;

pub use customer::Customer;
pub use matter::Matter;
pub use user::User;
