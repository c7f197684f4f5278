pub mod orders;
pub mod users;

pub use orders::Entity as Orders;
