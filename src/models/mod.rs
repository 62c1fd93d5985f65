pub mod company;
pub mod purchase_order;
pub mod user;
