pub mod auth;
pub mod company;
pub mod health;
pub mod purchase_orders;
