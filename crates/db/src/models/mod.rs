pub mod campaign;
pub mod cart;
pub mod mail_log;
pub mod product;
pub mod setting;
