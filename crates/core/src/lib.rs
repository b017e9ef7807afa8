pub mod campaign;
pub mod cart;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod ports;
pub mod pricing;
pub mod reminder;
pub mod roles;
pub mod shipping;
pub mod types;

#[cfg(test)]
mod testing;
