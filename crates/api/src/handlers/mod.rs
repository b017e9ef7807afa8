pub mod abandoned_carts;
pub mod campaigns;
pub mod carts;
pub mod coupons;
pub mod cron;
pub mod products;
pub mod settings;
pub mod shipping;
