pub mod campaign_repo;
pub mod cart_repo;
pub mod mail_log_repo;
pub mod product_repo;
pub mod setting_repo;

pub use campaign_repo::CampaignRepo;
pub use cart_repo::CartRepo;
pub use mail_log_repo::MailLogRepo;
pub use product_repo::ProductRepo;
pub use setting_repo::SettingRepo;
