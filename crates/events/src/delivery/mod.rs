//! Outbound delivery channels for storefront notifications.

pub mod email;
