//! Cart reminder dispatch.
//!
//! [`ReminderDispatcher`] sends at most one `cart_reminder` email per
//! recipient per cooldown window. The cooldown check and the log write are
//! separate round-trips, so two concurrent dispatches to the same recipient
//! can both pass the check and send one duplicate email.

use dukkan_core::error::CoreError;
use dukkan_core::ports::{CartStore, MailLogStore, MailSender, OutgoingMail};
use dukkan_core::reminder::{
    cooldown_window_start, ensure_cooldown_elapsed, recipient_key, ReminderReceipt,
    ReminderRequest, MAIL_TYPE_CART_REMINDER,
};
use dukkan_core::types::Timestamp;

use crate::template::{render_cart_reminder, reminder_subject};

pub struct ReminderDispatcher<'a, S, M> {
    store: &'a S,
    mailer: &'a M,
}

impl<'a, S, M> ReminderDispatcher<'a, S, M>
where
    S: CartStore + MailLogStore,
    M: MailSender,
{
    pub fn new(store: &'a S, mailer: &'a M) -> Self {
        Self { store, mailer }
    }

    /// Send one reminder for `request.cart_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the cart does not exist.
    /// - `MissingRecipient` if neither the cart nor its owner has an email.
    /// - `InvalidArgument` if the cart has no items.
    /// - `RateLimited` if the recipient got a reminder within the cooldown.
    /// - `Delivery` if the mail sender fails; no log row is written.
    pub async fn dispatch(
        &self,
        request: &ReminderRequest,
        now: Timestamp,
    ) -> Result<ReminderReceipt, CoreError> {
        let cart_id = request.cart_id;
        let cart = self
            .store
            .load_snapshot(cart_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "cart",
                id: cart_id,
            })?;

        let email = cart.recipient()?.to_string();
        if cart.is_empty() {
            return Err(CoreError::InvalidArgument(format!(
                "cart {cart_id} has no items to remind about"
            )));
        }
        let key = recipient_key(&email);

        let last_sent = self
            .store
            .last_sent_since(&key, MAIL_TYPE_CART_REMINDER, cooldown_window_start(now))
            .await?;
        if let Err(e) = ensure_cooldown_elapsed(last_sent, now) {
            tracing::info!(cart_id, email = %email, "Cart reminder skipped, cooldown active");
            return Err(e);
        }

        let mail = OutgoingMail {
            to: email.clone(),
            subject: reminder_subject(request),
            html_body: render_cart_reminder(&cart, request),
        };
        self.mailer.send(&mail).await?;

        // The mail is already out; a failed log write only weakens the cooldown.
        if let Err(e) = self
            .store
            .record_sent(&key, MAIL_TYPE_CART_REMINDER, now)
            .await
        {
            tracing::error!(cart_id, email = %email, error = %e, "Failed to record cart reminder");
        }

        tracing::info!(cart_id, email = %email, "Cart reminder sent");
        Ok(ReminderReceipt {
            cart_id,
            email,
            subject: mail.subject,
            sent_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use dukkan_core::cart::{CartLine, CartSnapshot, CartStatus};
    use dukkan_core::types::DbId;
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        carts: HashMap<DbId, CartSnapshot>,
        logs: Mutex<Vec<(String, String, Timestamp)>>,
    }

    impl FakeStore {
        fn with_cart(mut self, cart: CartSnapshot) -> Self {
            self.carts.insert(cart.id, cart);
            self
        }

        fn log(&self, email: &str, at: Timestamp) {
            self.logs
                .lock()
                .unwrap()
                .push((email.to_string(), MAIL_TYPE_CART_REMINDER.to_string(), at));
        }

        fn log_count(&self) -> usize {
            self.logs.lock().unwrap().len()
        }
    }

    impl CartStore for FakeStore {
        async fn mark_idle_abandoned(&self, _cutoff: Timestamp) -> Result<u64, CoreError> {
            Ok(0)
        }

        async fn load_snapshot(&self, cart_id: DbId) -> Result<Option<CartSnapshot>, CoreError> {
            Ok(self.carts.get(&cart_id).cloned())
        }
    }

    impl MailLogStore for FakeStore {
        async fn last_sent_since(
            &self,
            email: &str,
            mail_type: &str,
            since: Timestamp,
        ) -> Result<Option<Timestamp>, CoreError> {
            Ok(self
                .logs
                .lock()
                .unwrap()
                .iter()
                .filter(|(e, t, at)| e == email && t == mail_type && *at > since)
                .map(|(_, _, at)| *at)
                .max())
        }

        async fn record_sent(
            &self,
            email: &str,
            mail_type: &str,
            sent_at: Timestamp,
        ) -> Result<(), CoreError> {
            self.logs
                .lock()
                .unwrap()
                .push((email.to_string(), mail_type.to_string(), sent_at));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    impl MailSender for FakeMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), CoreError> {
            if self.fail {
                return Err(CoreError::Delivery("SMTP transport error: 421".into()));
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    impl FakeMailer {
        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    fn cart(id: DbId, email: Option<&str>, user_email: Option<&str>) -> CartSnapshot {
        CartSnapshot {
            id,
            status: CartStatus::Abandoned,
            email: email.map(str::to_string),
            user_email: user_email.map(str::to_string),
            total: dec!(240.00),
            updated_at: Utc::now() - Duration::hours(3),
            lines: vec![CartLine {
                product_id: 7,
                product_name: "Çini Kase".into(),
                quantity: 2,
                unit_price: dec!(120.00),
            }],
        }
    }

    fn request(cart_id: DbId) -> ReminderRequest {
        ReminderRequest {
            cart_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn sends_and_logs_reminder() {
        let store = FakeStore::default().with_cart(cart(1, Some("ali@example.com"), None));
        let mailer = FakeMailer::default();
        let now = Utc::now();

        let receipt = ReminderDispatcher::new(&store, &mailer)
            .dispatch(&request(1), now)
            .await
            .unwrap();

        assert_eq!(receipt.email, "ali@example.com");
        assert_eq!(receipt.subject, crate::template::DEFAULT_REMINDER_SUBJECT);
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(store.log_count(), 1);
        assert!(mailer.sent.lock().unwrap()[0].html_body.contains("Çini Kase"));
    }

    #[tokio::test]
    async fn falls_back_to_user_email() {
        let store = FakeStore::default().with_cart(cart(2, None, Some("uye@example.com")));
        let mailer = FakeMailer::default();

        let receipt = ReminderDispatcher::new(&store, &mailer)
            .dispatch(&request(2), Utc::now())
            .await
            .unwrap();
        assert_eq!(receipt.email, "uye@example.com");
    }

    #[tokio::test]
    async fn cooldown_blocks_within_24_hours() {
        let now = Utc::now();
        let store = FakeStore::default().with_cart(cart(3, Some("ali@example.com"), None));
        store.log("ali@example.com", now - Duration::hours(2));
        let mailer = FakeMailer::default();

        let result = ReminderDispatcher::new(&store, &mailer)
            .dispatch(&request(3), now)
            .await;

        assert_matches!(result, Err(CoreError::RateLimited { .. }));
        assert_eq!(mailer.sent_count(), 0);
        assert_eq!(store.log_count(), 1);
    }

    #[tokio::test]
    async fn cooldown_expires_after_24_hours() {
        let now = Utc::now();
        let store = FakeStore::default().with_cart(cart(4, Some("ali@example.com"), None));
        store.log("ali@example.com", now - Duration::hours(25));
        let mailer = FakeMailer::default();

        ReminderDispatcher::new(&store, &mailer)
            .dispatch(&request(4), now)
            .await
            .unwrap();
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(store.log_count(), 2);
    }

    #[tokio::test]
    async fn cooldown_is_per_recipient_across_carts() {
        let now = Utc::now();
        let store = FakeStore::default()
            .with_cart(cart(5, Some("ali@example.com"), None))
            .with_cart(cart(6, Some("ali@example.com"), None));
        let mailer = FakeMailer::default();
        let dispatcher = ReminderDispatcher::new(&store, &mailer);

        dispatcher.dispatch(&request(5), now).await.unwrap();
        assert_matches!(
            dispatcher.dispatch(&request(6), now).await,
            Err(CoreError::RateLimited { .. })
        );
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn cooldown_ignores_email_case() {
        let now = Utc::now();
        let store = FakeStore::default()
            .with_cart(cart(10, Some("Ali@Example.com"), None))
            .with_cart(cart(11, Some(" ali@example.com "), None));
        let mailer = FakeMailer::default();
        let dispatcher = ReminderDispatcher::new(&store, &mailer);

        let receipt = dispatcher.dispatch(&request(10), now).await.unwrap();
        assert_eq!(receipt.email, "Ali@Example.com");
        assert_eq!(store.logs.lock().unwrap()[0].0, "ali@example.com");

        assert_matches!(
            dispatcher.dispatch(&request(11), now).await,
            Err(CoreError::RateLimited { .. })
        );
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn missing_recipient_sends_nothing() {
        let store = FakeStore::default().with_cart(cart(7, None, None));
        let mailer = FakeMailer::default();

        assert_matches!(
            ReminderDispatcher::new(&store, &mailer)
                .dispatch(&request(7), Utc::now())
                .await,
            Err(CoreError::MissingRecipient { cart_id: 7 })
        );
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn unknown_cart_is_not_found() {
        let store = FakeStore::default();
        let mailer = FakeMailer::default();
        assert_matches!(
            ReminderDispatcher::new(&store, &mailer)
                .dispatch(&request(99), Utc::now())
                .await,
            Err(CoreError::NotFound { entity: "cart", id: 99 })
        );
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let mut empty = cart(8, Some("ali@example.com"), None);
        empty.lines.clear();
        empty.total = dec!(0);
        let store = FakeStore::default().with_cart(empty);
        let mailer = FakeMailer::default();

        assert_matches!(
            ReminderDispatcher::new(&store, &mailer)
                .dispatch(&request(8), Utc::now())
                .await,
            Err(CoreError::InvalidArgument(_))
        );
    }

    #[tokio::test]
    async fn send_failure_writes_no_log() {
        let store = FakeStore::default().with_cart(cart(9, Some("ali@example.com"), None));
        let mailer = FakeMailer {
            fail: true,
            ..Default::default()
        };

        assert_matches!(
            ReminderDispatcher::new(&store, &mailer)
                .dispatch(&request(9), Utc::now())
                .await,
            Err(CoreError::Delivery(_))
        );
        assert_eq!(store.log_count(), 0);
    }
}
