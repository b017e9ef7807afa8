//! HTML rendering for the cart reminder email.
//!
//! Amounts are printed in Turkish notation (`1.234,50 TL`). Every piece of
//! user-controlled text is HTML-escaped.

use std::fmt::Write as _;

use dukkan_core::cart::CartSnapshot;
use dukkan_core::money::round_currency;
use dukkan_core::reminder::ReminderRequest;
use rust_decimal::Decimal;

/// Subject used when the admin does not supply one.
pub const DEFAULT_REMINDER_SUBJECT: &str = "Sepetinizde ürünler sizi bekliyor";

const DEFAULT_REMINDER_MESSAGE: &str =
    "Sepetinize eklediğiniz ürünler hâlâ sizi bekliyor. Stoklar tükenmeden siparişinizi tamamlayın.";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format an amount as Turkish lira: `1234.5` becomes `1.234,50 TL`.
pub fn format_try(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part} TL")
}

/// Resolve the subject line, falling back to [`DEFAULT_REMINDER_SUBJECT`].
pub fn reminder_subject(request: &ReminderRequest) -> String {
    request
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REMINDER_SUBJECT)
        .to_string()
}

/// Render the reminder body for `cart`.
pub fn render_cart_reminder(cart: &CartSnapshot, request: &ReminderRequest) -> String {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_REMINDER_MESSAGE);

    let mut rows = String::new();
    for line in &cart.lines {
        // Writing into a String never fails.
        let _ = write!(
            rows,
            "<tr>\
               <td style=\"padding:8px;border-bottom:1px solid #eee\">{name}</td>\
               <td style=\"padding:8px;border-bottom:1px solid #eee;text-align:center\">{qty}</td>\
               <td style=\"padding:8px;border-bottom:1px solid #eee;text-align:right\">{unit}</td>\
               <td style=\"padding:8px;border-bottom:1px solid #eee;text-align:right\">{total}</td>\
             </tr>",
            name = escape_html(&line.product_name),
            qty = line.quantity,
            unit = format_try(line.unit_price),
            total = format_try(line.line_total()),
        );
    }

    let coupon = request
        .discount_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|code| {
            format!(
                "<p style=\"margin:24px 0;padding:16px;background:#fff4e5;border-radius:6px\">\
                   Size özel indirim kodu: <strong>{}</strong>\
                 </p>",
                escape_html(code)
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\
         <html lang=\"tr\">\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body style=\"font-family:Arial,sans-serif;color:#222\">\
           <h2>{title}</h2>\
           <p>{message}</p>\
           <table style=\"width:100%;border-collapse:collapse\">\
             <thead><tr>\
               <th style=\"text-align:left;padding:8px\">Ürün</th>\
               <th style=\"padding:8px\">Adet</th>\
               <th style=\"text-align:right;padding:8px\">Birim Fiyat</th>\
               <th style=\"text-align:right;padding:8px\">Tutar</th>\
             </tr></thead>\
             <tbody>{rows}</tbody>\
           </table>\
           <p style=\"text-align:right;font-size:18px\">Sepet Toplamı: <strong>{total}</strong></p>\
           {coupon}\
         </body>\
         </html>",
        title = escape_html(&reminder_subject(request)),
        message = escape_html(message),
        rows = rows,
        total = format_try(cart.total),
        coupon = coupon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dukkan_core::cart::{CartLine, CartStatus};
    use rust_decimal_macros::dec;

    fn cart() -> CartSnapshot {
        CartSnapshot {
            id: 5,
            status: CartStatus::Abandoned,
            email: Some("ayse@example.com".into()),
            user_email: None,
            total: dec!(1290.00),
            updated_at: Utc::now(),
            lines: vec![
                CartLine {
                    product_id: 1,
                    product_name: "Bakır Cezve <XL>".into(),
                    quantity: 2,
                    unit_price: dec!(395.00),
                },
                CartLine {
                    product_id: 2,
                    product_name: "Lokum & Kahve Seti".into(),
                    quantity: 1,
                    unit_price: dec!(500.00),
                },
            ],
        }
    }

    #[test]
    fn formats_turkish_lira() {
        assert_eq!(format_try(dec!(0)), "0,00 TL");
        assert_eq!(format_try(dec!(9.5)), "9,50 TL");
        assert_eq!(format_try(dec!(999.99)), "999,99 TL");
        assert_eq!(format_try(dec!(1234.5)), "1.234,50 TL");
        assert_eq!(format_try(dec!(1234567.891)), "1.234.567,89 TL");
        assert_eq!(format_try(dec!(-50)), "-50,00 TL");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn subject_falls_back_to_default() {
        let mut req = ReminderRequest::default();
        assert_eq!(reminder_subject(&req), DEFAULT_REMINDER_SUBJECT);
        req.subject = Some("   ".into());
        assert_eq!(reminder_subject(&req), DEFAULT_REMINDER_SUBJECT);
        req.subject = Some("Son şans!".into());
        assert_eq!(reminder_subject(&req), "Son şans!");
    }

    #[test]
    fn body_lists_lines_and_totals() {
        let html = render_cart_reminder(&cart(), &ReminderRequest::default());
        assert!(html.contains("Bakır Cezve &lt;XL&gt;"));
        assert!(html.contains("Lokum &amp; Kahve Seti"));
        assert!(html.contains("790,00 TL"));
        assert!(html.contains("1.290,00 TL"));
        assert!(html.contains(DEFAULT_REMINDER_MESSAGE));
        assert!(!html.contains("indirim kodu"));
    }

    #[test]
    fn body_includes_coupon_and_custom_message() {
        let req = ReminderRequest {
            cart_id: 5,
            discount_code: Some("SEPET10".into()),
            subject: None,
            message: Some("Size <özel> bir teklifimiz var".into()),
        };
        let html = render_cart_reminder(&cart(), &req);
        assert!(html.contains("<strong>SEPET10</strong>"));
        assert!(html.contains("Size &lt;özel&gt; bir teklifimiz var"));
    }
}
