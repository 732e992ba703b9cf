//! Payment wire type.

use chrono::{DateTime, Utc};
use commerce_core::{CurrencyCode, OrderId, PaymentGateway, PaymentId, PaymentMethod, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire_time;
use crate::models::{Payment, Timestamps};

/// Wire form of a [`Payment`]. The processor travels as `gateway`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PaymentId>,
    pub order_id: OrderId,
    pub amount: Decimal,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub gateway_transaction_id: Option<String>,
    #[serde(default)]
    pub gateway_response: Option<String>,
    pub payment_method: PaymentMethod,
    pub gateway: PaymentGateway,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, with = "wire_time")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire_time", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentDto {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            order_id: payment.order_id,
            amount: payment.amount,
            status: payment.status,
            gateway_transaction_id: payment.gateway_transaction_id.clone(),
            gateway_response: payment.gateway_response.clone(),
            payment_method: payment.payment_method,
            gateway: payment.payment_gateway,
            currency: payment.currency,
            paid_at: payment.paid_at,
            created_at: payment.timestamps.created_at,
            updated_at: payment.timestamps.updated_at,
            deleted_at: payment.timestamps.deleted_at,
        }
    }
}

impl From<PaymentDto> for Payment {
    fn from(dto: PaymentDto) -> Self {
        Self {
            id: None,
            order_id: dto.order_id,
            amount: dto.amount,
            status: dto.status,
            gateway_transaction_id: dto.gateway_transaction_id,
            gateway_response: dto.gateway_response,
            payment_method: dto.payment_method,
            payment_gateway: dto.gateway,
            currency: dto.currency,
            paid_at: dto.paid_at,
            timestamps: Timestamps::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_inbound_paid_at_variants() {
        let base = r#"{"order_id":1,"amount":"48.18","payment_method":"paypal","gateway":"paypal""#;

        let missing: PaymentDto = serde_json::from_str(&format!("{base}}}")).unwrap();
        assert!(missing.paid_at.is_none());
        assert_eq!(missing.currency, CurrencyCode::USD);
        assert_eq!(missing.status, PaymentStatus::Pending);

        let empty: PaymentDto = serde_json::from_str(&format!(r#"{base},"paid_at":""}}"#)).unwrap();
        assert!(empty.paid_at.is_none());

        let bad: PaymentDto =
            serde_json::from_str(&format!(r#"{base},"paid_at":"not a date"}}"#)).unwrap();
        assert!(bad.paid_at.is_none());

        let good: PaymentDto =
            serde_json::from_str(&format!(r#"{base},"paid_at":"06/15/2024 10:30:00"}}"#)).unwrap();
        assert_eq!(
            good.paid_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_unknown_enums_rejected() {
        let json = r#"{"order_id":1,"amount":"1.00","payment_method":"cash","gateway":"stripe"}"#;
        assert!(serde_json::from_str::<PaymentDto>(json).is_err());

        let json = r#"{"order_id":1,"amount":"1.00","payment_method":"credit_card","gateway":"venmo"}"#;
        assert!(serde_json::from_str::<PaymentDto>(json).is_err());
    }

    #[test]
    fn test_round_trip_maps_gateway() {
        let mut payment = Payment::new(
            OrderId::new(1),
            Decimal::new(4818, 2),
            PaymentMethod::CreditCard,
            PaymentGateway::AuthorizeNet,
        );
        payment.id = Some(PaymentId::new(12));
        payment.currency = CurrencyCode::EUR;
        payment.gateway_transaction_id = Some("txn_123".to_owned());
        payment.paid_at = Some(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap());

        let dto = PaymentDto::from(&payment);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["gateway"], "authorize_net");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["paid_at"], "06/15/2024 10:30:00");

        let back = Payment::from(dto);
        assert_eq!(back, Payment { id: None, ..payment });
    }
}
