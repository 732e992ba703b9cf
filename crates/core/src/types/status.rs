//! Status enums for orders and payments.
//!
//! Each enum serializes as its `snake_case` name on the wire and maps to a
//! `PostgreSQL` ENUM type of the same name under the `postgres` feature.
//! Unknown strings are rejected both by serde and by [`std::str::FromStr`].

use serde::{Deserialize, Serialize};

/// Generates `as_str`, `Display` and `FromStr` for a unit-only enum.
macro_rules! string_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire/database representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", $label, ": {}"), s)),
                }
            }
        }
    };
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

string_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

/// Payment state, shared by orders and payment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Authorized,
    Captured,
    Failed,
    Refunded,
    PartiallyRefunded,
}

string_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Completed => "completed",
    Authorized => "authorized",
    Captured => "captured",
    Failed => "failed",
    Refunded => "refunded",
    PartiallyRefunded => "partially_refunded",
});

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    DebitCard,
    #[serde(rename = "paypal")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "paypal"))]
    PayPal,
    BankTransfer,
}

string_enum!(PaymentMethod, "payment method", {
    CreditCard => "credit_card",
    DebitCard => "debit_card",
    PayPal => "paypal",
    BankTransfer => "bank_transfer",
});

/// Processor that handled the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_gateway", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentGateway {
    #[default]
    Stripe,
    #[serde(rename = "paypal")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "paypal"))]
    PayPal,
    Square,
    AuthorizeNet,
}

string_enum!(PaymentGateway, "payment gateway", {
    Stripe => "stripe",
    PayPal => "paypal",
    Square => "square",
    AuthorizeNet => "authorize_net",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for status in PaymentStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for method in PaymentMethod::ALL {
            let json = serde_json::to_string(method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
        for gateway in PaymentGateway::ALL {
            let json = serde_json::to_string(gateway).unwrap();
            assert_eq!(json, format!("\"{}\"", gateway.as_str()));
        }
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_from_str_round_trips() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), *status);
        }
        assert_eq!(
            "authorize_net".parse::<PaymentGateway>().unwrap(),
            PaymentGateway::AuthorizeNet
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "teleported".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, "invalid order status: teleported");
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let result: Result<PaymentMethod, _> = serde_json::from_str("\"bitcoin\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(PaymentMethod::default(), PaymentMethod::CreditCard);
        assert_eq!(PaymentGateway::default(), PaymentGateway::Stripe);
    }
}
