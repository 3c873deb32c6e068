// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_amount;

// --- Enums (Postgres enum types) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Handphone,
    Laptop,
    Tablet,
    Aksesoris,
    Sparepart,
    Jasa,
    Lainnya,
}

value_set!(ProductType {
    Handphone => "handphone",
    Laptop => "laptop",
    Tablet => "tablet",
    Aksesoris => "aksesoris",
    Sparepart => "sparepart",
    Jasa => "jasa",
    Lainnya => "lainnya",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Tunai,
    Transfer,
    Qris,
    Debit,
    KartuKredit,
    EWallet,
}

value_set!(PaymentMethod {
    Tunai => "tunai",
    Transfer => "transfer",
    Qris => "qris",
    Debit => "debit",
    KartuKredit => "kartu_kredit",
    EWallet => "e_wallet",
});

// --- Rows ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-05-15")]
    pub transaction_date: NaiveDate,
    #[schema(example = "Budi Santoso")]
    pub customer_name: String,
    pub product_type: ProductType,
    #[schema(example = 1200000)]
    pub purchase_price: Decimal,
    #[schema(example = 1500000)]
    pub selling_price: Decimal,
    #[schema(example = 25000)]
    pub marketplace_fee: Decimal,
    // Generated column: selling_price - purchase_price - marketplace_fee
    #[schema(example = 275000)]
    pub gross_margin: Decimal,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

/// Form input for creating or editing a sale. The margin is derived, never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    #[schema(value_type = String, format = Date, example = "2024-05-15")]
    pub transaction_date: NaiveDate,

    #[validate(length(min = 1, max = 200, message = "Nama pelanggan wajib diisi."))]
    #[schema(example = "Budi Santoso")]
    pub customer_name: String,

    pub product_type: ProductType,

    #[validate(custom(function = "validate_amount"))]
    pub purchase_price: Decimal,

    #[validate(custom(function = "validate_amount"))]
    pub selling_price: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub marketplace_fee: Decimal,

    pub payment_method: PaymentMethod,

    pub description: Option<String>,
}

impl SaleInput {
    pub fn gross_margin(&self) -> Decimal {
        self.selling_price - self.purchase_price - self.marketplace_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(purchase: i64, selling: i64, fee: i64) -> SaleInput {
        SaleInput {
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            customer_name: "Sari".into(),
            product_type: ProductType::Handphone,
            purchase_price: Decimal::from(purchase),
            selling_price: Decimal::from(selling),
            marketplace_fee: Decimal::from(fee),
            payment_method: PaymentMethod::Qris,
            description: None,
        }
    }

    #[test]
    fn gross_margin_is_selling_minus_purchase_minus_fee() {
        assert_eq!(input(1_200_000, 1_500_000, 25_000).gross_margin(), Decimal::from(275_000));
        // Selling below cost is allowed and shows up as a negative margin.
        assert_eq!(input(100, 80, 5).gross_margin(), Decimal::from(-25));
    }

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!("HANDPHONE".parse::<ProductType>(), Ok(ProductType::Handphone));
        assert_eq!(" Kartu_Kredit ".parse::<PaymentMethod>(), Ok(PaymentMethod::KartuKredit));
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn wire_names_match_serde() {
        for method in PaymentMethod::ALL {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, method.as_str());
        }
        for product in ProductType::ALL {
            let json = serde_json::to_value(product).unwrap();
            assert_eq!(json, product.as_str());
        }
    }

    #[test]
    fn negative_prices_fail_validation() {
        let mut bad = input(100, 200, 0);
        bad.purchase_price = Decimal::from(-1);
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("purchase_price"));
        assert!(input(100, 200, 0).validate().is_ok());
    }

    #[test]
    fn prices_must_fit_two_decimal_places_and_fifteen_digits() {
        let mut bad = input(100, 200, 0);
        bad.selling_price = Decimal::new(99_999_999_999_999_999, 0);
        bad.marketplace_fee = Decimal::new(1, 3);
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("selling_price"));
        assert!(fields.contains_key("marketplace_fee"));
        assert!(!fields.contains_key("purchase_price"));
    }
}
