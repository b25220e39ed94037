//! # Validation Module
//!
//! Input validation for product drafts and status-changing operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── required / number inputs                                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization                                              │
//! │  └── Types, wire names, defaults                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Business rules on drafts (add / edit / sell / return)             │
//! │                                                                         │
//! │  Records arriving by sync or import skip Layer 3: they were valid      │
//! │  on the device that wrote them, and refusing them would lose data.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductDraft;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum article code length.
pub const MAX_ARTICLE_LEN: usize = 50;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name: non-blank, at most 200 characters.
///
/// ## Example
/// ```rust
/// use gemstock_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Gold ring 585").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates an article code: non-blank, at most 50 characters.
pub fn validate_article_code(article: &str) -> ValidationResult<()> {
    validate_text("article", article, MAX_ARTICLE_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a weight in grams: finite and strictly positive.
pub fn validate_weight(weight_grams: f64) -> ValidationResult<()> {
    if !weight_grams.is_finite() || weight_grams <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "weight".to_string(),
        });
    }
    Ok(())
}

/// Validates an amount that may be zero but not negative.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that `later` does not precede `earlier`.
pub fn validate_date_order(
    field: &str,
    later: NaiveDate,
    other: &str,
    earlier: NaiveDate,
) -> ValidationResult<()> {
    if later < earlier {
        return Err(ValidationError::DateOrder {
            field: field.to_string(),
            other: other.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Draft Validation
// =============================================================================

/// Validates a full product draft.
///
/// ## Rules
/// - name and article required
/// - weight > 0
/// - purchase price, selling price, expenses ≥ 0
/// - sale date (when given) not before acquisition date
pub fn validate_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_article_code(&draft.article_code)?;
    validate_weight(draft.weight_grams)?;
    validate_amount("purchasePrice", draft.purchase_price)?;
    validate_amount("sellingPrice", draft.selling_price)?;
    validate_amount("expenses", draft.expenses)?;

    if let Some(sale_date) = draft.sale_date {
        validate_date_order("saleDate", sale_date, "date", draft.acquisition_date)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;

    fn draft() -> ProductDraft {
        ProductDraft {
            acquisition_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            name: "Silver earrings".to_string(),
            weight_grams: 4.1,
            article_code: "ER-925-04".to_string(),
            purchase_price: Money::from_cents(250_000),
            selling_price: Money::from_cents(390_000),
            status: ProductStatus::InStock,
            payment_type: None,
            sale_date: None,
            expenses: Money::zero(),
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_name_rules() {
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
        assert!(validate_product_name(&"ж".repeat(200)).is_ok());
    }

    #[test]
    fn test_article_required() {
        let mut d = draft();
        d.article_code = " ".to_string();
        assert!(matches!(
            validate_draft(&d),
            Err(ValidationError::Required { field }) if field == "article"
        ));
    }

    #[test]
    fn test_weight_must_be_positive() {
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(0.01).is_ok());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut d = draft();
        d.expenses = Money::from_cents(-1);
        assert!(matches!(
            validate_draft(&d),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_sale_before_acquisition_rejected() {
        let mut d = draft();
        d.status = ProductStatus::Sold;
        d.sale_date = NaiveDate::from_ymd_opt(2024, 1, 9);
        assert!(matches!(
            validate_draft(&d),
            Err(ValidationError::DateOrder { .. })
        ));

        d.sale_date = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert!(validate_draft(&d).is_ok());
    }
}
