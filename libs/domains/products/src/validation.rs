//! Field rules for product payloads.
//!
//! Each field is checked independently and contributes at most one message, so
//! a payload with three bad fields yields three messages in field order:
//! name, description, price, quantity, category. Nothing here touches storage.

use serde_json::Value;
use std::str::FromStr;

use crate::models::{NewProduct, ProductCategory, ProductChanges, ProductInput};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 1000;

/// Validate a create payload; every required field must be present
pub fn validate_new(input: &ProductInput) -> Result<NewProduct, Vec<String>> {
    let mut errors = Vec::new();

    let name = collect(&mut errors, required(&input.name, "Product name is required").and_then(check_name));
    let description = collect(
        &mut errors,
        required(&input.description, "Product description is required").and_then(check_description),
    );
    let price = collect(&mut errors, required(&input.price, "Product price is required").and_then(check_price));
    let quantity = collect(&mut errors, input.quantity.as_ref().map(check_quantity).transpose());
    let category = collect(
        &mut errors,
        required(&input.category, "Product category is required").and_then(check_category),
    );

    match (name, description, price, quantity, category) {
        (Some(name), Some(description), Some(price), Some(quantity), Some(category))
            if errors.is_empty() =>
        {
            Ok(NewProduct {
                name,
                description,
                price,
                quantity: quantity.unwrap_or(0),
                category,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an update payload; only the fields present are checked
pub fn validate_changes(input: &ProductInput) -> Result<ProductChanges, Vec<String>> {
    let mut errors = Vec::new();

    let changes = ProductChanges {
        name: collect(&mut errors, input.name.as_ref().map(check_name).transpose()).flatten(),
        description: collect(&mut errors, input.description.as_ref().map(check_description).transpose())
            .flatten(),
        price: collect(&mut errors, input.price.as_ref().map(check_price).transpose()).flatten(),
        quantity: collect(&mut errors, input.quantity.as_ref().map(check_quantity).transpose()).flatten(),
        category: collect(&mut errors, input.category.as_ref().map(check_category).transpose()).flatten(),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn collect<T>(errors: &mut Vec<String>, result: Result<T, String>) -> Option<T> {
    result.map_err(|message| errors.push(message)).ok()
}

fn required<'a>(value: &'a Option<Value>, message: &str) -> Result<&'a Value, String> {
    value.as_ref().ok_or_else(|| message.to_string())
}

fn check_name(value: &Value) -> Result<String, String> {
    let raw = value.as_str().ok_or("Name must be a string")?;
    let trimmed = raw.trim();
    let length = trimmed.chars().count();

    if length == 0 {
        Err("Product name is required".to_string())
    } else if length < NAME_MIN {
        Err(format!("Name must be at least {NAME_MIN} characters"))
    } else if length > NAME_MAX {
        Err(format!("Name cannot exceed {NAME_MAX} characters"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_description(value: &Value) -> Result<String, String> {
    let raw = value.as_str().ok_or("Description must be a string")?;
    let length = raw.chars().count();

    if length == 0 {
        Err("Product description is required".to_string())
    } else if length < DESCRIPTION_MIN {
        Err(format!("Description must be at least {DESCRIPTION_MIN} characters"))
    } else if length > DESCRIPTION_MAX {
        Err(format!("Description cannot exceed {DESCRIPTION_MAX} characters"))
    } else {
        Ok(raw.to_string())
    }
}

fn check_price(value: &Value) -> Result<i64, String> {
    whole_non_negative(
        value,
        "Price must be a number",
        "Price cannot be negative",
        "Price must be an integer",
    )
}

fn check_quantity(value: &Value) -> Result<i64, String> {
    whole_non_negative(
        value,
        "Quantity must be a number",
        "Quantity cannot be negative",
        "Quantity must be an integer",
    )
}

/// JSON numbers only; `2.0` is accepted as 2, values outside `i64` count as non-integral
fn whole_non_negative(
    value: &Value,
    not_number: &str,
    negative: &str,
    fractional: &str,
) -> Result<i64, String> {
    let number = value.as_number().ok_or(not_number)?;

    if let Some(n) = number.as_i64() {
        return if n < 0 { Err(negative.to_string()) } else { Ok(n) };
    }

    let Some(float) = number.as_f64() else {
        return Err(fractional.to_string());
    };
    if float < 0.0 {
        return Err(negative.to_string());
    }
    if float.fract() != 0.0 || float >= i64::MAX as f64 {
        return Err(fractional.to_string());
    }
    Ok(float as i64)
}

fn check_category(value: &Value) -> Result<ProductCategory, String> {
    let invalid = || {
        format!(
            "Invalid category. Must be one of: {}",
            ProductCategory::allowed_values()
        )
    };

    let raw = value.as_str().ok_or_else(invalid)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Product category is required".to_string());
    }
    ProductCategory::from_str(trimmed).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    fn pen() -> Value {
        json!({
            "name": "Pen",
            "description": "A blue ink pen",
            "price": 2,
            "quantity": 0,
            "category": "other"
        })
    }

    fn with(field: &str, value: Value) -> ProductInput {
        let mut body = pen();
        body[field] = value;
        input(body)
    }

    fn errors_for(field: &str, value: Value) -> Vec<String> {
        validate_new(&with(field, value)).unwrap_err()
    }

    #[test]
    fn test_valid_payload() {
        let product = validate_new(&input(pen())).unwrap();
        assert_eq!(
            product,
            NewProduct {
                name: "Pen".to_string(),
                description: "A blue ink pen".to_string(),
                price: 2,
                quantity: 0,
                category: ProductCategory::Other,
            }
        );
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let mut body = pen();
        body.as_object_mut().unwrap().remove("quantity");
        assert_eq!(validate_new(&input(body)).unwrap().quantity, 0);
    }

    #[test]
    fn test_empty_payload_reports_every_required_field_in_order() {
        let errors = validate_new(&ProductInput::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Product name is required",
                "Product description is required",
                "Product price is required",
                "Product category is required",
            ]
        );
    }

    #[test]
    fn test_name_length_bounds() {
        assert_eq!(errors_for("name", json!("P")), vec!["Name must be at least 2 characters"]);
        assert_eq!(
            errors_for("name", json!("x".repeat(101))),
            vec!["Name cannot exceed 100 characters"]
        );
        assert!(validate_new(&with("name", json!("x".repeat(100)))).is_ok());
    }

    #[test]
    fn test_name_is_trimmed_before_measuring() {
        assert_eq!(
            errors_for("name", json!("  P  ")),
            vec!["Name must be at least 2 characters"]
        );
        assert_eq!(errors_for("name", json!("   ")), vec!["Product name is required"]);
        assert_eq!(validate_new(&with("name", json!("  Pen "))).unwrap().name, "Pen");
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        assert!(validate_new(&with("name", json!("Ñé"))).is_ok());
    }

    #[test]
    fn test_name_must_be_string() {
        assert_eq!(errors_for("name", json!(42)), vec!["Name must be a string"]);
    }

    #[test]
    fn test_description_length_bounds() {
        assert_eq!(
            errors_for("description", json!("123456789")),
            vec!["Description must be at least 10 characters"]
        );
        assert!(validate_new(&with("description", json!("1234567890"))).is_ok());
        assert_eq!(
            errors_for("description", json!("d".repeat(1001))),
            vec!["Description cannot exceed 1000 characters"]
        );
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(errors_for("price", json!(-1)), vec!["Price cannot be negative"]);
        assert_eq!(errors_for("price", json!(2.5)), vec!["Price must be an integer"]);
        assert_eq!(errors_for("price", json!("2")), vec!["Price must be a number"]);
        assert_eq!(errors_for("price", json!(-2.5)), vec!["Price cannot be negative"]);
        assert_eq!(validate_new(&with("price", json!(0))).unwrap().price, 0);
        assert_eq!(validate_new(&with("price", json!(15.0))).unwrap().price, 15);
    }

    #[test]
    fn test_price_beyond_i64_is_rejected() {
        assert_eq!(errors_for("price", json!(1e30)), vec!["Price must be an integer"]);
        assert_eq!(errors_for("price", json!(u64::MAX)), vec!["Price must be an integer"]);
    }

    #[test]
    fn test_quantity_rules() {
        assert_eq!(errors_for("quantity", json!(-3)), vec!["Quantity cannot be negative"]);
        assert_eq!(errors_for("quantity", json!(1.5)), vec!["Quantity must be an integer"]);
        assert_eq!(errors_for("quantity", json!(true)), vec!["Quantity must be a number"]);
    }

    #[test]
    fn test_category_rules() {
        assert_eq!(
            errors_for("category", json!("toys")),
            vec!["Invalid category. Must be one of: electronics, clothing, books, home, sports, other"]
        );
        assert_eq!(errors_for("category", json!("  ")), vec!["Product category is required"]);
        assert_eq!(
            validate_new(&with("category", json!(" books "))).unwrap().category,
            ProductCategory::Books
        );
        assert!(validate_new(&with("category", json!("Books"))).is_err());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let errors = validate_new(&input(json!({
            "name": "P",
            "description": "short",
            "price": -1,
            "quantity": 2.5,
            "category": "toys"
        })))
        .unwrap_err();

        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], "Name must be at least 2 characters");
        assert_eq!(errors[1], "Description must be at least 10 characters");
        assert_eq!(errors[2], "Price cannot be negative");
        assert_eq!(errors[3], "Quantity must be an integer");
        assert!(errors[4].starts_with("Invalid category"));
    }

    #[test]
    fn test_changes_only_check_present_fields() {
        let changes = validate_changes(&input(json!({"quantity": 7}))).unwrap();
        assert_eq!(
            changes,
            ProductChanges {
                quantity: Some(7),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_changes_report_bad_present_fields() {
        let errors = validate_changes(&input(json!({"price": 2.5, "category": "toys"}))).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], "Price must be an integer");
    }

    #[test]
    fn test_changes_ignore_in_stock_and_nulls() {
        let changes = validate_changes(&input(json!({"inStock": true, "name": null}))).unwrap();
        assert_eq!(changes, ProductChanges::default());
    }

    #[test]
    fn test_changes_trim_name() {
        let changes = validate_changes(&input(json!({"name": "  Marker  "}))).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Marker"));
    }
}
