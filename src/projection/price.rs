//! Human-readable pricing for compute resources.
//!
//! Prices arrive in minor currency units (cents). A `minute` unit is shown
//! as an hourly figure: `price_unit / 60` hours.

use serde_json::Value;

use super::Record;

pub const FREE: &str = "free";

/// Format the `price`, `price_unit`, `price_unit_type` triple of a resource.
pub fn format_price(item: &Record) -> String {
    let price = number(item.get("price")).unwrap_or(0.0);
    let unit = number(item.get("price_unit")).unwrap_or(0.0);
    if price <= 0.0 || unit <= 0.0 {
        return FREE.to_string();
    }

    let unit_type = item
        .get("price_unit_type")
        .and_then(Value::as_str)
        .unwrap_or("minute");
    let amount = decimal(price / 100.0);

    if unit_type.eq_ignore_ascii_case("minute") {
        format!("￥ {amount} / {} hour", decimal(unit / 60.0))
    } else {
        let unit = item
            .get("price_unit")
            .map(raw_number)
            .unwrap_or_else(|| decimal(unit));
        format!("￥ {amount} / {unit} {unit_type}")
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// Quotients always carry a decimal point (`5.0`, `1.5`).
fn decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Upstream numbers are echoed as received (`3600` stays `3600`).
fn raw_number(value: &Value) -> String {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().map(decimal).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
