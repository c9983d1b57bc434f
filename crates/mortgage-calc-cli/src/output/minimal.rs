use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline field for each calculation, in priority order.
const PRIORITY_KEYS: [&str; 5] = [
    "periodic_payment",
    "max_home_price",
    "premium_rate",
    "payoff_periods",
    "minimum_down_payment",
];

/// Print just the headline number of a calculation.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
        {
            println!("{}", format_scalar(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}
