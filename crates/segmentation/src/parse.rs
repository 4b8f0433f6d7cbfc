//! Text form of a condition, e.g. `totalSpend > 400` or `or visits>=10`.

use audience_core::{AudienceError, AudienceResult, CustomerField};

use crate::predicates::{ComparisonOperator, Condition, Logic};

/// Parse `[and|or] <field> <op> <value>`.
///
/// The value is kept verbatim, so `visits > abc` parses and later evaluates
/// as a no-op.
pub fn parse_condition(text: &str) -> AudienceResult<Condition> {
    let mut rest = text.trim();
    let mut logic = Logic::And;
    if let Some((head, tail)) = rest.split_once(char::is_whitespace) {
        if head.eq_ignore_ascii_case("or") {
            logic = Logic::Or;
            rest = tail.trim_start();
        } else if head.eq_ignore_ascii_case("and") {
            rest = tail.trim_start();
        }
    }

    let op_start = rest
        .find(['<', '>'])
        .ok_or_else(|| invalid(text, "missing comparison operator"))?;
    let field_key = rest[..op_start].trim();
    let after = &rest[op_start..];
    let op_len = if after[1..].starts_with('=') { 2 } else { 1 };
    let symbol = &after[..op_len];
    let value = after[op_len..].trim();

    let field = CustomerField::from_key(field_key)
        .ok_or_else(|| invalid(text, &format!("unknown field '{field_key}'")))?;
    let operator = ComparisonOperator::from_symbol(symbol)
        .ok_or_else(|| invalid(text, &format!("unknown operator '{symbol}'")))?;
    if value.is_empty() {
        return Err(invalid(text, "missing value"));
    }

    Ok(Condition::new(field, operator, value).with_logic(logic))
}

fn invalid(text: &str, reason: &str) -> AudienceError {
    AudienceError::InvalidCondition(format!("{reason} in '{}'", text.trim()))
}
