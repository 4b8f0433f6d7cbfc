//! Condition types and comparison logic for segment criteria.

use audience_core::CustomerField;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 4] = [
        ComparisonOperator::GreaterThan,
        ComparisonOperator::LessThan,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::LessThanOrEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }

    /// `None` for anything that is not one of the four symbols, including the empty string.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn apply(&self, actual: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterThan => actual > threshold,
            ComparisonOperator::LessThan => actual < threshold,
            ComparisonOperator::GreaterThanOrEqual => actual >= threshold,
            ComparisonOperator::LessThanOrEqual => actual <= threshold,
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Combinator folding a condition into the running result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    /// Only the exact text `OR` selects disjunction; every other value,
    /// including `or` or ` OR`, means `AND`.
    pub fn from_text(text: &str) -> Self {
        if text == "OR" {
            Logic::Or
        } else {
            Logic::And
        }
    }
}

impl Serialize for Logic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Logic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Logic::from_text(&text))
    }
}

/// One field/operator/value/logic clause of a segment definition.
///
/// Unset parts are representable because conditions are edited
/// incrementally; evaluation treats them as no-ops rather than errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, with = "lenient_field")]
    pub field: Option<CustomerField>,
    #[serde(default, with = "lenient_operator")]
    pub operator: Option<ComparisonOperator>,
    /// Threshold as typed by the user; parsed on every evaluation.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub logic: Logic,
}

impl Condition {
    pub fn new(field: CustomerField, operator: ComparisonOperator, value: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            operator: Some(operator),
            value: value.into(),
            logic: Logic::And,
        }
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    pub fn or(self) -> Self {
        self.with_logic(Logic::Or)
    }

    pub fn threshold(&self) -> Option<f64> {
        parse_threshold(&self.value)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = self.field.map(|f| f.key()).unwrap_or("?");
        let operator = self.operator.map(|o| o.symbol()).unwrap_or("?");
        write!(f, "{} {} {} {}", self.logic.as_str(), field, operator, self.value)
    }
}

/// Apply `operator` between a customer value and a threshold.
/// An unrecognized operator passes unconditionally.
pub fn evaluate_condition(
    field_value: f64,
    operator: Option<ComparisonOperator>,
    threshold: f64,
) -> bool {
    match operator {
        Some(op) => op.apply(field_value, threshold),
        None => true,
    }
}

/// Parse user text the way a browser's `parseFloat` does: leading
/// whitespace is skipped and the longest numeric prefix is used.
/// Returns `None` when no number can be read.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| !v.is_nan())
}

mod lenient_field {
    use audience_core::CustomerField;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        field: &Option<CustomerField>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(field.map(|f| f.key()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CustomerField>, D::Error> {
        let key = Option::<String>::deserialize(deserializer)?;
        Ok(key.as_deref().and_then(CustomerField::from_key))
    }
}

mod lenient_operator {
    use super::ComparisonOperator;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        operator: &Option<ComparisonOperator>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(operator.map(|o| o.symbol()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ComparisonOperator>, D::Error> {
        let symbol = Option::<String>::deserialize(deserializer)?;
        Ok(symbol
            .as_deref()
            .and_then(|s| ComparisonOperator::from_symbol(s.trim())))
    }
}
