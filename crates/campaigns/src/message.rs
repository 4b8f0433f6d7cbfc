//! Message personalization using `[Placeholder]` syntax.

use audience_core::Customer;

const PLACEHOLDERS: [&str; 2] = ["[Name]", "[Email]"];

/// Replace `[Name]` and `[Email]` with the customer's details.
/// A missing email renders as an empty string.
pub fn personalize(template: &str, customer: &Customer) -> String {
    let mut result = template.to_string();
    for placeholder in PLACEHOLDERS {
        let value = match placeholder {
            "[Name]" => customer.name.as_str(),
            _ => customer.email.as_deref().unwrap_or_default(),
        };
        result = result.replace(placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personalize() {
        let alice = Customer::new("1", "Alice").with_email("alice@example.com");
        assert_eq!(
            personalize("Hi [Name], here's 10% off on your next order!", &alice),
            "Hi Alice, here's 10% off on your next order!"
        );
        assert_eq!(
            personalize("[Name] <[Email]> / [Name]", &alice),
            "Alice <alice@example.com> / Alice"
        );
    }

    #[test]
    fn test_missing_email_and_plain_text() {
        let bob = Customer::new("2", "Bob");
        assert_eq!(personalize("Reach [Name] at [Email].", &bob), "Reach Bob at .");
        assert_eq!(personalize("No placeholders", &bob), "No placeholders");
    }
}
