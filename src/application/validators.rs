use validator::ValidateEmail;

/// Column widths of the mirror schema, counted in characters.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PROVIDER_ID_LEN: usize = 50;

fn fits(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && fits(email, MAX_EMAIL_LEN) && email.validate_email()
}

/// Display names only need to contain something other than whitespace
pub fn is_valid_display_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && fits(name, MAX_NAME_LEN)
}

/// Provider price ids end up in `subscriptions.plan_id`
pub fn is_valid_price_id(price_id: &str) -> bool {
    let price_id = price_id.trim();
    !price_id.is_empty() && fits(price_id, MAX_PROVIDER_ID_LEN)
}

/// Three ASCII letters, e.g. "usd"
pub fn is_valid_currency(currency: &str) -> bool {
    currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic())
}
