//! # Validation Module
//!
//! Field validators shared by the vehicle and renter builders.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end (CLI flags / web form)                             │
//! │  └── Type parsing only (numbers, booleans)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Per-field checks (length, charset, range)                         │
//! │  └── Normalisation (trim, upper-case codes, round money)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Entity builders (vehicle.rs / renter.rs)                     │
//! │  └── Cross-field checks (year vs. rate)                                │
//! │                                                                         │
//! │  Every failure is ValidationError::InvalidFieldValue                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators return the normalised value so builders can store exactly what
//! was checked.

use chrono::{Datelike, NaiveDate};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::period::parse_date;

/// Oldest model year accepted for a vehicle.
pub const MIN_VEHICLE_YEAR: i32 = 1990;

/// Newest model year accepted for a vehicle.
pub const MAX_VEHICLE_YEAR: i32 = 2030;

/// Highest daily rate accepted for any vehicle ($10,000.00).
pub const MAX_DAILY_RATE: Money = Money::from_cents(1_000_000);

/// Image used when none (or an unsupported one) is supplied.
pub const DEFAULT_IMAGE: &str = "default.jpg";

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

// =============================================================================
// Generic Helpers
// =============================================================================

/// Trims `value` and rejects it when empty.
pub fn require_text(field: &str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::field(field, value, "must be a non-empty string"));
    }
    Ok(trimmed.to_string())
}

/// Trims `value` and checks its length in characters.
pub fn text_in_range(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<String> {
    let trimmed = require_text(field, value)?;
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ValidationError::field(
            field,
            trimmed,
            format!("must be {}-{} characters long", min, max),
        ));
    }
    Ok(trimmed)
}

/// Validates an entity id: 2-20 characters of letters, digits, `_` or `-`.
///
/// ```rust
/// use rental_core::validation::validate_identifier;
///
/// assert!(validate_identifier("vehicle_id", "CAR001").is_ok());
/// assert!(validate_identifier("vehicle_id", "C").is_err());
/// assert!(validate_identifier("vehicle_id", "CAR 001").is_err());
/// ```
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<String> {
    let id = text_in_range(field, value, 2, 20)?;
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::field(field, id, "invalid characters"));
    }
    Ok(id)
}

/// Upper-cases a code and checks it against a charset.
fn upper_code(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    extra: &[char],
    charset_reason: &str,
) -> ValidationResult<String> {
    let code = text_in_range(field, value, min, max)?.to_uppercase();
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || extra.contains(&c))
    {
        return Err(ValidationError::field(field, code, charset_reason));
    }
    Ok(code)
}

// =============================================================================
// Vehicle Fields
// =============================================================================

pub fn validate_make(make: &str) -> ValidationResult<String> {
    text_in_range("make", make, 2, 50)
}

pub fn validate_model(model: &str) -> ValidationResult<String> {
    let model = require_text("model", model)?;
    if model.chars().count() > 50 {
        return Err(ValidationError::field("model", model, "cannot exceed 50 characters"));
    }
    Ok(model)
}

pub fn validate_year(year: i32) -> ValidationResult<i32> {
    if !(MIN_VEHICLE_YEAR..=MAX_VEHICLE_YEAR).contains(&year) {
        return Err(ValidationError::field(
            "year",
            year.to_string(),
            format!("must be between {}-{}", MIN_VEHICLE_YEAR, MAX_VEHICLE_YEAR),
        ));
    }
    Ok(year)
}

/// Daily rates must be positive and at most [`MAX_DAILY_RATE`]. `Money` is
/// already whole cents.
///
/// The cap keeps `rate × days × premium` inside `i64` for any period the
/// year range allows.
pub fn validate_daily_rate(rate: Money) -> ValidationResult<Money> {
    if !rate.is_positive() {
        return Err(ValidationError::field("daily_rate", rate.to_string(), "must be positive"));
    }
    if rate > MAX_DAILY_RATE {
        return Err(ValidationError::field(
            "daily_rate",
            rate.to_string(),
            format!("must not exceed {}", MAX_DAILY_RATE),
        ));
    }
    Ok(rate)
}

/// Rejects year/rate combinations that point at a data-entry mistake.
///
/// ## Rules (Y = current year)
/// ```text
/// year >  Y        → rate ≥ $50.00    (future models are never budget)
/// year <  2000     → rate ≤ $200.00   (no premium pricing on old stock)
/// year >= Y - 2    → rate ≤ $500.00   (sanity cap on new vehicles)
/// year <  Y - 10   → rate ≥ $20.00    (very old and very cheap is a typo)
/// ```
pub fn validate_year_vs_rate(year: i32, rate: Money, current_year: i32) -> ValidationResult<()> {
    let reject = |reason: &str| Err(ValidationError::field("daily_rate", rate.to_string(), reason));

    if year > current_year && rate < Money::from_major_minor(50, 0) {
        return reject("future model vehicles must have higher rates (minimum $50)");
    }
    if year < 2000 && rate > Money::from_major_minor(200, 0) {
        return reject("vehicles older than 2000 cannot have premium rates");
    }
    if year >= current_year - 2 && rate > Money::from_major_minor(500, 0) {
        return reject("daily rate exceeds reasonable limit for new vehicles");
    }
    if year < current_year - 10 && rate < Money::from_major_minor(20, 0) {
        return reject("daily rate too low for vehicle age (minimum $20)");
    }
    Ok(())
}

/// Keeps a supported image filename, otherwise falls back to the default.
pub fn normalize_image(filename: Option<&str>) -> String {
    match filename.map(str::trim) {
        Some(name) if !name.is_empty() => {
            let lower = name.to_lowercase();
            if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                name.to_string()
            } else {
                DEFAULT_IMAGE.to_string()
            }
        }
        _ => DEFAULT_IMAGE.to_string(),
    }
}

pub fn validate_engine_cc(cc: u32) -> ValidationResult<u32> {
    if !(50..=2000).contains(&cc) {
        return Err(ValidationError::field(
            "engine_cc",
            cc.to_string(),
            "must be between 50-2000cc",
        ));
    }
    Ok(cc)
}

/// Load capacity in tonnes, `(0, 50]`, rounded to two decimals.
pub fn validate_load_capacity(tonnes: f64) -> ValidationResult<f64> {
    if !tonnes.is_finite() || tonnes <= 0.0 || tonnes > 50.0 {
        return Err(ValidationError::field(
            "load_capacity",
            tonnes.to_string(),
            "must be greater than 0 and at most 50 tonnes",
        ));
    }
    Ok((tonnes * 100.0).round() / 100.0)
}

// =============================================================================
// Renter Fields
// =============================================================================

/// Names: 2-100 characters of letters, spaces, apostrophes, hyphens, dots.
pub fn validate_person_name(name: &str) -> ValidationResult<String> {
    let name = text_in_range("name", name, 2, 100)?;
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-' || c == '.')
    {
        return Err(ValidationError::field(
            "name",
            name,
            "can only contain letters, spaces, apostrophes, hyphens, and dots",
        ));
    }
    Ok(name)
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

fn is_phone(value: &str) -> bool {
    let body = value.strip_prefix('+').unwrap_or(value);
    let len = body.chars().count();
    (7..=20).contains(&len)
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || " -()".contains(c))
}

/// Contact details must look like an email address or a phone number.
///
/// ```rust
/// use rental_core::validation::validate_contact;
///
/// assert!(validate_contact("ana@example.com").is_ok());
/// assert!(validate_contact("+61 (02) 5550-1234").is_ok());
/// assert!(validate_contact("call me").is_err());
/// ```
pub fn validate_contact(contact: &str) -> ValidationResult<String> {
    let contact = require_text("contact_info", contact)?;
    if is_email(&contact) || is_phone(&contact) {
        return Ok(contact);
    }
    Err(ValidationError::field(
        "contact_info",
        contact,
        "must be a valid email or phone number",
    ))
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Date of birth as `DD-MM-YYYY`; the renter must be 18 to 120.
pub fn validate_date_of_birth(dob: &str, today: NaiveDate) -> ValidationResult<NaiveDate> {
    let raw = require_text("date_of_birth", dob)?;
    let date = parse_date(&raw)
        .map_err(|_| ValidationError::field("date_of_birth", raw.as_str(), "must be in DD-MM-YYYY format"))?;

    if date > today {
        return Err(ValidationError::field("date_of_birth", raw, "cannot be in the future"));
    }
    let age = age_on(date, today);
    if age < 18 {
        return Err(ValidationError::field(
            "date_of_birth",
            raw,
            "user must be at least 18 years old",
        ));
    }
    if age > 120 {
        return Err(ValidationError::field("date_of_birth", raw, "invalid birth date"));
    }
    Ok(date)
}

pub fn validate_license_number(license: &str) -> ValidationResult<String> {
    upper_code(
        "license_number",
        license,
        5,
        20,
        &[],
        "can only contain letters and numbers",
    )
}

pub fn validate_company_name(name: &str) -> ValidationResult<String> {
    let name = text_in_range("company_name", name, 2, 200)?;
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || " '-.&(),".contains(c))
    {
        return Err(ValidationError::field("company_name", name, "invalid characters"));
    }
    Ok(name)
}

pub fn validate_registration(registration: &str) -> ValidationResult<String> {
    upper_code(
        "business_registration",
        registration,
        5,
        30,
        &['-', '/'],
        "can only contain letters, numbers, hyphens, and slashes",
    )
}

pub fn validate_billing_address(address: &str) -> ValidationResult<String> {
    text_in_range("billing_address", address, 10, 500)
}

pub fn validate_employee_id(employee_id: &str) -> ValidationResult<String> {
    upper_code(
        "employee_id",
        employee_id,
        3,
        20,
        &['-'],
        "can only contain letters, numbers, and hyphens",
    )
}

/// Credentials only need to be present; strength rules are a front-end concern.
pub fn validate_secret(secret: &str) -> ValidationResult<()> {
    if secret.is_empty() {
        return Err(ValidationError::field("password", "", "must be a non-empty string"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_validate_identifier() {
        assert_eq!(validate_identifier("vehicle_id", "  CAR001 ").unwrap(), "CAR001");
        assert!(validate_identifier("vehicle_id", "").is_err());
        assert!(validate_identifier("vehicle_id", &"A".repeat(21)).is_err());
        assert!(validate_identifier("vehicle_id", "CAR#1").is_err());
    }

    #[test]
    fn test_vehicle_fields() {
        assert!(validate_make("T").is_err());
        assert_eq!(validate_make(" Toyota ").unwrap(), "Toyota");
        assert!(validate_model("").is_err());
        assert!(validate_model(&"M".repeat(51)).is_err());
        assert!(validate_year(1989).is_err());
        assert!(validate_year(2031).is_err());
        assert_eq!(validate_year(2022).unwrap(), 2022);
        assert!(validate_daily_rate(Money::zero()).is_err());
        assert!(validate_daily_rate(Money::from_cents(-100)).is_err());
        assert_eq!(validate_daily_rate(MAX_DAILY_RATE).unwrap(), MAX_DAILY_RATE);
        assert!(validate_daily_rate(Money::from_cents(MAX_DAILY_RATE.cents() + 1)).is_err());
        assert!(validate_daily_rate(Money::from_cents(1_000_000_000_000_000_000)).is_err());
    }

    #[test]
    fn test_year_vs_rate() {
        let rate = |d| Money::from_major_minor(d, 0);
        assert!(validate_year_vs_rate(2026, rate(40), 2025).is_err());
        assert!(validate_year_vs_rate(2026, rate(60), 2025).is_ok());
        assert!(validate_year_vs_rate(1995, rate(250), 2025).is_err());
        assert!(validate_year_vs_rate(2024, rate(600), 2025).is_err());
        assert!(validate_year_vs_rate(2010, rate(15), 2025).is_err());
        assert!(validate_year_vs_rate(2022, rate(65), 2025).is_ok());
    }

    #[test]
    fn test_normalize_image() {
        assert_eq!(normalize_image(Some("camry.PNG")), "camry.PNG");
        assert_eq!(normalize_image(Some("camry.bmp")), DEFAULT_IMAGE);
        assert_eq!(normalize_image(Some("  ")), DEFAULT_IMAGE);
        assert_eq!(normalize_image(None), DEFAULT_IMAGE);
    }

    #[test]
    fn test_load_capacity_rounds() {
        assert_eq!(validate_load_capacity(3.456).unwrap(), 3.46);
        assert!(validate_load_capacity(0.0).is_err());
        assert!(validate_load_capacity(50.01).is_err());
        assert!(validate_load_capacity(f64::NAN).is_err());
    }

    #[test]
    fn test_person_name() {
        assert!(validate_person_name("Mary-Jane O'Neil Jr.").is_ok());
        assert!(validate_person_name("R2D2").is_err());
        assert!(validate_person_name("A").is_err());
    }

    #[test]
    fn test_contact() {
        assert!(validate_contact("first.last+tag@mail.example.org").is_ok());
        assert!(validate_contact("0412 345 678").is_ok());
        assert!(validate_contact("user@localhost").is_err());
        assert!(validate_contact("12345").is_err());
    }

    #[test]
    fn test_date_of_birth() {
        assert!(validate_date_of_birth("15-06-1990", today()).is_ok());
        // Turns 18 tomorrow.
        assert!(validate_date_of_birth("02-12-2007", today()).is_err());
        assert!(validate_date_of_birth("01-12-2007", today()).is_ok());
        assert!(validate_date_of_birth("01-01-2030", today()).is_err());
        assert!(validate_date_of_birth("1990-06-15", today()).is_err());
    }

    #[test]
    fn test_upper_codes() {
        assert_eq!(validate_license_number("dl12345").unwrap(), "DL12345");
        assert!(validate_license_number("DL-12345").is_err());
        assert_eq!(validate_registration("abn-123/45").unwrap(), "ABN-123/45");
        assert_eq!(validate_employee_id("emp-01").unwrap(), "EMP-01");
        assert!(validate_employee_id("E1").is_err());
    }

    #[test]
    fn test_company_and_address() {
        assert!(validate_company_name("Acme (Pty) Ltd.").is_ok());
        assert!(validate_company_name("Acme <script>").is_err());
        assert!(validate_billing_address("1 Short").is_err());
        assert!(validate_billing_address("1 Long Street, Sydney").is_ok());
    }
}
