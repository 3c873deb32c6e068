use rust_decimal::Decimal;
use validator::ValidationError;

// Money columns are NUMERIC(15, 2).
pub const AMOUNT_SCALE: u32 = 2;

pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999_999, AMOUNT_SCALE)
}

/// Why an amount cannot be stored, if it cannot.
pub fn amount_problem(val: &Decimal) -> Option<(&'static str, &'static str)> {
    if val.is_sign_negative() && !val.is_zero() {
        return Some(("range", "Nilai tidak boleh negatif."));
    }
    if val.normalize().scale() > AMOUNT_SCALE {
        return Some(("scale", "Maksimal 2 angka di belakang koma."));
    }
    if *val > max_amount() {
        return Some(("range", "Nilai terlalu besar."));
    }
    None
}

pub fn validate_amount(val: &Decimal) -> Result<(), ValidationError> {
    match amount_problem(val) {
        Some((code, message)) => {
            let mut err = ValidationError::new(code);
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

// Wire names of a fixed value set: `as_str`, case-insensitive `FromStr`
// and the list of accepted values.
macro_rules! value_set {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn allowed_values() -> String {
                Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let needle = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| raw.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod assets;
pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod import;
pub mod losses;
pub mod sales;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_positive_amounts_pass() {
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(1500, 0)).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn amounts_must_fit_the_money_columns() {
        assert!(validate_amount(&max_amount()).is_ok());
        // Trailing zeros do not count as extra precision.
        assert!(validate_amount(&Decimal::new(15000, 3)).is_ok());

        let too_big = Decimal::new(99_999_999_999_999_999, 0);
        assert_eq!(validate_amount(&too_big).unwrap_err().code, "range");

        let too_precise = Decimal::new(1, 3);
        assert_eq!(validate_amount(&too_precise).unwrap_err().code, "scale");
    }
}
