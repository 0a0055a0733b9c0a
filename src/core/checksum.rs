/// Luhn checksum for 16-digit card numbers

use crate::core::patterns::CARD_DIGITS;

/// Check a card number against the Luhn algorithm
///
/// Fails straight away on any character that is not an ASCII digit, and on
/// anything other than exactly 16 digits. Separators must already be
/// stripped (see `patterns::normalize`).
pub fn luhn_check(digits: &str) -> bool {
    if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.len() != CARD_DIGITS {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_good_numbers() {
        for number in [
            "4111111111111111",
            "5555555555554444",
            "4242424242424242",
            "4000056655665556",
            "6011111111111117",
        ] {
            assert!(luhn_check(number), "{} should pass", number);
        }
    }

    #[test]
    fn test_bad_check_digit() {
        assert!(!luhn_check("4111111111111112"));
        assert!(!luhn_check("5555555555554445"));
    }

    #[test]
    fn test_length_must_be_sixteen() {
        // Valid Luhn sums, wrong lengths
        assert!(!luhn_check("378282246310005"));
        assert!(!luhn_check("0"));
        assert!(!luhn_check(""));
        assert!(!luhn_check("41111111111111110"));
    }

    #[test]
    fn test_non_digits_fail() {
        assert!(!luhn_check("4111-1111-1111-1111"));
        assert!(!luhn_check("411111111111111a"));
        assert!(!luhn_check("４１１１１１１１１１１１１１１１"));
    }

    #[test]
    fn test_input_untouched() {
        let number = String::from("4111111111111111");
        let before = number.clone();
        luhn_check(&number);
        assert_eq!(number, before);
    }
}
