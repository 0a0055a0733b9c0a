/// Issuer classification by BIN prefix
///
/// The prefix table is an ordered list evaluated top to bottom; the first
/// rule that matches wins.

use std::fmt;

/// Card network that issued a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issuer {
    Visa,
    Mir,
    MasterCard,
    AmericanExpress,
    DinersClub,
    Discover,
    Jcb,
    Unknown,
}

impl Issuer {
    /// Human-readable issuer name
    pub fn name(&self) -> &'static str {
        match self {
            Issuer::Visa => "Visa",
            Issuer::Mir => "Mir",
            Issuer::MasterCard => "MasterCard",
            Issuer::AmericanExpress => "American Express",
            Issuer::DinersClub => "Diners Club",
            Issuer::Discover => "Discover",
            Issuer::Jcb => "JCB",
            Issuer::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a rule inspects the leading digits of a BIN
#[derive(Debug, Clone, Copy)]
pub enum PrefixMatcher {
    /// First digit equals the given one
    FirstDigit(char),
    /// First two digits are one of the listed pairs
    FirstTwo(&'static [&'static str]),
}

impl PrefixMatcher {
    pub fn matches(&self, bin: &str) -> bool {
        match self {
            PrefixMatcher::FirstDigit(digit) => bin.starts_with(*digit),
            PrefixMatcher::FirstTwo(pairs) => bin
                .get(..2)
                .map(|first_two| pairs.contains(&first_two))
                .unwrap_or(false),
        }
    }
}

/// One entry of the issuer prefix table
#[derive(Debug, Clone, Copy)]
pub struct IssuerPrefixRule {
    pub matcher: PrefixMatcher,
    pub issuer: Issuer,
}

/// Fixed issuer table, in evaluation order
pub static ISSUER_PREFIX_RULES: &[IssuerPrefixRule] = &[
    IssuerPrefixRule { matcher: PrefixMatcher::FirstDigit('4'), issuer: Issuer::Visa },
    IssuerPrefixRule { matcher: PrefixMatcher::FirstDigit('2'), issuer: Issuer::Mir },
    IssuerPrefixRule {
        matcher: PrefixMatcher::FirstTwo(&["51", "52", "53", "54", "55"]),
        issuer: Issuer::MasterCard,
    },
    IssuerPrefixRule { matcher: PrefixMatcher::FirstTwo(&["34", "37"]), issuer: Issuer::AmericanExpress },
    IssuerPrefixRule { matcher: PrefixMatcher::FirstTwo(&["36", "38", "39"]), issuer: Issuer::DinersClub },
    IssuerPrefixRule {
        matcher: PrefixMatcher::FirstTwo(&["60", "62", "64", "65"]),
        issuer: Issuer::Discover,
    },
    IssuerPrefixRule { matcher: PrefixMatcher::FirstTwo(&["35"]), issuer: Issuer::Jcb },
];

/// Identify the issuer of a card from its BIN
///
/// Never fails: anything no rule recognizes is `Issuer::Unknown`.
pub fn classify_issuer(bin: &str) -> Issuer {
    ISSUER_PREFIX_RULES
        .iter()
        .find(|rule| rule.matcher.matches(bin))
        .map(|rule| rule.issuer)
        .unwrap_or(Issuer::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_prefixes() {
        let cases = [
            ("4111", Issuer::Visa),
            ("2200", Issuer::Mir),
            ("5100", Issuer::MasterCard),
            ("5555", Issuer::MasterCard),
            ("3400", Issuer::AmericanExpress),
            ("3782", Issuer::AmericanExpress),
            ("3600", Issuer::DinersClub),
            ("3890", Issuer::DinersClub),
            ("6011", Issuer::Discover),
            ("6200", Issuer::Discover),
            ("6500", Issuer::Discover),
            ("3530", Issuer::Jcb),
        ];
        for (bin, expected) in cases {
            assert_eq!(classify_issuer(bin), expected, "BIN {}", bin);
        }
    }

    #[test]
    fn test_unknown_is_total() {
        assert_eq!(classify_issuer("1234"), Issuer::Unknown);
        assert_eq!(classify_issuer("5600"), Issuer::Unknown);
        assert_eq!(classify_issuer("6100"), Issuer::Unknown);
        assert_eq!(classify_issuer("3"), Issuer::Unknown);
        assert_eq!(classify_issuer(""), Issuer::Unknown);
        assert_eq!(classify_issuer("ab"), Issuer::Unknown);
    }

    #[test]
    fn test_first_rule_wins() {
        // Single-digit rules sit ahead of the two-digit ones
        assert_eq!(classify_issuer("4"), Issuer::Visa);
        assert_eq!(classify_issuer("2"), Issuer::Mir);
        assert_eq!(ISSUER_PREFIX_RULES[0].issuer, Issuer::Visa);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Issuer::AmericanExpress.to_string(), "American Express");
        assert_eq!(Issuer::Jcb.to_string(), "JCB");
    }
}
