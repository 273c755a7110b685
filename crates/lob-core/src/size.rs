//! Human-readable rendering of file sizes for the growth report.
//!
//! The first tier divides by 1028 and every later tier by 1000. The odd
//! divisor is kept so output lines up with earlier growth reports.

/// Divisor applied to go from bytes to kilobytes.
pub const FIRST_TIER_DIVISOR: u64 = 1028;

/// Divisor applied between every later tier.
pub const TIER_DIVISOR: u64 = 1000;

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Render a byte count as `"<n> <unit>"` using the 1028/1000 ladder.
///
/// Integer division truncates at every step; anything past terabytes stays in TB.
#[must_use]
pub fn bytes_description(size: u64) -> String {
    if size < FIRST_TIER_DIVISOR {
        return format!("{size} B");
    }

    let mut scaled = size / FIRST_TIER_DIVISOR;
    for (idx, unit) in UNITS.iter().enumerate() {
        let last = idx == UNITS.len() - 1;
        if scaled < TIER_DIVISOR || last {
            return format!("{scaled} {unit}");
        }
        scaled /= TIER_DIVISOR;
    }
    unreachable!("the TB tier always returns")
}

/// Check that a rendered size matches the ladder's `"<digits> <unit>"` shape.
#[must_use]
pub fn is_well_formed(description: &str) -> bool {
    let Some((number, unit)) = description.split_once(' ') else {
        return false;
    };
    !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
        && (unit == "B" || UNITS.contains(&unit))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "0 B")]
    #[case(500, "500 B")]
    #[case(1027, "1027 B")]
    #[case(1028, "1 KB")]
    #[case(1028 * 999, "999 KB")]
    #[case(1028 * 1000, "1 MB")]
    #[case(1028 * 1028, "1 MB")]
    #[case(1028 * 1000 * 1000, "1 GB")]
    #[case(1028 * 1000 * 1000 * 1000, "1 TB")]
    #[case(1028 * 1000 * 1000 * 1000 * 5000, "5000 TB")]
    fn ladder(#[case] size: u64, #[case] expected: &str) {
        assert_eq!(bytes_description(size), expected);
    }

    #[test]
    fn first_tier_uses_1028() {
        // 1024 bytes would be 1 KB under a binary ladder.
        assert_eq!(bytes_description(1024), "1024 B");
        assert_eq!(bytes_description(1028 * 1028 - 1), "1027 KB");
    }

    #[test]
    fn well_formed_descriptions() {
        assert!(is_well_formed("500 B"));
        assert!(is_well_formed("12 MB"));
        assert!(!is_well_formed("12MB"));
        assert!(!is_well_formed("12 PB"));
        assert!(!is_well_formed(" KB"));
    }
}
