//! Numeric display helpers shared by all table renderers.

/// Number of heat-map buckets above the minimum (buckets run 0..=10).
pub const HEAT_BUCKETS: u8 = 10;

/// Inserts `sep` every three digits from the right into the integer part of
/// a rendered number. The fractional part and any sign are left untouched.
pub fn group_thousands(text: &str, sep: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }
    let mut grouped = String::new();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push_str(sep);
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Heat-map bucket of `value` within `[min, max]`: zero at the column
/// minimum, clamped to [`HEAT_BUCKETS`] at the top. A constant column puts
/// every value in bucket zero.
pub fn heat_bucket(value: f64, min: f64, max: f64) -> u8 {
    if max <= min {
        return 0;
    }
    let bucket_size = (max - min) / f64::from(HEAT_BUCKETS);
    let bucket = ((value - min) / bucket_size).floor();
    if bucket < 0.0 {
        0
    } else if bucket >= f64::from(HEAT_BUCKETS) {
        HEAT_BUCKETS
    } else {
        bucket as u8
    }
}

/// Color-scale percentage for a bucket: the minimum is darkest (100) and
/// each bucket above it fades by ten points.
pub fn heat_intensity(bucket: u8) -> u8 {
    100 - 10 * bucket.min(HEAT_BUCKETS)
}

/// Rounds to one decimal place, the display precision of float columns.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_leaves_short_and_fractional_digits_alone() {
        assert_eq!(group_thousands("42", ","), "42");
        assert_eq!(group_thousands("1234567", ","), "1,234,567");
        assert_eq!(group_thousands("1234.5", ","), "1,234.5");
        assert_eq!(group_thousands("-1234", ","), "-1,234");
        assert_eq!(group_thousands("F20", ","), "F20");
    }

    #[test]
    fn bucket_boundaries_match_the_eleven_level_scale() {
        assert_eq!(heat_bucket(0.0, 0.0, 10.0), 0);
        assert_eq!(heat_bucket(5.0, 0.0, 10.0), 5);
        assert_eq!(heat_bucket(10.0, 0.0, 10.0), 10);
        assert_eq!(heat_intensity(0), 100);
        assert_eq!(heat_intensity(5), 50);
        assert_eq!(heat_intensity(10), 0);
    }

    #[test]
    fn constant_column_gets_full_intensity() {
        assert_eq!(heat_intensity(heat_bucket(7.0, 7.0, 7.0)), 100);
    }
}
