/// Insert thousands separators into a run of integer digits.
fn with_commas(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let grouped = with_commas(int_part);
    if negative {
        format!("-${grouped}.{dec_part}")
    } else {
        format!("${grouped}.{dec_part}")
    }
}

/// Format a row count with thousands separators: 1,234
pub fn number(val: usize) -> String {
    with_commas(&val.to_string())
}
