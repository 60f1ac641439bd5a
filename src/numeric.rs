const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_F64: f64 = 9_223_372_036_854_775_807.0;
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v.fract().abs() < f64::EPSILON && (I64_MIN_F64..=I64_MAX_F64).contains(&v) {
        if v == 0.0 {
            "0".to_string()
        } else {
            format!("{v:.0}")
        }
    } else {
        let mut s = format!("{v}");
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        s
    }
}
#[allow(
    clippy::cast_precision_loss,
    clippy::as_conversions,
    reason = "spreadsheet numbers are f64"
)]
pub const fn i64_to_f64(v: i64) -> f64 {
    v as f64
}
