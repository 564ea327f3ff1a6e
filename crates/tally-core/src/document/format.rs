/// Format a number for display.
///
/// Whole numbers print without a fraction; everything else is rounded to
/// `decimals` places.
pub fn format_number(n: f64, decimals: usize) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{:.*}", decimals, n)
    }
}
