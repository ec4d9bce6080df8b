//! Shared number-to-string rendering.
//!
//! Lox has a single numeric type (`f64`) but three different textual renderings of it
//! depending on who is asking:
//! - `stringify` (used by `print` and the `evaluate` subcommand) drops the trailing
//!   `.0` for integral values.
//! - the `tokenize` subcommand and the AST printer both render integral values as
//!   `N.0`.
//! - non-integral values always use the shortest round-trip decimal representation,
//!   via `ryu`.

/// Renders a number the way `print`/`evaluate` output does: integral values have no
/// fractional part.
#[must_use]
pub fn format_stringify(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value + 0.0)
    } else {
        shortest(value)
    }
}

/// Renders a number the way the scanner's `tokenize` output and the AST printer do:
/// integral values always keep a single trailing zero (`N.0`).
#[must_use]
pub fn format_tokenize(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value + 0.0)
    } else {
        shortest(value)
    }
}

/// Shortest round-trip decimal rendering for non-integral finite values. `ryu` does
/// not support NaN/infinity, so those are handled by the caller before reaching here.
fn shortest(value: f64) -> String {
    let mut buf = ryu::Buffer::new();
    buf.format(value).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_drops_trailing_zero() {
        assert_eq!(format_stringify(3.0), "3");
        assert_eq!(format_stringify(-0.0), "0");
    }

    #[test]
    fn stringify_keeps_fraction() {
        assert_eq!(format_stringify(1.5), "1.5");
    }

    #[test]
    fn tokenize_keeps_trailing_zero() {
        assert_eq!(format_tokenize(3.0), "3.0");
        assert_eq!(format_tokenize(10.0), "10.0");
    }

    #[test]
    fn tokenize_non_integral_matches_stringify() {
        assert_eq!(format_tokenize(1.5), "1.5");
    }
}
