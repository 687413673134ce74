//! Console I/O handling
//!
//! Input is read as whitespace-separated tokens. Doubles are printed in
//! `%g` style.

use std::io::{self, BufRead};

/// Significant digits used when printing doubles
const PRINT_PRECISION: i32 = 6;

#[inline]
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Read the next whitespace-delimited token, or `None` at end of input
///
/// The whitespace byte that ends the token is left in the stream.
pub fn read_token<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<String>> {
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        let len = buf.len();
        let skip = buf.iter().take_while(|b| is_space(**b)).count();
        input.consume(skip);
        if skip < len {
            break;
        }
    }

    let mut token = Vec::new();
    loop {
        let buf = input.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let len = buf.len();
        let take = buf.iter().take_while(|b| !is_space(**b)).count();
        token.extend_from_slice(&buf[..take]);
        input.consume(take);
        if take < len {
            break;
        }
    }

    Ok(Some(String::from_utf8_lossy(&token).into_owned()))
}

/// Read a single byte, or `None` at end of input
pub fn read_byte<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Option<u8>> {
    let buf = input.fill_buf()?;
    let Some(&byte) = buf.first() else {
        return Ok(None);
    };
    input.consume(1);
    Ok(Some(byte))
}

/// Format a double the way `printf("%g")` does
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to the printed precision
    let scientific = format!("{:.*e}", (PRINT_PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= PRINT_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let fixed = format!("{:.*}", (PRINT_PRECISION - 1 - exponent) as usize, value);
        trim_fraction(&fixed).to_string()
    }
}

/// Drop trailing zeros of a fractional part, and the point if nothing is left
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
