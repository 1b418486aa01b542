//! Number list scanning for path data, point lists and transforms.

use crate::error::NumberSyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Separator,
    Integer,
    Fraction,
    Exponent,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_sign(c: char) -> bool {
    c == '-' || c == '+'
}

/// Flag positions and stride for arc argument lists.
///
/// Arc flags are single `0`/`1` characters that may be written without
/// separators, as in `a5 5 0 113 4`.
#[derive(Debug, Clone, Copy)]
pub struct FlagSlots<'a> {
    pub positions: &'a [usize],
    pub stride: usize,
}

/// Arc commands: seven numbers per segment, flags at positions 3 and 4.
pub const ARC_FLAGS: FlagSlots<'static> = FlagSlots {
    positions: &[3, 4],
    stride: 7,
};

struct Scanner {
    number: String,
    exponent: String,
    result: Vec<f32>,
}

impl Scanner {
    fn flush(&mut self) {
        if !self.number.is_empty() {
            let mantissa = self.number.parse::<f64>().unwrap_or(f64::NAN);
            let value = if self.exponent.is_empty() {
                mantissa
            } else {
                let exponent = self.exponent.parse::<f64>().unwrap_or(f64::NAN);
                mantissa * 10f64.powf(exponent)
            };
            self.result.push(value as f32);
        }
        self.number.clear();
        self.exponent.clear();
    }

    fn fail(&self, character: char, index: usize) -> NumberSyntaxError {
        NumberSyntaxError {
            character,
            index,
            partial: self.result.clone(),
        }
    }
}

/// Parse a list of numbers separated by whitespace, commas or signs.
///
/// `"10-20"` is two numbers, `".5.5"` is two numbers. Double commas, double
/// signs, double decimal points and double exponent signs are errors.
pub fn parse_floats(input: &str, flags: Option<FlagSlots<'_>>) -> Result<Vec<f32>, NumberSyntaxError> {
    let mut state = State::Separator;
    let mut seen_comma = true;
    let mut s = Scanner {
        number: String::new(),
        exponent: String::new(),
        result: Vec::new(),
    };

    for (index, current) in input.chars().enumerate() {
        if let Some(flags) = flags {
            if flags.positions.contains(&(s.result.len() % flags.stride)) && matches!(current, '0' | '1') {
                state = State::Integer;
                s.number.clear();
                s.number.push(current);
                s.flush();
                continue;
            }
        }

        if state == State::Separator {
            if is_whitespace(current) {
                continue;
            }
            if current.is_ascii_digit() || is_sign(current) {
                state = State::Integer;
                s.number.push(current);
                continue;
            }
            if current == '.' {
                state = State::Fraction;
                s.number.push(current);
                continue;
            }
            if current == ',' {
                if seen_comma {
                    return Err(s.fail(current, index));
                }
                seen_comma = true;
            }
        }

        if state == State::Integer {
            if current.is_ascii_digit() {
                s.number.push(current);
                continue;
            }
            if current == '.' {
                s.number.push(current);
                state = State::Fraction;
                continue;
            }
            if current == 'e' || current == 'E' {
                state = State::Exponent;
                continue;
            }
            if is_sign(current) && s.number.len() == 1 && s.number.starts_with(is_sign) {
                return Err(s.fail(current, index));
            }
        }

        if state == State::Fraction {
            if current.is_ascii_digit() {
                s.number.push(current);
                continue;
            }
            if current == 'e' || current == 'E' {
                state = State::Exponent;
                continue;
            }
            if current == '.' && s.number.ends_with('.') {
                return Err(s.fail(current, index));
            }
        }

        if state == State::Exponent {
            if current.is_ascii_digit() {
                s.exponent.push(current);
                continue;
            }
            if is_sign(current) {
                if s.exponent.is_empty() {
                    s.exponent.push(current);
                    continue;
                }
                if s.exponent.len() == 1 && s.exponent.starts_with(is_sign) {
                    return Err(s.fail(current, index));
                }
            }
        }

        // End of the current number.
        if is_whitespace(current) {
            s.flush();
            state = State::Separator;
            seen_comma = false;
        } else if current == ',' {
            s.flush();
            state = State::Separator;
            seen_comma = true;
        } else if is_sign(current) {
            s.flush();
            state = State::Integer;
            s.number.push(current);
        } else if current == '.' {
            s.flush();
            state = State::Fraction;
            s.number.push(current);
        } else {
            return Err(s.fail(current, index));
        }
    }

    s.flush();
    Ok(s.result)
}

/// Parse the leading number of `input`, ignoring trailing text.
///
/// Returns NaN when no number is present.
pub fn lenient_float(input: &str) -> f32 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || (end == digits_start + 1 && bytes[digits_start] == b'.') {
        return f32::NAN;
    }

    // Only take an exponent that has digits.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f32>().unwrap_or(f32::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        assert_eq!(parse_floats("1 2,3\t4\n5", None).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(parse_floats("10-20+5", None).unwrap(), vec![10.0, -20.0, 5.0]);
        assert_eq!(parse_floats(".5.5", None).unwrap(), vec![0.5, 0.5]);
        assert_eq!(parse_floats("  ", None).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_exponents() {
        assert_eq!(parse_floats("1e2 -2.5E-1", None).unwrap(), vec![100.0, -0.25]);
    }

    #[test]
    fn test_double_decimal_point_is_an_error() {
        let err = parse_floats("1..2", None).unwrap_err();
        assert_eq!(err.character, '.');
        assert_eq!(err.index, 2);
        assert!(err.partial.is_empty());
    }

    #[test]
    fn test_error_keeps_partial_result() {
        let err = parse_floats("3 4,,5", None).unwrap_err();
        assert_eq!(err.character, ',');
        assert_eq!(err.index, 4);
        assert_eq!(err.partial, vec![3.0, 4.0]);
    }

    #[test]
    fn test_leading_comma_is_an_error() {
        assert!(parse_floats(",1", None).is_err());
    }

    #[test]
    fn test_double_sign_is_an_error() {
        assert!(parse_floats("-+1", None).is_err());
        assert!(parse_floats("1e+-2", None).is_err());
    }

    #[test]
    fn test_unexpected_letter() {
        let err = parse_floats("1 x", None).unwrap_err();
        assert_eq!(err.character, 'x');
        assert_eq!(err.partial, vec![1.0]);
    }

    #[test]
    fn test_compact_arc_flags() {
        let numbers = parse_floats("5 5 0 113 4", Some(ARC_FLAGS)).unwrap();
        assert_eq!(numbers, vec![5.0, 5.0, 0.0, 1.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_lenient_float() {
        assert_eq!(lenient_float("12.5px"), 12.5);
        assert_eq!(lenient_float(" -3"), -3.0);
        assert_eq!(lenient_float("2e3x"), 2000.0);
        assert_eq!(lenient_float("4em"), 4.0);
        assert!(lenient_float("abc").is_nan());
        assert!(lenient_float("").is_nan());
    }
}
