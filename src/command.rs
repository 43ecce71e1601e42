//! Console command parsing.
//!
//! One line becomes one [`Command`]. Matching is case-sensitive:
//!
//! | line        | command                 |
//! |-------------|-------------------------|
//! | `x...`      | [`Command::Exit`]       |
//! | `pbsw`      | [`Command::Status`]     |
//! | `init<hex>` | [`Command::Load`]       |
//! | `test<dec>` | [`Command::Test`]       |
//! | `s...`      | [`Command::Step`]       |
//! | `isr`       | [`Command::ToggleSampler`] |
//!
//! Numeric arguments start right after the four-letter token and are read
//! the way `scanf` would: leading whitespace skipped, an optional sign, the
//! longest run of digits taken, anything after it ignored.

use crate::error::{ArgumentError, ExerciserError};

/// Console line capacity, terminator included.
pub const LINE_CAPACITY: usize = 64;

/// Largest value accepted by `init`.
pub const MAX_SEED: u32 = 0xff;

const TOKEN_LEN: usize = 4;

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Report tick state and OUTPUT status bits.
    Status,
    /// Load a seed into SEED.
    Load(u8),
    /// Run a capture test.
    ///
    /// Argument errors are carried rather than raised so the sampler check
    /// can report first.
    Test(Result<u32, ArgumentError>),
    /// Pulse TRIGGER once and report SEED.
    Step,
    /// Start or stop the periodic sampler.
    ToggleSampler,
}

/// Parses one sanitized console line.
pub fn parse_line(line: &str) -> Result<Command, ExerciserError> {
    if line.starts_with('x') {
        return Ok(Command::Exit);
    }
    if line == "pbsw" {
        return Ok(Command::Status);
    }
    if line.starts_with("init") {
        let seed = numeric_argument(line, 16)?;
        if seed > MAX_SEED {
            return Err(ArgumentError::Range(seed).into());
        }
        return Ok(Command::Load(seed as u8));
    }
    if line.starts_with("test") {
        return Ok(Command::Test(numeric_argument(line, 10)));
    }
    if line.starts_with('s') {
        return Ok(Command::Step);
    }
    if line == "isr" {
        return Ok(Command::ToggleSampler);
    }
    Err(ExerciserError::UnknownCommand)
}

/// Strips a raw console read down to the command text.
///
/// Stops at the first NUL, `\n` or `\r`, keeps at most
/// `LINE_CAPACITY - 1` bytes, and drops any trailing partial UTF-8 sequence.
pub fn sanitize_line(raw: &[u8]) -> &str {
    let raw = &raw[..raw.len().min(LINE_CAPACITY - 1)];
    let end = raw
        .iter()
        .position(|&b| matches!(b, b'\0' | b'\n' | b'\r'))
        .unwrap_or(raw.len());
    let raw = &raw[..end];
    match core::str::from_utf8(raw) {
        Ok(line) => line,
        Err(err) => core::str::from_utf8(&raw[..err.valid_up_to()]).unwrap_or_default(),
    }
}

fn numeric_argument(line: &str, radix: u32) -> Result<u32, ArgumentError> {
    if line.len() <= TOKEN_LEN {
        return Err(ArgumentError::Length(line.len()));
    }
    scan_u32(&line[TOKEN_LEN..], radix).ok_or(ArgumentError::Format)
}

/// Reads a leading unsigned number in `radix`, `scanf` style.
///
/// A `-` sign negates with wraparound, so `-1` comes back as `u32::MAX`.
/// Overflowing values saturate at `u32::MAX`.
fn scan_u32(text: &str, radix: u32) -> Option<u32> {
    let mut rest = text.trim_start();
    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    if radix == 16 {
        if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            // "0x" without digits still reads as the leading zero
            if hex.starts_with(|c: char| c.is_ascii_hexdigit()) {
                rest = hex;
            }
        }
    }

    let digits = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].chars().fold(0u32, |acc, c| {
        // is_digit above guarantees to_digit succeeds
        let digit = c.to_digit(radix).unwrap_or(0);
        acc.saturating_mul(radix).saturating_add(digit)
    });

    Some(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_prefix_tokens() {
        assert_eq!(parse_line("x"), Ok(Command::Exit));
        assert_eq!(parse_line("xyzzy"), Ok(Command::Exit));
        assert_eq!(parse_line("pbsw"), Ok(Command::Status));
        assert_eq!(parse_line("s"), Ok(Command::Step));
        assert_eq!(parse_line("step"), Ok(Command::Step));
        assert_eq!(parse_line("isr"), Ok(Command::ToggleSampler));
    }

    #[test]
    fn exact_tokens_reject_suffixes() {
        assert_eq!(parse_line("pbsw2"), Err(ExerciserError::UnknownCommand));
        assert_eq!(parse_line("isr "), Err(ExerciserError::UnknownCommand));
        assert_eq!(parse_line("PBSW"), Err(ExerciserError::UnknownCommand));
        assert_eq!(parse_line("help"), Err(ExerciserError::UnknownCommand));
        assert_eq!(parse_line(" x"), Err(ExerciserError::UnknownCommand));
        assert_eq!(parse_line(""), Err(ExerciserError::UnknownCommand));
    }

    #[test]
    fn init_accepts_every_seed() {
        let mut line = heapless::String::<16>::new();
        for seed in 0..=MAX_SEED {
            line.clear();
            core::fmt::Write::write_fmt(&mut line, format_args!("init {seed:x}")).unwrap();
            assert_eq!(parse_line(&line), Ok(Command::Load(seed as u8)));
        }
    }

    #[test]
    fn init_hex_forms() {
        assert_eq!(parse_line("init ff"), Ok(Command::Load(0xff)));
        assert_eq!(parse_line("initA5"), Ok(Command::Load(0xa5)));
        assert_eq!(parse_line("init 0x1F"), Ok(Command::Load(0x1f)));
        assert_eq!(parse_line("init   7g"), Ok(Command::Load(0x7)));
        assert_eq!(parse_line("init 0xg"), Ok(Command::Load(0)));
    }

    #[test]
    fn init_rejections() {
        let invalid = |err| Err(ExerciserError::InvalidArgument(err));

        assert_eq!(parse_line("init"), invalid(ArgumentError::Length(4)));
        assert_eq!(parse_line("init zz"), invalid(ArgumentError::Format));
        assert_eq!(parse_line("init "), invalid(ArgumentError::Format));
        assert_eq!(parse_line("init 100"), invalid(ArgumentError::Range(0x100)));
        assert_eq!(
            parse_line("init -1"),
            invalid(ArgumentError::Range(u32::MAX))
        );
        assert_eq!(
            parse_line("init fffffffff"),
            invalid(ArgumentError::Range(u32::MAX))
        );
    }

    #[test]
    fn test_argument_is_carried() {
        assert_eq!(parse_line("test 5"), Ok(Command::Test(Ok(5))));
        assert_eq!(parse_line("test999"), Ok(Command::Test(Ok(999))));
        assert_eq!(parse_line("test 12abc"), Ok(Command::Test(Ok(12))));
        assert_eq!(
            parse_line("test"),
            Ok(Command::Test(Err(ArgumentError::Length(4))))
        );
        assert_eq!(
            parse_line("test ff"),
            Ok(Command::Test(Err(ArgumentError::Format)))
        );
        // range is enforced where the run is validated
        assert_eq!(parse_line("test 1000"), Ok(Command::Test(Ok(1000))));
    }

    #[test]
    fn sanitize_strips_terminators() {
        assert_eq!(sanitize_line(b"pbsw\n"), "pbsw");
        assert_eq!(sanitize_line(b"isr\r\n"), "isr");
        assert_eq!(sanitize_line(b"init 1\0junk"), "init 1");
        assert_eq!(sanitize_line(b"\n"), "");
    }

    #[test]
    fn sanitize_truncates_to_capacity() {
        let long = [b'a'; 100];
        assert_eq!(sanitize_line(&long).len(), LINE_CAPACITY - 1);
    }

    #[test]
    fn sanitize_drops_invalid_utf8_tail() {
        assert_eq!(sanitize_line(b"test \xff5"), "test ");
    }
}
