//! Sensor line codec (controller → host).
//!
//! Wire format:
//! ```text
//! <temperature>,<humidity>,<lightADC>\n
//!     25.30    ,  48.00   ,   612
//! ```
//!
//! Floats go out with two decimal places, the precision the controller's
//! serial print routine uses by default.  The light field is an integer ADC
//! reading (0 – 1023 on a 10-bit converter).
//!
//! [`LineDecoder`] accumulates incoming bytes and yields complete lines.
//! A single transport read may return part of a line or several lines
//! concatenated; both are handled.

use core::fmt::Write as _;

use crate::error::LineError;

/// Maximum accepted line length, terminator excluded.
pub const MAX_LINE_LEN: usize = 64;

/// Capacity of a formatted outbound line (`-40.00,100.00,65535\n` fits).
pub const LINE_CAPACITY: usize = 32;

/// One reading as produced by a controller cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Air temperature (°C).
    pub temperature: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// Raw light-sensor ADC value.
    pub light_raw: u16,
}

impl SensorReading {
    pub fn new(temperature: f32, humidity: f32, light_raw: u16) -> Self {
        Self {
            temperature,
            humidity,
            light_raw,
        }
    }
}

/// Format a reading into its wire line, terminator included.
///
/// Fails with [`LineError::TooLong`] when the numbers do not fit
/// [`LINE_CAPACITY`]; nothing partial is ever returned.
pub fn format_line(reading: &SensorReading) -> Result<heapless::String<LINE_CAPACITY>, LineError> {
    let mut line = heapless::String::new();
    writeln!(
        line,
        "{:.2},{:.2},{}",
        reading.temperature, reading.humidity, reading.light_raw
    )
    .map_err(|_| LineError::TooLong)?;
    Ok(line)
}

/// Parse one line (terminator optional) into a reading.
///
/// The line must split into exactly three comma-separated fields; the
/// first two finite decimals, the third an unsigned integer.
pub fn parse_line(line: &str) -> Result<SensorReading, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineError::Empty);
    }

    let mut fields = [""; 3];
    let mut count = 0;
    for field in line.split(',') {
        if count < fields.len() {
            fields[count] = field.trim();
        }
        count += 1;
    }
    if count != 3 {
        return Err(LineError::FieldCount(count));
    }

    let temperature = parse_finite(fields[0]).ok_or(LineError::BadTemperature)?;
    let humidity = parse_finite(fields[1]).ok_or(LineError::BadHumidity)?;
    let light_raw = fields[2].parse::<u16>().map_err(|_| LineError::BadLight)?;

    Ok(SensorReading {
        temperature,
        humidity,
        light_raw,
    })
}

/// `str::parse::<f32>` accepts "NaN" and "inf"; the wire format does not.
fn parse_finite(field: &str) -> Option<f32> {
    field.parse::<f32>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Streaming decoder
// ---------------------------------------------------------------------------

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Collecting bytes of the current line.
    Collecting,
    /// Current line overflowed; dropping bytes until the next `\n`.
    Discarding,
}

/// Streaming line decoder with a fixed-size buffer.
pub struct LineDecoder {
    state: DecoderState,
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    /// A `\r` seen but not yet known to be part of a CRLF terminator.
    held_cr: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            buf: heapless::Vec::new(),
            held_cr: false,
        }
    }

    /// Feed bytes into the decoder, invoking `on_line` once per complete
    /// line in arrival order.
    ///
    /// Blank lines are skipped.  A trailing `\r` is stripped.  An overlong
    /// line is reported once as [`LineError::TooLong`] and its remainder
    /// discarded up to the next terminator.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(Result<&str, LineError>)) {
        for &byte in data {
            match self.state {
                DecoderState::Discarding => {
                    if byte == b'\n' {
                        self.state = DecoderState::Collecting;
                    }
                }
                DecoderState::Collecting => match byte {
                    b'\n' => {
                        self.held_cr = false;
                        self.emit(&mut on_line);
                        self.buf.clear();
                    }
                    b'\r' => {
                        // A second `\r` makes the first one line content.
                        if core::mem::replace(&mut self.held_cr, true)
                            && self.buf.push(b'\r').is_err()
                        {
                            self.overflow(&mut on_line);
                        }
                    }
                    _ => {
                        let cr_fits =
                            !core::mem::take(&mut self.held_cr) || self.buf.push(b'\r').is_ok();
                        if !cr_fits || self.buf.push(byte).is_err() {
                            self.overflow(&mut on_line);
                        }
                    }
                },
            }
        }
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::Collecting;
        self.buf.clear();
        self.held_cr = false;
    }

    /// Bytes of an incomplete line currently held.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn overflow(&mut self, on_line: &mut impl FnMut(Result<&str, LineError>)) {
        self.buf.clear();
        self.held_cr = false;
        self.state = DecoderState::Discarding;
        on_line(Err(LineError::TooLong));
    }

    fn emit(&self, on_line: &mut impl FnMut(Result<&str, LineError>)) {
        let bytes = self.buf.as_slice();
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return;
        }
        match core::str::from_utf8(bytes) {
            Ok(line) => on_line(Ok(line)),
            Err(_) => on_line(Err(LineError::Encoding)),
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(decoder: &mut LineDecoder, data: &[u8]) -> Vec<Result<String, LineError>> {
        let mut out = Vec::new();
        decoder.feed(data, |r| out.push(r.map(str::to_owned)));
        out
    }

    #[test]
    fn formats_with_two_decimals() {
        let line = format_line(&SensorReading::new(25.3, 48.0, 612)).unwrap();
        assert_eq!(line.as_str(), "25.30,48.00,612\n");
    }

    #[test]
    fn oversized_reading_is_refused_not_truncated() {
        assert_eq!(
            format_line(&SensorReading::new(1e20, 48.0, 612)),
            Err(LineError::TooLong)
        );
        let widest = format_line(&SensorReading::new(-40.0, 100.0, u16::MAX)).unwrap();
        assert_eq!(widest.as_str(), "-40.00,100.00,65535\n");
    }

    #[test]
    fn parses_example_line() {
        let r = parse_line("25.3,48.0,612").unwrap();
        assert!((r.temperature - 25.3).abs() < 1e-4);
        assert!((r.humidity - 48.0).abs() < 1e-4);
        assert_eq!(r.light_raw, 612);
    }

    #[test]
    fn missing_field_is_rejected() {
        assert_eq!(parse_line("25.3,48.0"), Err(LineError::FieldCount(2)));
        assert_eq!(parse_line("1,2,3,4"), Err(LineError::FieldCount(4)));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert_eq!(parse_line("abc,48.0,612"), Err(LineError::BadTemperature));
        assert_eq!(parse_line("25.3,,612"), Err(LineError::BadHumidity));
        assert_eq!(parse_line("25.3,48.0,61.2"), Err(LineError::BadLight));
        assert_eq!(parse_line("25.3,48.0,-1"), Err(LineError::BadLight));
    }

    #[test]
    fn nan_and_infinity_are_rejected() {
        assert_eq!(parse_line("nan,48.0,612"), Err(LineError::BadTemperature));
        assert_eq!(parse_line("25.0,inf,612"), Err(LineError::BadHumidity));
    }

    #[test]
    fn whitespace_and_crlf_are_tolerated() {
        let r = parse_line(" 21.50 , 40.25 , 7 \r\n").unwrap();
        assert_eq!(r.light_raw, 7);
    }

    #[test]
    fn decoder_splits_concatenated_lines() {
        let mut d = LineDecoder::new();
        let out = collect(&mut d, b"25.30,48.00,612\r\n26.00,47.50,600\n");
        assert_eq!(
            out,
            vec![Ok("25.30,48.00,612".into()), Ok("26.00,47.50,600".into())]
        );
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn decoder_reassembles_partial_reads() {
        let mut d = LineDecoder::new();
        assert!(collect(&mut d, b"25.3").is_empty());
        assert!(collect(&mut d, b"0,48.0").is_empty());
        assert_eq!(collect(&mut d, b"0,612\n"), vec![Ok("25.30,48.00,612".into())]);
    }

    #[test]
    fn decoder_skips_blank_lines() {
        let mut d = LineDecoder::new();
        assert!(collect(&mut d, b"\n\r\n  \n").is_empty());
    }

    #[test]
    fn decoder_reports_overlong_line_once_and_recovers() {
        let mut d = LineDecoder::new();
        let long = [b'9'; MAX_LINE_LEN + 10];
        let out = collect(&mut d, &long);
        assert_eq!(out, vec![Err(LineError::TooLong)]);
        let out = collect(&mut d, b"999\n1.00,2.00,3\n");
        assert_eq!(out, vec![Ok("1.00,2.00,3".into())]);
    }

    #[test]
    fn crlf_terminator_does_not_count_toward_line_length() {
        let mut d = LineDecoder::new();
        let mut line = vec![b'7'; MAX_LINE_LEN];
        line.extend_from_slice(b"\r\n");
        let out = collect(&mut d, &line);
        assert_eq!(out, vec![Ok("7".repeat(MAX_LINE_LEN))]);

        let mut longer = vec![b'7'; MAX_LINE_LEN + 1];
        longer.extend_from_slice(b"\r\n");
        assert_eq!(collect(&mut d, &longer), vec![Err(LineError::TooLong)]);
    }

    #[test]
    fn carriage_return_split_across_reads() {
        let mut d = LineDecoder::new();
        assert!(collect(&mut d, b"1.00,2.00,3\r").is_empty());
        assert_eq!(collect(&mut d, b"\n"), vec![Ok("1.00,2.00,3".into())]);
        assert_eq!(collect(&mut d, b"a\rb\n"), vec![Ok("a\rb".into())]);
    }

    #[test]
    fn decoder_flags_binary_garbage() {
        let mut d = LineDecoder::new();
        let out = collect(&mut d, &[0xff, 0xfe, b'\n']);
        assert_eq!(out, vec![Err(LineError::Encoding)]);
    }
}
