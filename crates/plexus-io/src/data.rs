// SPDX-FileCopyrightText: 2026 Plexus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Big-endian primitive encoding over any byte stream.
//!
//! Booleans are one byte (non-zero reads as `true`), integers and floats are
//! fixed-width big-endian, floats travel as their IEEE-754 bits. Text is a
//! `u16` byte count followed by UTF-8.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

/// Longest text [`DataOutput::write_utf`] accepts, in encoded bytes.
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Typed reads over any [`Read`].
pub trait DataInput: Read {
    fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_i8(&mut self) -> io::Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn read_i16(&mut self) -> io::Result<i16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// One UTF-16 code unit.
    fn read_char_unit(&mut self) -> io::Result<u16> {
        self.read_u16()
    }

    fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_i64(&mut self) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    fn read_f32(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_bits(u32::from_be_bytes(buf)))
    }

    fn read_f64(&mut self) -> io::Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_be_bytes(buf)))
    }

    /// Length-prefixed UTF-8 text as written by [`DataOutput::write_utf`].
    fn read_utf(&mut self) -> io::Result<String> {
        let len = usize::from(self.read_u16()?);
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }

    /// Next line of single-byte characters.
    ///
    /// The line ends at `\n`, `\r`, `\r\n` or end of input and the terminator
    /// is consumed but not returned. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>
    where
        Self: Seek,
    {
        let mut line = String::new();
        let mut byte = [0u8; 1];
        let mut read_any = false;
        loop {
            if self.read(&mut byte)? == 0 {
                break;
            }
            read_any = true;
            match byte[0] {
                b'\n' => break,
                b'\r' => {
                    if self.read(&mut byte)? == 1 && byte[0] != b'\n' {
                        self.seek(SeekFrom::Current(-1))?;
                    }
                    break;
                }
                b => line.push(char::from(b)),
            }
        }
        Ok(read_any.then_some(line))
    }
}

impl<R: Read + ?Sized> DataInput for R {}

/// Typed writes over any [`Write`].
pub trait DataOutput: Write {
    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_u8(u8::from(value))
    }

    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_all(&[value])
    }

    fn write_i8(&mut self, value: i8) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i16(&mut self, value: i16) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// One UTF-16 code unit.
    fn write_char_unit(&mut self, unit: u16) -> io::Result<()> {
        self.write_u16(unit)
    }

    /// `text` as a sequence of UTF-16 code units, without a length prefix.
    fn write_chars(&mut self, text: &str) -> io::Result<()> {
        text.encode_utf16().try_for_each(|unit| self.write_char_unit(unit))
    }

    /// The low byte of every character of `text`, without a length prefix.
    fn write_latin1(&mut self, text: &str) -> io::Result<()> {
        let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
        self.write_all(&bytes)
    }

    fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i64(&mut self, value: i64) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.write_all(&value.to_bits().to_be_bytes())
    }

    fn write_f64(&mut self, value: f64) -> io::Result<()> {
        self.write_all(&value.to_bits().to_be_bytes())
    }

    /// `text` prefixed with its UTF-8 length as a `u16`.
    ///
    /// Fails with `InvalidInput`, writing nothing, when the encoding exceeds
    /// [`MAX_UTF_LEN`] bytes.
    fn write_utf(&mut self, text: &str) -> io::Result<()> {
        let len = u16::try_from(text.len()).map_err(|_| {
            io::Error::new(
                ErrorKind::InvalidInput,
                format!("encoded text is {} bytes, limit is {MAX_UTF_LEN}", text.len()),
            )
        })?;
        let mut buf = Vec::with_capacity(2 + text.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.extend_from_slice(text.as_bytes());
        self.write_all(&buf)
    }
}

impl<W: Write + ?Sized> DataOutput for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn integers_are_big_endian() {
        let mut out = Vec::new();
        out.write_i32(0x0102_0304).unwrap();
        out.write_i16(-2).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 0xff, 0xfe]);
    }

    #[test]
    fn any_non_zero_byte_is_true() {
        let mut input = Cursor::new(vec![0u8, 1, 0x80]);
        assert!(!input.read_bool().unwrap());
        assert!(input.read_bool().unwrap());
        assert!(input.read_bool().unwrap());
    }

    #[test]
    fn utf_is_length_prefixed() {
        let mut out = Vec::new();
        out.write_utf("hé").unwrap();
        assert_eq!(out, vec![0, 3, b'h', 0xc3, 0xa9]);
        assert_eq!(Cursor::new(out).read_utf().unwrap(), "hé");
    }

    #[test]
    fn oversized_utf_is_rejected_without_writing() {
        let mut out = Vec::new();
        let text = "x".repeat(MAX_UTF_LEN + 1);
        let err = out.write_utf(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(out.is_empty());

        out.write_utf(&"x".repeat(MAX_UTF_LEN)).unwrap();
        assert_eq!(out.len(), MAX_UTF_LEN + 2);
    }

    #[test]
    fn invalid_utf8_is_invalid_data() {
        let mut input = Cursor::new(vec![0u8, 1, 0xff]);
        assert_eq!(input.read_utf().unwrap_err().kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn short_input_is_unexpected_eof() {
        let mut input = Cursor::new(vec![0u8, 1, 2]);
        assert_eq!(input.read_i32().unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_line_handles_every_terminator() {
        let mut input = Cursor::new(b"one\ntwo\r\nthree\rfour".to_vec());
        assert_eq!(input.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(input.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(input.read_line().unwrap().as_deref(), Some("three"));
        assert_eq!(input.read_line().unwrap().as_deref(), Some("four"));
        assert_eq!(input.read_line().unwrap(), None);
    }

    #[test]
    fn chars_are_utf16_units() {
        let mut out = Vec::new();
        out.write_chars("A\u{1F600}").unwrap();
        assert_eq!(out.len(), 6);
        let mut input = Cursor::new(out);
        assert_eq!(input.read_char_unit().unwrap(), u16::from(b'A'));
        let units = [input.read_char_unit().unwrap(), input.read_char_unit().unwrap()];
        assert_eq!(String::from_utf16(&units).unwrap(), "\u{1F600}");
    }

    #[test]
    fn latin1_round_trips_through_read_line() {
        let mut out = Cursor::new(Vec::new());
        out.write_latin1("caf\u{e9}\n").unwrap();
        out.set_position(0);
        assert_eq!(out.read_line().unwrap().as_deref(), Some("caf\u{e9}"));
    }
}
