use std::io::Write;

use super::{ArchiveError, CompoundKind, OutputArchive, Result};
use crate::encode;

const INDENT: &[u8] = b"  ";
const ARRAY_OPEN: &[u8] = b"<array>\n";
const ARRAY_CLOSE: &[u8] = b"</array>";

/// Tagged-text archive.
///
/// Scalars are written as `<tag>text</tag>` with no line break. Vectors and maps open
/// with `<tag><array>` and a newline, and close on their own line with
/// `</array></tag>`. Records are `<tag>`, their fields, `</tag>`. Every closed
/// compound ends its line; indentation (two spaces per open vector or map) is only
/// written where a value or closing marker starts a fresh line.
///
/// One archive serves one document. It holds no shared state, so concurrent passes
/// each need their own instance and their own sink.
pub struct XmlOutputArchive<W: Write> {
    writer: W,
    indent: usize,
    stack: Vec<CompoundKind>,
    line_start: bool,
}

impl<W: Write> XmlOutputArchive<W> {
    /// Wrap a sink. Pass `&mut sink` to keep ownership of it.
    pub fn new(writer: W) -> XmlOutputArchive<W> {
        XmlOutputArchive {
            writer,
            indent: 0,
            stack: vec![],
            line_start: true,
        }
    }

    /// Number of compound scopes currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn open_scopes(&self) -> &[CompoundKind] {
        &self.stack
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Flush and hand back the sink, provided every opened scope was closed.
    pub fn finish(mut self) -> Result<W> {
        if !self.stack.is_empty() {
            return Err(ArchiveError::Unclosed {
                depth: self.stack.len(),
            });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn put_indent(&mut self, level: usize) -> Result<()> {
        for _ in 0..level {
            self.writer.write_all(INDENT)?;
        }
        Ok(())
    }

    /// Indent if this write begins a fresh line.
    fn begin_value(&mut self) -> Result<()> {
        if self.line_start {
            self.put_indent(self.indent)?;
            self.line_start = false;
        }
        Ok(())
    }

    fn write_envelope(&mut self, text: &str, tag: &str) -> Result<()> {
        self.begin_value()?;
        write!(self.writer, "<{}>{}</{}>", tag, text, tag)?;
        Ok(())
    }

    fn check_top(&self, expected: CompoundKind, tag: &str) -> Result<()> {
        match self.stack.last() {
            Some(kind) if *kind == expected => Ok(()),
            found => Err(ArchiveError::NestingMismatch {
                tag: tag.to_string(),
                expected,
                found: found.copied(),
            }),
        }
    }

    fn start_array(&mut self, kind: CompoundKind, tag: &str) -> Result<()> {
        self.begin_value()?;
        write!(self.writer, "<{}>", tag)?;
        self.writer.write_all(ARRAY_OPEN)?;
        self.stack.push(kind);
        self.indent += 1;
        self.line_start = true;
        Ok(())
    }

    fn end_array(&mut self, kind: CompoundKind, tag: &str) -> Result<()> {
        self.check_top(kind, tag)?;

        // Indent and stack only change once the closing marker is out.
        let level = self.indent - 1;
        if !self.line_start {
            self.writer.write_all(b"\n")?;
        }
        self.put_indent(level)?;
        self.writer.write_all(ARRAY_CLOSE)?;
        writeln!(self.writer, "</{}>", tag)?;

        self.stack.pop();
        self.indent = level;
        self.line_start = true;
        Ok(())
    }
}

impl<W: Write> OutputArchive for XmlOutputArchive<W> {
    fn write_byte(&mut self, value: i8, tag: &str) -> Result<()> {
        self.write_envelope(&value.to_string(), tag)
    }

    fn write_bool(&mut self, value: bool, tag: &str) -> Result<()> {
        self.write_envelope(if value { "true" } else { "false" }, tag)
    }

    fn write_int(&mut self, value: i32, tag: &str) -> Result<()> {
        self.write_envelope(&value.to_string(), tag)
    }

    fn write_long(&mut self, value: i64, tag: &str) -> Result<()> {
        self.write_envelope(&value.to_string(), tag)
    }

    fn write_float(&mut self, value: f32, tag: &str) -> Result<()> {
        self.write_envelope(&encode::format_float(value), tag)
    }

    fn write_double(&mut self, value: f64, tag: &str) -> Result<()> {
        self.write_envelope(&encode::format_double(value), tag)
    }

    fn write_string(&mut self, value: &str, tag: &str) -> Result<()> {
        let text = encode::escape_xml(value)?;
        self.write_envelope(&text, tag)
    }

    fn write_buffer(&mut self, value: &[u8], tag: &str) -> Result<()> {
        self.write_envelope(&encode::encode_buffer(value), tag)
    }

    fn start_record(&mut self, tag: &str) -> Result<()> {
        self.begin_value()?;
        write!(self.writer, "<{}>", tag)?;
        self.stack.push(CompoundKind::Record);
        Ok(())
    }

    fn end_record(&mut self, tag: &str) -> Result<()> {
        self.check_top(CompoundKind::Record, tag)?;

        if self.line_start {
            self.put_indent(self.indent)?;
        }
        writeln!(self.writer, "</{}>", tag)?;

        self.stack.pop();
        self.line_start = true;
        Ok(())
    }

    fn start_vector(&mut self, tag: &str) -> Result<()> {
        self.start_array(CompoundKind::Vector, tag)
    }

    fn end_vector(&mut self, tag: &str) -> Result<()> {
        self.end_array(CompoundKind::Vector, tag)
    }

    // Maps share the vector envelope; entries are written as plain children.
    fn start_map(&mut self, tag: &str) -> Result<()> {
        self.start_array(CompoundKind::Map, tag)
    }

    fn end_map(&mut self, tag: &str) -> Result<()> {
        self.end_array(CompoundKind::Map, tag)
    }
}
