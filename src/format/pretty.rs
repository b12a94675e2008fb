//! PrettyFormatter

use crate::format::{write_hex, FormatResult, Formatter, Highlight, Style};
use crate::ion_type::IonType;
use std::fmt;

/// Layout of a pretty octet dump.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PrettyOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Write `[ ] ( ) { }` around container values, `:` after field names and `::` after
    /// annotations.
    pub punctuation: bool,
    /// Payload octets written together without separating spaces.
    pub octets_per_word: usize,
    /// Payload words per line before the payload continues on the next line.
    pub words_per_line: usize,
}

impl PrettyOptions {
    #[inline]
    pub const fn new(indent: usize, punctuation: bool, octets_per_word: usize, words_per_line: usize) -> Self {
        Self {
            indent,
            punctuation,
            octets_per_word,
            words_per_line,
        }
    }
}

impl Default for PrettyOptions {
    #[inline]
    fn default() -> Self {
        PrettyOptions::new(2, true, 1, 16)
    }
}

pub struct PrettyFormatter {
    options: PrettyOptions,
    style: Style,
    cur_indent_level: usize,
    started: bool,
    line_has_octets: bool,
}

impl PrettyFormatter {
    #[inline]
    pub const fn new(options: PrettyOptions, style: Style) -> Self {
        Self {
            options,
            style,
            cur_indent_level: 0,
            started: false,
            line_has_octets: false,
        }
    }

    #[inline]
    fn new_line<W: fmt::Write>(&mut self, level: usize, writer: &mut W) -> FormatResult<()> {
        if self.started {
            writer.write_str("\n")?;
        }
        indent(level, self.options.indent, writer)?;
        self.started = true;
        self.line_has_octets = false;
        Ok(())
    }

    #[inline]
    fn write_run<W: fmt::Write>(
        &mut self,
        highlight: Highlight,
        octets: &[u8],
        separator: &str,
        writer: &mut W,
    ) -> FormatResult<()> {
        if self.line_has_octets {
            writer.write_str(" ")?;
        }
        self.style.begin(highlight, writer)?;
        write_hex(octets, separator, writer)?;
        self.style.end(writer)?;
        self.started = true;
        self.line_has_octets = true;
        Ok(())
    }
}

impl Formatter for PrettyFormatter {
    fn write_octets<W: fmt::Write>(
        &mut self,
        highlight: Highlight,
        octets: &[u8],
        writer: &mut W,
    ) -> FormatResult<()> {
        if octets.is_empty() {
            return Ok(());
        }
        if highlight != Highlight::Payload {
            return self.write_run(highlight, octets, " ", writer);
        }

        let words_per_line = self.options.words_per_line.max(1);
        for (i, word) in octets.chunks(self.options.octets_per_word.max(1)).enumerate() {
            if i > 0 && i % words_per_line == 0 {
                self.new_line(self.cur_indent_level + 1, writer)?;
            }
            self.write_run(highlight, word, "", writer)?;
        }
        Ok(())
    }

    #[inline]
    fn begin_top_level_value<W: fmt::Write>(&mut self, writer: &mut W) -> FormatResult<()> {
        self.new_line(self.cur_indent_level, writer)
    }

    #[inline]
    fn begin_container<W: fmt::Write>(&mut self, ion_type: IonType, writer: &mut W) -> FormatResult<()> {
        self.cur_indent_level += 1;
        if self.options.punctuation {
            writer.write_str(" ")?;
            writer.write_str(brackets(ion_type).0)?;
        }
        Ok(())
    }

    #[inline]
    fn begin_container_value<W: fmt::Write>(&mut self, _first: bool, writer: &mut W) -> FormatResult<()> {
        self.new_line(self.cur_indent_level, writer)
    }

    #[inline]
    fn end_container<W: fmt::Write>(&mut self, ion_type: IonType, empty: bool, writer: &mut W) -> FormatResult<()> {
        self.cur_indent_level -= 1;
        if self.options.punctuation {
            if !empty {
                self.new_line(self.cur_indent_level, writer)?;
            }
            writer.write_str(brackets(ion_type).1)?;
            self.line_has_octets = true;
        }
        Ok(())
    }

    #[inline]
    fn end_field_name<W: fmt::Write>(&mut self, writer: &mut W) -> FormatResult<()> {
        if self.options.punctuation {
            writer.write_str(":")?;
        }
        Ok(())
    }

    #[inline]
    fn end_annotations<W: fmt::Write>(&mut self, writer: &mut W) -> FormatResult<()> {
        if self.options.punctuation {
            writer.write_str(" ::")?;
        }
        Ok(())
    }
}

#[inline]
fn brackets(ion_type: IonType) -> (&'static str, &'static str) {
    match ion_type {
        IonType::Sexp => ("(", ")"),
        IonType::Struct => ("{", "}"),
        _ => ("[", "]"),
    }
}

#[inline]
fn indent<W: fmt::Write>(level: usize, indent: usize, writer: &mut W) -> FormatResult<()> {
    for _ in 0..level * indent {
        writer.write_str(" ")?;
    }
    Ok(())
}
