//! Formatter.
//!
//! Renders binary nodes as hexadecimal octet dumps. The compact form writes all octets on one
//! line; the pretty form puts every value on its own line, indented by nesting depth.

use crate::binary::IVM;
use crate::ion_type::IonType;
use crate::node::{AnnotatedValue, Container, Datagram, Node, Scalar, StructField};
use crate::varint::VarUInt;
pub use pretty::{PrettyFormatter, PrettyOptions};
use std::error::Error;
use std::fmt;
use std::fmt::Display;

mod pretty;

/// Possible errors that can arise during formatting.
#[derive(Debug)]
pub enum FormatError {
    FmtError(fmt::Error),
}

impl Display for FormatError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FmtError(e) => write!(f, "{}", e),
        }
    }
}

impl Error for FormatError {}

pub type FormatResult<T> = std::result::Result<T, FormatError>;

impl From<fmt::Error> for FormatError {
    #[inline]
    fn from(e: fmt::Error) -> Self {
        FormatError::FmtError(e)
    }
}

/// Role of a run of octets.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Highlight {
    VersionMarker,
    Descriptor,
    Length,
    Payload,
    FieldName,
    Annotation,
}

impl Highlight {
    #[inline]
    pub const fn class_name(self) -> &'static str {
        match self {
            Highlight::VersionMarker => "ion-ivm",
            Highlight::Descriptor => "ion-descriptor",
            Highlight::Length => "ion-length",
            Highlight::Payload => "ion-payload",
            Highlight::FieldName => "ion-field-name",
            Highlight::Annotation => "ion-annotation",
        }
    }

    #[inline]
    const fn ansi_code(self) -> &'static str {
        match self {
            Highlight::VersionMarker => "\x1b[1;35m",
            Highlight::Descriptor => "\x1b[1;34m",
            Highlight::Length => "\x1b[36m",
            Highlight::Payload => "\x1b[32m",
            Highlight::FieldName => "\x1b[33m",
            Highlight::Annotation => "\x1b[35m",
        }
    }
}

/// How highlighted octet runs are marked up.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Style {
    #[default]
    Plain,
    /// ANSI terminal colors.
    Ansi,
    /// `<span class="...">` elements, see [`Highlight::class_name`].
    Html,
}

impl Style {
    #[inline]
    fn begin<W: fmt::Write>(self, highlight: Highlight, writer: &mut W) -> fmt::Result {
        match self {
            Style::Plain => Ok(()),
            Style::Ansi => writer.write_str(highlight.ansi_code()),
            Style::Html => write!(writer, "<span class=\"{}\">", highlight.class_name()),
        }
    }

    #[inline]
    fn end<W: fmt::Write>(self, writer: &mut W) -> fmt::Result {
        match self {
            Style::Plain => Ok(()),
            Style::Ansi => writer.write_str("\x1b[0m"),
            Style::Html => writer.write_str("</span>"),
        }
    }
}

pub trait Formatter {
    /// Writes a run of octets.
    fn write_octets<W: fmt::Write>(
        &mut self,
        highlight: Highlight,
        octets: &[u8],
        writer: &mut W,
    ) -> FormatResult<()>;

    #[inline]
    fn format_datagram<W: fmt::Write>(&mut self, datagram: &Datagram, writer: &mut W) -> FormatResult<()> {
        self.write_octets(Highlight::VersionMarker, &IVM, writer)?;
        if let Some(table) = datagram.symbol_table() {
            self.begin_top_level_value(writer)?;
            self.write_annotated(table.binary(), writer)?;
        }
        for value in datagram.values() {
            self.begin_top_level_value(writer)?;
            self.write_node(value, writer)?;
        }
        Ok(())
    }

    #[inline]
    fn format_node<W: fmt::Write>(&mut self, node: &Node, writer: &mut W) -> FormatResult<()> {
        self.write_node(node, writer)
    }

    #[inline]
    fn write_node<W: fmt::Write>(&mut self, node: &Node, writer: &mut W) -> FormatResult<()> {
        match node {
            Node::Scalar(scalar) => self.write_scalar(scalar, writer),
            Node::Container(container) => self.write_container(container, writer),
            Node::Field(field) => self.write_field(field, writer),
            Node::Annotated(annotated) => self.write_annotated(annotated, writer),
        }
    }

    #[inline]
    fn write_header<W: fmt::Write>(
        &mut self,
        descriptor: u8,
        length: Option<VarUInt>,
        writer: &mut W,
    ) -> FormatResult<()> {
        self.write_octets(Highlight::Descriptor, &[descriptor], writer)?;
        if let Some(length) = length {
            self.write_octets(Highlight::Length, &length.to_bytes(), writer)?;
        }
        Ok(())
    }

    #[inline]
    fn write_scalar<W: fmt::Write>(&mut self, scalar: &Scalar, writer: &mut W) -> FormatResult<()> {
        self.write_header(scalar.descriptor(), scalar.length(), writer)?;
        self.write_octets(Highlight::Payload, scalar.payload(), writer)
    }

    #[inline]
    fn write_container<W: fmt::Write>(&mut self, container: &Container, writer: &mut W) -> FormatResult<()> {
        self.write_header(container.descriptor(), container.length(), writer)?;
        if container.is_null() {
            return Ok(());
        }

        let ion_type = container.ion_type();
        let children = container.children();
        self.begin_container(ion_type, writer)?;
        for (i, child) in children.iter().enumerate() {
            self.begin_container_value(i == 0, writer)?;
            self.write_node(child, writer)?;
        }
        self.end_container(ion_type, children.is_empty(), writer)
    }

    #[inline]
    fn write_field<W: fmt::Write>(&mut self, field: &StructField, writer: &mut W) -> FormatResult<()> {
        self.write_octets(Highlight::FieldName, &field.field_name().to_bytes(), writer)?;
        self.end_field_name(writer)?;
        self.write_node(field.value(), writer)
    }

    #[inline]
    fn write_annotated<W: fmt::Write>(&mut self, annotated: &AnnotatedValue, writer: &mut W) -> FormatResult<()> {
        self.write_header(annotated.descriptor(), annotated.length(), writer)?;
        self.write_octets(Highlight::Length, &annotated.annotations_length().to_bytes(), writer)?;
        let mut ids = Vec::new();
        for annotation in annotated.annotations() {
            annotation.serialize(&mut ids);
        }
        self.write_octets(Highlight::Annotation, &ids, writer)?;
        self.end_annotations(writer)?;
        self.write_node(annotated.value(), writer)
    }

    #[inline]
    fn begin_top_level_value<W: fmt::Write>(&mut self, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }

    #[inline]
    fn begin_container<W: fmt::Write>(&mut self, _ion_type: IonType, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }

    #[inline]
    fn begin_container_value<W: fmt::Write>(&mut self, _first: bool, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }

    #[inline]
    fn end_container<W: fmt::Write>(&mut self, _ion_type: IonType, _empty: bool, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }

    #[inline]
    fn end_field_name<W: fmt::Write>(&mut self, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }

    #[inline]
    fn end_annotations<W: fmt::Write>(&mut self, _writer: &mut W) -> FormatResult<()> {
        Ok(())
    }
}

/// Writes all octets on one line, separated by single spaces.
pub struct CompactFormatter {
    style: Style,
    has_octets: bool,
}

impl CompactFormatter {
    #[inline]
    pub const fn new(style: Style) -> Self {
        Self {
            style,
            has_octets: false,
        }
    }
}

impl Formatter for CompactFormatter {
    fn write_octets<W: fmt::Write>(
        &mut self,
        highlight: Highlight,
        octets: &[u8],
        writer: &mut W,
    ) -> FormatResult<()> {
        if octets.is_empty() {
            return Ok(());
        }
        if self.has_octets {
            writer.write_str(" ")?;
        }
        self.style.begin(highlight, writer)?;
        write_hex(octets, " ", writer)?;
        self.style.end(writer)?;
        self.has_octets = true;
        Ok(())
    }
}

#[derive(Copy, Clone)]
enum Target<'a> {
    Datagram(&'a Datagram),
    Node(&'a Node),
}

pub struct LazyFormat<'a> {
    target: Target<'a>,
    pretty: Option<PrettyOptions>,
    style: Style,
}

impl<'a> LazyFormat<'a> {
    #[inline]
    pub const fn new(datagram: &'a Datagram, pretty: Option<PrettyOptions>, style: Style) -> Self {
        Self {
            target: Target::Datagram(datagram),
            pretty,
            style,
        }
    }

    #[inline]
    pub const fn node(node: &'a Node, pretty: Option<PrettyOptions>, style: Style) -> Self {
        Self {
            target: Target::Node(node),
            pretty,
            style,
        }
    }

    #[inline]
    fn write_with<F: Formatter>(&self, fmt: &mut F, f: &mut fmt::Formatter<'_>) -> FormatResult<()> {
        match self.target {
            Target::Datagram(datagram) => fmt.format_datagram(datagram, f),
            Target::Node(node) => fmt.format_node(node, f),
        }
    }
}

impl fmt::Display for LazyFormat<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pretty {
            Some(options) => {
                let mut fmt = PrettyFormatter::new(options, self.style);
                self.write_with(&mut fmt, f).map_err(|_| fmt::Error)
            }
            None => {
                let mut fmt = CompactFormatter::new(self.style);
                self.write_with(&mut fmt, f).map_err(|_| fmt::Error)
            }
        }
    }
}

impl Datagram {
    /// Formats the datagram as a compact or pretty octet dump.
    #[inline]
    pub fn format(&self, pretty: bool) -> impl Display + '_ {
        let options = if pretty { Some(PrettyOptions::default()) } else { None };
        LazyFormat::new(self, options, Style::Plain)
    }

    /// Formats the datagram with explicit options; `None` selects the compact form.
    #[inline]
    pub fn format_with(&self, pretty: Option<PrettyOptions>, style: Style) -> impl Display + '_ {
        LazyFormat::new(self, pretty, style)
    }
}

impl Node {
    /// Formats the node as a compact or pretty octet dump.
    #[inline]
    pub fn format(&self, pretty: bool) -> impl Display + '_ {
        let options = if pretty { Some(PrettyOptions::default()) } else { None };
        LazyFormat::node(self, options, Style::Plain)
    }

    /// Formats the node with explicit options; `None` selects the compact form.
    #[inline]
    pub fn format_with(&self, pretty: Option<PrettyOptions>, style: Style) -> impl Display + '_ {
        LazyFormat::node(self, pretty, style)
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn write_hex<W: fmt::Write>(octets: &[u8], separator: &str, writer: &mut W) -> fmt::Result {
    for (i, &octet) in octets.iter().enumerate() {
        if i > 0 {
            writer.write_str(separator)?;
        }
        writer.write_char(HEX_DIGITS[(octet >> 4) as usize] as char)?;
        writer.write_char(HEX_DIGITS[(octet & 0x0F) as usize] as char)?;
    }
    Ok(())
}
