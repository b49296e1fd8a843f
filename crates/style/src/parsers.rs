//! Low-level nom parser functions for style values.
//!
//! This module provides composable parser functions for the values that can
//! appear in a document's style block or an inline style clause: colors,
//! integer font sizes, alignment keywords and page keywords.

use crate::dimension::{PageOrientation, PageSize};
use crate::text::TextAlign;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::{char, multispace0, u8 as nom_u8, u32 as nom_u32};
use nom::combinator::{map, map_res, opt};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use pagescript_types::{Color, DiagnosticKind};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Invalid number for '{property}': {value}")]
    InvalidNumber { property: String, value: String },

    #[error("Unknown style property '{0}'")]
    UnknownProperty(String),
}

impl StyleParseError {
    /// The diagnostic category this error is reported under.
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            StyleParseError::Parse(_) => DiagnosticKind::GrammarMismatch,
            StyleParseError::InvalidValue { .. } => DiagnosticKind::UnknownEnumValue,
            StyleParseError::InvalidNumber { .. } => DiagnosticKind::InvalidNumericField,
            StyleParseError::UnknownProperty(_) => DiagnosticKind::UnknownAttribute,
        }
    }
}

// --- Color Parsers ---

fn from_hex(input: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(input, 16)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_primary(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), from_hex).parse(input)
}

/// Parses a six digit hex color with an optional leading `#` (e.g. "#FF0000", "ff0000").
pub fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    map(
        preceded(opt(char('#')), (hex_primary, hex_primary, hex_primary)),
        |(r, g, b)| Color::rgb(r, g, b),
    )
    .parse(input)
}

fn rgb_component(input: &str) -> IResult<&str, u8> {
    delimited(multispace0, nom_u8, multispace0).parse(input)
}

/// Parses an `rgb(r, g, b)` expression with components in 0..=255.
pub fn parse_rgb_function(input: &str) -> IResult<&str, Color> {
    map(
        preceded(
            (tag_no_case("rgb"), multispace0),
            delimited(
                char('('),
                (
                    rgb_component,
                    preceded(char(','), rgb_component),
                    preceded(char(','), rgb_component),
                ),
                char(')'),
            ),
        ),
        |(r, g, b)| Color::rgb(r, g, b),
    )
    .parse(input)
}

/// Parses any non-named color form.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((parse_rgb_function, parse_hex_color)).parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
{
    match parser.parse(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- High-level Parse Functions ---

/// Parses a font size. Only positive integers are accepted.
pub fn parse_font_size(property: &str, s: &str) -> Result<f32, StyleParseError> {
    let invalid = || StyleParseError::InvalidNumber {
        property: property.to_string(),
        value: s.to_string(),
    };
    match run_parser(nom_u32, s) {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(size) => Ok(size as f32),
    }
}

/// Parses a vertical spacing amount in points (e.g. "20", "12.5").
pub fn parse_spacing(s: &str) -> Result<f32, StyleParseError> {
    s.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StyleParseError::InvalidNumber {
            property: "space".to_string(),
            value: s.to_string(),
        })
}

/// Parses a text-align value.
pub fn parse_text_align(s: &str) -> Result<TextAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "left" => Ok(TextAlign::Left),
        "center" | "centre" => Ok(TextAlign::Center),
        "right" => Ok(TextAlign::Right),
        _ => Err(StyleParseError::InvalidValue {
            property: "text-align".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a page size value.
pub fn parse_page_size(s: &str) -> Result<PageSize, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "a4" => Ok(PageSize::A4),
        "letter" => Ok(PageSize::Letter),
        "a3" => Ok(PageSize::A3),
        _ => Err(StyleParseError::InvalidValue {
            property: "page-size".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a page layout (orientation) value.
pub fn parse_page_orientation(s: &str) -> Result<PageOrientation, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "portrait" => Ok(PageOrientation::Portrait),
        "landscape" => Ok(PageOrientation::Landscape),
        _ => Err(StyleParseError::InvalidValue {
            property: "page-layout".to_string(),
            value: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            run_parser(parse_hex_color, "#FF0000").unwrap(),
            Color::rgb(255, 0, 0)
        );
        assert_eq!(
            run_parser(parse_hex_color, "00ff7f").unwrap(),
            Color::rgb(0, 255, 127)
        );
        assert!(run_parser(parse_hex_color, "#f00").is_err());
        assert!(run_parser(parse_hex_color, "#GG0000").is_err());
        assert!(run_parser(parse_hex_color, "#FF00001").is_err());
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(
            run_parser(parse_rgb_function, "rgb(255,0,128)").unwrap(),
            Color::rgb(255, 0, 128)
        );
        assert_eq!(
            run_parser(parse_rgb_function, "rgb( 1 , 2 , 3 )").unwrap(),
            Color::rgb(1, 2, 3)
        );
        assert!(run_parser(parse_rgb_function, "rgb(256,0,0)").is_err());
        assert!(run_parser(parse_rgb_function, "rgb(1,2)").is_err());
        assert!(run_parser(parse_rgb_function, "rgb(-1,2,3)").is_err());
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("size", "14").unwrap(), 14.0);
        assert_eq!(parse_font_size("size", " 9 ").unwrap(), 9.0);
        let err = parse_font_size("font-size", "abc").unwrap_err();
        assert_eq!(err.diagnostic_kind(), DiagnosticKind::InvalidNumericField);
        assert!(parse_font_size("size", "12.5").is_err());
        assert!(parse_font_size("size", "0").is_err());
    }

    #[test]
    fn test_parse_spacing() {
        assert_eq!(parse_spacing("20").unwrap(), 20.0);
        assert_eq!(parse_spacing(" 7.5 ").unwrap(), 7.5);
        assert!(parse_spacing("lots").is_err());
        assert!(parse_spacing("inf").is_err());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_text_align("Center").unwrap(), TextAlign::Center);
        assert_eq!(parse_page_size("LETTER").unwrap(), PageSize::Letter);
        assert_eq!(parse_page_size("a3").unwrap(), PageSize::A3);
        assert_eq!(
            parse_page_orientation("landscape").unwrap(),
            PageOrientation::Landscape
        );
        let err = parse_page_size("legal").unwrap_err();
        assert_eq!(err.diagnostic_kind(), DiagnosticKind::UnknownEnumValue);
        assert!(parse_text_align("justify").is_err());
    }
}
