//! Type annotation grammar
//!
//! Grammar (whitespace allowed around tokens):
//!
//! ```text
//! <annotation> = <scalar> | "[]" <scalar>? | "{" <scalar> "," <scalar> "}"
//! <scalar>     = "string" | "int" | "bool"
//! ```
//!
//! A bare `[]` declares a list of composites.

use crate::schema::{PropType, Scalar};
use chumsky::prelude::*;

type ParserError = Simple<char>;

fn scalar() -> impl Parser<char, Scalar, Error = ParserError> + Clone {
    choice((
        text::keyword("string").to(Scalar::String),
        text::keyword("int").to(Scalar::Int),
        text::keyword("bool").to(Scalar::Bool),
    ))
}

fn annotation() -> impl Parser<char, PropType, Error = ParserError> {
    let list = just("[]")
        .ignore_then(scalar().or_not())
        .map(|element| element.map_or(PropType::CompositeList, PropType::List));

    let map = scalar()
        .padded()
        .then_ignore(just(','))
        .then(scalar().padded())
        .delimited_by(just('{'), just('}'))
        .map(|(key, value)| PropType::Map(key, value));

    choice((list, map, scalar().map(PropType::Scalar)))
        .padded()
        .then_ignore(end())
}

/// Parse the inside of a `{...}` annotation. Returns `None` for anything outside the grammar.
pub fn parse_annotation(source: &str) -> Option<PropType> {
    annotation().parse(source).ok()
}
