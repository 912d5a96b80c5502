//! Marker grammar and cast table cases
//!
//! Table-driven checks of what counts as a marker, which annotations are accepted, which
//! truncated markers are rejected, and which stringification call each dialect picks.

use rstest::rstest;
use ssr2templ::markers::{classify, scan, Marker, MarkerKind};
use ssr2templ::rewrite::{Dialect, IterationMode};
use ssr2templ::schema::infer_schema;
use ssr2templ::{Converter, Error, MarkerError, PropType, Scalar};

#[rstest]
#[case("svelte-title-", MarkerKind::PlainReference)]
#[case("svelte-items{[]}-name-", MarkerKind::PlainReference)]
#[case("svelte-a-b-c--", MarkerKind::PlainReference)]
#[case("iter-items[item]--", MarkerKind::Loop)]
#[case("iter-items[i]-tags[tag]--", MarkerKind::Loop)]
#[case("iter-labels[k-v]--", MarkerKind::KeyedMap)]
#[case("svelte-1k2j3h", MarkerKind::NoMatch)]
#[case("svelte-kit", MarkerKind::NoMatch)]
#[case("iter-fast", MarkerKind::NoMatch)]
#[case("iter-a-b", MarkerKind::NoMatch)]
#[case("button", MarkerKind::NoMatch)]
#[case("my-svelte-title-", MarkerKind::NoMatch)]
fn classifies_class_tokens(#[case] token: &str, #[case] expected: MarkerKind) {
    assert_eq!(classify(token).unwrap(), expected);
}

#[rstest]
#[case("string", PropType::Scalar(Scalar::String))]
#[case("int", PropType::Scalar(Scalar::Int))]
#[case("bool", PropType::Scalar(Scalar::Bool))]
#[case("[]string", PropType::List(Scalar::String))]
#[case("[]int", PropType::List(Scalar::Int))]
#[case("[]bool", PropType::List(Scalar::Bool))]
#[case("{string,string}", PropType::Map(Scalar::String, Scalar::String))]
#[case("{string, int}", PropType::Map(Scalar::String, Scalar::Int))]
#[case("{int,string}", PropType::Map(Scalar::Int, Scalar::String))]
#[case("{ bool , bool }", PropType::Map(Scalar::Bool, Scalar::Bool))]
#[case("[]", PropType::CompositeList)]
fn accepts_annotation(#[case] annotation: &str, #[case] expected: PropType) {
    let source = format!("<p>svelte-value{{{annotation}}}-</p>");
    let schema = infer_schema(&source).unwrap();
    let value = schema.lookup(&["value"]).unwrap();
    assert_eq!(value.ty, expected);
    assert!(value.declared);
}

#[rstest]
#[case("float")]
#[case("[]float")]
#[case("{string}")]
#[case("{string,[]int}")]
#[case("String")]
#[case("")]
fn rejects_annotation(#[case] annotation: &str) {
    let source = format!("svelte-value{{{annotation}}}-");
    match infer_schema(&source) {
        Err(Error::Marker(MarkerError::InvalidType {
            annotation: literal,
            ..
        })) => assert_eq!(literal, annotation),
        other => panic!("expected an invalid type error, got {other:?}"),
    }
}

#[rstest]
#[case("svelte-count{int}", "-")]
#[case("svelte-user-age{int}", "-")]
#[case("svelte-count{int-", "}")]
#[case("iter-items[item]", "--")]
#[case("iter-items[item]-", "--")]
#[case("iter-items[item", "]")]
#[case("iter-items[k-", "]")]
#[case("iter-items[i]-meta--", "[")]
fn rejects_truncated_marker(#[case] text: &str, #[case] missing: &str) {
    match scan(text) {
        Err(MarkerError::Unterminated { expected, .. }) => assert_eq!(expected, missing),
        other => panic!("expected an unterminated marker error, got {other:?}"),
    }
}

#[rstest]
#[case("We use svelte-kit-based routing", "svelte-kit-", &["kit"])]
#[case("svelte-user-name", "svelte-user-", &["user"])]
#[case("svelte-count{int}-th place", "svelte-count{int}-", &["count"])]
#[case("a svelte-a-b-c-d e", "svelte-a-b-c-", &["a", "b", "c"])]
fn trailing_word_ends_marker_at_last_dash(
    #[case] text: &str,
    #[case] marker: &str,
    #[case] path: &[&str],
) {
    let markers = scan(text).unwrap();
    assert_eq!(markers.len(), 1);
    let (found, span) = &markers[0];
    assert_eq!(&text[span.clone()], marker);
    match found {
        Marker::Reference(reference) => assert_eq!(reference.path(), path),
        other => panic!("expected a reference, got {other:?}"),
    }
}

#[test]
fn prose_with_dashed_words_converts() {
    let conversion = Converter::default()
        .convert("<p>We use svelte-kit-based routing</p>")
        .unwrap();
    assert!(conversion.schema.lookup(&["kit"]).is_some());
    assert_eq!(
        conversion.template.trim_end(),
        "<p>We use { props.kit }based routing</p>"
    );
}

#[test]
fn truncated_marker_error_names_the_marker() {
    let err = scan(r#"<b class="svelte-count{int">"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "marker `svelte-count{int` is missing its closing `}`"
    );
}

#[rstest]
#[case(Dialect::Generic, IterationMode::List, PropType::Scalar(Scalar::Int), Some("string"))]
#[case(Dialect::Generic, IterationMode::List, PropType::List(Scalar::Bool), Some("string"))]
#[case(Dialect::Generic, IterationMode::Map, PropType::Scalar(Scalar::Int), Some("format"))]
#[case(Dialect::Generic, IterationMode::Map, PropType::Map(Scalar::String, Scalar::Bool), Some("format"))]
#[case(Dialect::Generic, IterationMode::Map, PropType::Map(Scalar::Int, Scalar::String), None)]
#[case(Dialect::Templ, IterationMode::List, PropType::Scalar(Scalar::Int), Some("strconv.Itoa"))]
#[case(Dialect::Templ, IterationMode::List, PropType::Scalar(Scalar::Bool), Some("strconv.FormatBool"))]
#[case(Dialect::Templ, IterationMode::List, PropType::List(Scalar::Int), Some("strconv.Itoa"))]
#[case(Dialect::Templ, IterationMode::Map, PropType::Scalar(Scalar::Int), Some("fmt.Sprint"))]
#[case(Dialect::Templ, IterationMode::Map, PropType::Map(Scalar::String, Scalar::Int), Some("fmt.Sprint"))]
#[case(Dialect::Templ, IterationMode::List, PropType::Scalar(Scalar::String), None)]
#[case(Dialect::Templ, IterationMode::List, PropType::CompositeList, None)]
fn selects_cast(
    #[case] dialect: Dialect,
    #[case] mode: IterationMode,
    #[case] ty: PropType,
    #[case] expected: Option<&str>,
) {
    assert_eq!(dialect.cast(mode, ty), expected);
}

#[rstest]
#[case(Dialect::Generic)]
#[case(Dialect::Templ)]
fn int_casts_differ_between_list_and_map_iteration(#[case] dialect: Dialect) {
    let int = PropType::Scalar(Scalar::Int);
    let list = dialect.cast(IterationMode::List, int);
    let map = dialect.cast(IterationMode::Map, int);
    assert!(list.is_some() && map.is_some());
    assert_ne!(list, map);
}
