//! Octet dump format tests

use ion_element::{Container, DatagramBuilder, Element, IonType, Node, PrettyOptions, Style, SymbolTable};

fn assert_fmt(elements: &[Element], expected: &str, pretty: bool) {
    let mut builder = DatagramBuilder::new();
    for element in elements {
        builder.push(element).unwrap();
    }
    let datagram = builder.finish();
    assert_eq!(format!("{}", datagram.format(pretty)), expected)
}

fn assert_compact_fmt(elements: &[Element], expected: &str) {
    assert_fmt(elements, expected, false)
}

fn assert_pretty_fmt(elements: &[Element], expected: &str) {
    assert_fmt(elements, expected, true)
}

#[test]
fn test_compact_fmt() {
    assert_compact_fmt(&[], "E0 01 00 EA");
    assert_compact_fmt(&[Element::null(), Element::bool(false)], "E0 01 00 EA 0F 10");
    assert_compact_fmt(&[Element::string("hi")], "E0 01 00 EA 82 68 69");
    assert_compact_fmt(
        &[Element::list([Element::int(1), Element::int(-2)])],
        "E0 01 00 EA B4 21 01 31 02",
    );
    assert_compact_fmt(
        &[Element::symbol("a")],
        "E0 01 00 EA E7 81 83 D4 87 B2 81 61 71 0A",
    );
}

#[test]
fn test_pretty_fmt() {
    assert_pretty_fmt(&[], "E0 01 00 EA");
    assert_pretty_fmt(&[Element::null(), Element::bool(true)], "E0 01 00 EA\n0F\n11");
    assert_pretty_fmt(
        &[Element::list([Element::int(1), Element::list([])])],
        "E0 01 00 EA\nB3 [\n  21 01\n  B0 []\n]",
    );
    assert_pretty_fmt(
        &[Element::structure([("a", Element::sexp([Element::bool(true)]))]).with_annotations(["t"])],
        concat!(
            "E0 01 00 EA\n",
            "E8 81 83 :: D6 {\n",
            "  87: B4 [\n",
            "    81 61\n",
            "    81 74\n",
            "  ]\n",
            "}\n",
            "E5 81 8B :: D3 {\n",
            "  8A: C1 (\n",
            "    11\n",
            "  )\n",
            "}",
        ),
    );
}

#[test]
fn test_container_brackets() {
    assert_pretty_fmt(
        &[Element::list([Element::null_of(IonType::Struct), Element::sexp([]), Element::structure::<_, &str>([])])],
        "E0 01 00 EA\nB3 [\n  DF\n  C0 ()\n  D0 {}\n]",
    );

    let sexp = Container::new(IonType::Sexp, vec![Container::null(IonType::List).into()]);
    assert_eq!(sexp.ion_type(), IonType::Sexp);
    assert!(!sexp.is_null());
    assert_eq!(Node::from(sexp).format(true).to_string(), "C1 (\n  BF\n)");
}

#[test]
fn test_long_payload() {
    let text = "abcdefghijklmnopqrst";
    let mut symbols = SymbolTable::new();
    let node = ion_element::encode_value(&Element::string(text), &mut symbols).unwrap();

    assert_eq!(
        node.format(true).to_string(),
        "8E 94 61 62 63 64 65 66 67 68 69 6A 6B 6C 6D 6E 6F 70\n  71 72 73 74"
    );

    let options = PrettyOptions::new(2, true, 4, 2);
    assert_eq!(
        node.format_with(Some(options), Style::Plain).to_string(),
        "8E 94 61626364 65666768\n  696A6B6C 6D6E6F70\n  71727374"
    );
}

#[test]
fn test_styles() {
    let node = Node::from(ion_element::Scalar::new(0x20, vec![0x05]));
    assert_eq!(node.format(false).to_string(), "21 05");
    assert_eq!(
        node.format_with(Some(PrettyOptions::default()), Style::Html).to_string(),
        "<span class=\"ion-descriptor\">21</span> <span class=\"ion-payload\">05</span>"
    );
    assert_eq!(
        node.format_with(None, Style::Ansi).to_string(),
        "\x1b[1;34m21\x1b[0m \x1b[32m05\x1b[0m"
    );

    let options = PrettyOptions {
        punctuation: false,
        ..PrettyOptions::default()
    };
    let annotated = Element::bool(true).with_annotations(["$ion"]);
    let mut symbols = SymbolTable::new();
    let node = ion_element::encode_value(&annotated, &mut symbols).unwrap();
    assert_eq!(node.format_with(Some(options), Style::Plain).to_string(), "E3 81 81 11");
    assert_eq!(
        node.format_with(None, Style::Html).to_string(),
        concat!(
            "<span class=\"ion-descriptor\">E3</span> <span class=\"ion-length\">81</span> ",
            "<span class=\"ion-annotation\">81</span> <span class=\"ion-descriptor\">11</span>",
        )
    );
}
