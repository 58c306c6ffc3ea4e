//! XML element to document conversion.
//!
//! [`convert`] maps one element subtree to a [`ConvertedValue`];
//! [`assemble_documents`] turns every direct child of a root element into a
//! [`Document`]. Both are pure and never fail.

use indexmap::IndexMap;

use crate::types::{ConvertedValue, Document, Field, Record, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::xml::Element;

/// Convert an element subtree.
///
/// - every attribute becomes an `@name` field
/// - children are grouped by tag in first-seen order; a tag seen once maps
///   to its value, a repeated tag maps to the ordered list of values
/// - non-empty trimmed text becomes `#text` next to other fields, or the
///   whole value when there are none
/// - an element with nothing left converts to [`ConvertedValue::Absent`]
///
/// # Examples
/// ```
/// use xmldb_loader::convert::convert;
/// use xmldb_loader::types::ConvertedValue;
/// use xmldb_loader::xml::Element;
///
/// let leaf = Element::parse("<price>  12.50 </price>").unwrap();
/// assert_eq!(convert(&leaf), ConvertedValue::Text("12.50".to_string()));
///
/// let empty = Element::parse("<note>   </note>").unwrap();
/// assert_eq!(convert(&empty), ConvertedValue::Absent);
/// ```
pub fn convert(element: &Element) -> ConvertedValue {
    let mut record = Record::with_capacity(element.attributes.len());

    for (name, value) in &element.attributes {
        record.insert(
            format!("{ATTRIBUTE_PREFIX}{name}"),
            Field::Single(ConvertedValue::Text(value.clone())),
        );
    }

    let mut groups: IndexMap<&str, Vec<ConvertedValue>> = IndexMap::new();
    for child in &element.children {
        groups
            .entry(child.tag.as_str())
            .or_default()
            .push(convert(child));
    }
    for (tag, values) in groups {
        record.insert(tag.to_string(), Field::from_values(values));
    }

    if let Some(text) = element.trimmed_text() {
        if record.is_empty() {
            return ConvertedValue::Text(text.to_string());
        }
        record.insert(
            TEXT_KEY.to_string(),
            Field::Single(ConvertedValue::Text(text.to_string())),
        );
    }

    if record.is_empty() {
        ConvertedValue::Absent
    } else {
        ConvertedValue::Record(record)
    }
}

/// Lazily convert each direct child of `root` into a document, in order.
pub fn documents(root: &Element) -> impl Iterator<Item = Document> + '_ {
    root.children
        .iter()
        .map(|child| Document::from_converted(&child.tag, convert(child)))
}

/// Convert each direct child of `root` into a document.
///
/// Produces exactly one document per child, absent values included. A root
/// without children yields an empty vector.
///
/// # Examples
/// ```
/// use xmldb_loader::convert::assemble_documents;
/// use xmldb_loader::xml::Element;
///
/// let root = Element::parse(r#"<r><a id="1">hi</a><b/></r>"#).unwrap();
/// let docs = assemble_documents(&root);
///
/// assert_eq!(
///     serde_json::to_string(&docs).unwrap(),
///     r##"[{"@id":"1","#text":"hi","_type":"a"},{"_type":"b","value":null}]"##
/// );
/// ```
pub fn assemble_documents(root: &Element) -> Vec<Document> {
    let docs: Vec<Document> = documents(root).collect();
    tracing::debug!(root = %root.tag, count = docs.len(), "Assembled documents");
    docs
}

/// Convert the whole tree into a single document.
///
/// The document holds one field named after the root tag whose value is the
/// converted root, followed by `_type` = root tag.
pub fn whole_document(root: &Element) -> Document {
    let mut record = Record::with_capacity(1);
    record.insert(root.tag.clone(), Field::Single(convert(root)));
    Document::from_converted(&root.tag, ConvertedValue::Record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TYPE_KEY, VALUE_KEY};
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> Element {
        Element::parse(xml).unwrap()
    }

    fn text(value: &str) -> Field {
        Field::Single(ConvertedValue::Text(value.to_string()))
    }

    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap()
    }

    #[test]
    fn test_empty_element_is_absent() {
        assert_eq!(convert(&parse("<a/>")), ConvertedValue::Absent);
        assert_eq!(convert(&parse("<a></a>")), ConvertedValue::Absent);
        assert_eq!(convert(&parse("<a> \n\t </a>")), ConvertedValue::Absent);
    }

    #[test]
    fn test_text_only_element_is_trimmed_leaf() {
        assert_eq!(
            convert(&parse("<a>\n  hello world \n</a>")),
            ConvertedValue::Text("hello world".to_string())
        );
    }

    #[test]
    fn test_attributes_only() {
        let value = convert(&parse(r#"<e a="1" b="2"/>"#));
        assert_eq!(to_json(&value), r#"{"@a":"1","@b":"2"}"#);
    }

    #[test]
    fn test_attribute_values_are_not_coerced() {
        let value = convert(&parse(r#"<e n="007" f="true" x=""/>"#));
        assert_eq!(to_json(&value), r#"{"@n":"007","@f":"true","@x":""}"#);
    }

    #[test]
    fn test_repeated_children_coalesce_in_order() {
        let value = convert(&parse("<p><x>1</x><x>2</x><x>3</x></p>"));
        assert_eq!(to_json(&value), r#"{"x":["1","2","3"]}"#);
    }

    #[test]
    fn test_single_child_is_not_a_list() {
        let value = convert(&parse("<p><x>1</x></p>"));
        assert_eq!(to_json(&value), r#"{"x":"1"}"#);
    }

    #[test]
    fn test_interleaved_tags_keep_first_seen_order() {
        let value = convert(&parse("<p><b>1</b><a>2</a><b>3</b><c/><a>4</a></p>"));
        assert_eq!(to_json(&value), r#"{"b":["1","3"],"a":["2","4"],"c":null}"#);
    }

    #[test]
    fn test_absent_children_are_kept() {
        let value = convert(&parse("<p><x/><x>2</x></p>"));
        let record = value.as_record().unwrap();
        assert_eq!(
            record.get("x"),
            Some(&Field::List(vec![
                ConvertedValue::Absent,
                ConvertedValue::Text("2".to_string())
            ]))
        );
    }

    #[test]
    fn test_attributes_children_and_text_merge() {
        let value = convert(&parse(r#"<e id="9">  note <c>v</c></e>"#));
        assert_eq!(to_json(&value), r##"{"@id":"9","c":"v","#text":"note"}"##);
    }

    #[test]
    fn test_text_after_first_child_is_ignored() {
        let value = convert(&parse("<e><c>v</c>trailing</e>"));
        assert_eq!(to_json(&value), r#"{"c":"v"}"#);
    }

    #[test]
    fn test_text_around_comments_and_pis_is_kept() {
        assert_eq!(
            convert(&parse("<price><!-- EUR -->12</price>")),
            ConvertedValue::Text("12".to_string())
        );
        assert_eq!(
            convert(&parse("<p>ab<!-- c -->cd</p>")),
            ConvertedValue::Text("abcd".to_string())
        );

        let value = convert(&parse(r#"<p id="1"><?pi x?>hello</p>"#));
        assert_eq!(to_json(&value), r##"{"@id":"1","#text":"hello"}"##);
    }

    #[test]
    fn test_whitespace_text_next_to_attribute_is_dropped() {
        let value = convert(&parse(r#"<e id="1">   </e>"#));
        assert_eq!(to_json(&value), r#"{"@id":"1"}"#);
    }

    #[test]
    fn test_attribute_and_child_with_same_name_do_not_collide() {
        let value = convert(&parse(r#"<e id="attr"><id>child</id></e>"#));
        let record = value.as_record().unwrap();
        assert_eq!(record.get("@id"), Some(&text("attr")));
        assert_eq!(record.get("id"), Some(&text("child")));
    }

    #[test]
    fn test_nested_structure() {
        let xml = r#"<draw id="1">
            <date>2024-01-05</date>
            <numbers>
                <n>4</n><n>8</n><n>15</n>
            </numbers>
            <jackpot currency="EUR">1000000</jackpot>
        </draw>"#;
        let value = convert(&parse(xml));
        assert_eq!(
            to_json(&value),
            r##"{"@id":"1","date":"2024-01-05","numbers":{"n":["4","8","15"]},"jackpot":{"@currency":"EUR","#text":"1000000"}}"##
        );
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        let value = convert(&parse(r#"<p naam="Zoë">café ☕</p>"#));
        assert_eq!(to_json(&value), r##"{"@naam":"Zoë","#text":"café ☕"}"##);
    }

    #[test]
    fn test_convert_never_fails_on_odd_trees() {
        // Deep nesting, empty tags, repeated keys and entity-heavy text all map to a value.
        let deep = "<a>".repeat(64) + &"</a>".repeat(64);
        assert_eq!(convert(&parse(&deep)), ConvertedValue::Absent);

        let built = Element::new("r")
            .with_attribute("#text", "attr")
            .with_child(Element::new("#text").with_text("child"))
            .with_text("body");
        let value = convert(&built);
        let record = value.as_record().unwrap();
        assert_eq!(record.get("@#text"), Some(&text("attr")));
        assert_eq!(record.get(TEXT_KEY), Some(&text("body")));

        let odd = parse("<r>&lt;&gt;&amp;<x/><x/><x/></r>");
        let value = convert(&odd);
        assert_eq!(to_json(&value), r##"{"x":[null,null,null],"#text":"<>&"}"##);
    }

    #[test]
    fn test_assemble_documents_example() {
        let root = parse(r#"<r><a id="1">hi</a><b/></r>"#);
        let docs = assemble_documents(&root);

        assert_eq!(
            to_json(&docs),
            r##"[{"@id":"1","#text":"hi","_type":"a"},{"_type":"b","value":null}]"##
        );
    }

    #[test]
    fn test_assemble_documents_empty_root() {
        assert!(assemble_documents(&parse("<r/>")).is_empty());
        assert!(assemble_documents(&parse("<r>only text</r>")).is_empty());
    }

    #[test]
    fn test_assemble_documents_one_per_child() {
        let root = parse("<r><a/><a/><b>x</b><c k=\"v\"/><a>y</a></r>");
        let docs = assemble_documents(&root);

        assert_eq!(docs.len(), root.children.len());
        let types: Vec<_> = docs.iter().filter_map(Document::type_name).collect();
        assert_eq!(types, vec!["a", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_leaf_document_wraps_value() {
        let docs = assemble_documents(&parse("<r><total> 42 </total></r>"));
        assert_eq!(docs[0].keys().collect::<Vec<_>>(), vec![TYPE_KEY, VALUE_KEY]);
        assert_eq!(to_json(&docs[0]), r#"{"_type":"total","value":"42"}"#);
    }

    #[test]
    fn test_documents_iterator_matches_assembled() {
        let root = parse("<r><a>1</a><b/><c d=\"e\"/></r>");
        let lazy: Vec<Document> = documents(&root).collect();
        assert_eq!(lazy, assemble_documents(&root));
    }

    #[test]
    fn test_whole_document() {
        let doc = whole_document(&parse(r#"<r v="2"><a>1</a><a>2</a></r>"#));
        assert_eq!(
            to_json(&doc),
            r#"{"r":{"@v":"2","a":["1","2"]},"_type":"r"}"#
        );
    }

    #[test]
    fn test_whole_document_of_empty_root() {
        let doc = whole_document(&parse("<r/>"));
        assert_eq!(to_json(&doc), r#"{"r":null,"_type":"r"}"#);
    }
}
