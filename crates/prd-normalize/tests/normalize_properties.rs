use pretty_assertions::assert_eq;
use prd_normalize::{ErrorKind, Normalizer, UnparseableCause};
use prd_schema::{SectionContent, SectionName};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(SectionName::ALL.to_vec())
            .prop_map(|name| name.display_name().to_string()),
        proptest::sample::select(SectionName::ALL.to_vec())
            .prop_map(|name| format!("  {}  ", name.display_name().to_uppercase())),
        Just("content".to_string()),
        Just("diagrams".to_string()),
        Just("search_terms".to_string()),
        Just("image_suggestions".to_string()),
        Just("mermaid_code".to_string()),
        Just("title".to_string()),
        "[a-z_]{1,8}",
    ]
}

fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 {}:\\[\\]\"\\n`]{0,16}".prop_map(Value::String),
        Just(json!("graph TD\nA-->B")),
        Just(json!("```mermaid\nsequenceDiagram\nA->>B: hi\n```")),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::vec((key_strategy(), inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::vec((key_strategy(), json_strategy()), 0..10)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_any_object_normalizes_to_full_document(root in object_strategy()) {
        let raw = Value::Object(root).to_string();
        let document = Normalizer::new().normalize(&raw);
        prop_assert!(document.is_ok());
        let document = document.unwrap();
        prop_assert!(document.check_shape().is_ok());
        prop_assert_eq!(document.sections().len(), SectionName::ALL.len());
    }

    #[test]
    fn prop_canonical_form_is_a_fixed_point(root in object_strategy()) {
        let normalizer = Normalizer::new();
        let first = normalizer.normalize(&Value::Object(root).to_string()).unwrap();
        let second = normalizer
            .normalize(&first.to_canonical_json().to_string())
            .unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn prop_list_order_is_preserved(items in proptest::collection::vec("[a-z]{1,6}( [a-z]{1,6})?", 0..12)) {
        let raw = json!({ "User Stories": items.clone() }).to_string();
        let document = Normalizer::new().normalize(&raw).unwrap();
        let content = &document.section(SectionName::UserStories).unwrap().content;
        prop_assert_eq!(content, &SectionContent::Items(items));
    }

    #[test]
    fn prop_surrounding_prose_is_ignored(
        prefix in "[a-zA-Z .,!:]{0,40}",
        suffix in "[a-zA-Z .,!:]{0,40}",
        summary in "[a-zA-Z]{1,20}",
    ) {
        let raw = format!("{prefix}{}{suffix}", json!({ "Executive Summary": summary.clone() }));
        let document = Normalizer::new().normalize(&raw).unwrap();
        prop_assert_eq!(
            &document.section(SectionName::ExecutiveSummary).unwrap().content,
            &SectionContent::Text(summary)
        );
    }
}

#[test]
fn single_section_leaves_others_empty() {
    let document = Normalizer::new()
        .normalize(r#"{"Executive Summary": "Track carbon footprint."}"#)
        .unwrap();
    for section in document.sections() {
        if section.name == SectionName::ExecutiveSummary {
            assert_eq!(
                section.content,
                SectionContent::Text("Track carbon footprint.".into())
            );
        } else {
            assert!(section.is_blank(), "{} should be empty", section.name);
        }
    }
}

#[test]
fn prose_wrapped_object_is_recovered() {
    let document = Normalizer::new()
        .normalize(r#"Here is your PRD: {"Executive Summary": "X"} Thanks!"#)
        .unwrap();
    assert_eq!(
        document.section(SectionName::ExecutiveSummary).unwrap().content,
        SectionContent::Text("X".into())
    );
    assert!(document.metadata.is_empty());
}

#[test]
fn empty_string_is_unparseable() {
    let err = Normalizer::new().normalize("").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unparseable);
    assert_eq!(err.cause, UnparseableCause::EmptyInput);
}

#[test]
fn fenced_json_response_is_recovered() {
    let raw = "```json\n{\"Risks & Mitigation\": [\"Data gaps - partner APIs\"]}\n```";
    let document = Normalizer::new().normalize(raw).unwrap();
    assert_eq!(
        document.section(SectionName::RisksAndMitigation).unwrap().content,
        SectionContent::Items(vec!["Data gaps - partner APIs".into()])
    );
}
