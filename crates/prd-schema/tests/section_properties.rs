//! Property tests for section name resolution and content hashing

use prd_schema::{ContentHash, SectionName};
use proptest::prelude::*;

fn section_name() -> impl Strategy<Value = SectionName> {
    prop::sample::select(SectionName::ALL.to_vec())
}

proptest! {
    #[test]
    fn from_key_ignores_case_and_spacing(
        name in section_name(),
        lead in "[ \t]{0,3}",
        trail in "[ \t\n]{0,3}",
        upper in any::<bool>(),
    ) {
        let display = name.to_string();
        let spaced = display.replace(' ', "   ");
        let cased = if upper { spaced.to_uppercase() } else { spaced.to_lowercase() };
        let key = format!("{lead}{cased}{trail}");
        prop_assert_eq!(SectionName::from_key(&key), Some(name));
    }

    #[test]
    fn from_key_rejects_suffixed_names(name in section_name(), suffix in "[a-z]{1,4}") {
        let key = format!("{name}{suffix}");
        prop_assert_eq!(SectionName::from_key(&key), None);
    }

    #[test]
    fn part_boundaries_change_the_hash(a in "[a-z]{0,8}", b in "[a-z]{1,8}") {
        let joined = format!("{a}{b}");
        prop_assert_ne!(
            ContentHash::compute_parts(&[a.as_str(), b.as_str()]),
            ContentHash::compute_parts(&[joined.as_str()])
        );
    }
}

#[test]
fn canonical_order_is_stable() {
    let names: Vec<String> = SectionName::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names.first().map(String::as_str), Some("Executive Summary"));
    assert_eq!(names.last().map(String::as_str), Some("References"));
    assert_eq!(names.len(), 12);
    for (i, name) in SectionName::ALL.iter().enumerate() {
        assert_eq!(name.index(), i);
    }
}
