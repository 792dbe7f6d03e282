use std::borrow::Borrow;

use crate::data::record::Record;

/// Does any searched field of `record` contain `lowered_term`?
///
/// `lowered_term` must already be lower-cased. With no explicit keys every
/// field of the record is searched. Absent and `Null` fields never match.
pub fn record_matches(record: &Record, lowered_term: &str, search_keys: Option<&[String]>) -> bool {
    let field_matches = |key: &str| {
        record
            .present(key)
            .is_some_and(|value| value.search_text().contains(lowered_term))
    };

    match search_keys {
        Some(keys) => keys.iter().any(|key| field_matches(key.as_str())),
        None => record.keys().any(field_matches),
    }
}

/// Keep the records matching `term` as a case-insensitive substring.
///
/// An empty term is the identity: the input comes back unchanged.
pub fn filter_records<R>(records: &[R], term: &str, search_keys: Option<&[String]>) -> Vec<R>
where
    R: Borrow<Record> + Clone,
{
    if term.is_empty() {
        return records.to_vec();
    }

    let lowered = term.to_lowercase();
    records
        .iter()
        .filter(|r| record_matches(<R as Borrow<Record>>::borrow(r), &lowered, search_keys))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datavalue::DataValue;

    fn users() -> Vec<Record> {
        vec![
            Record::new()
                .with("name", "Alice Martin")
                .with("role", "Auditor")
                .with("department", "Finance"),
            Record::new()
                .with("name", "Bob Stone")
                .with("role", "Admin")
                .with("department", DataValue::Null),
            Record::new()
                .with("name", "Carol Ames")
                .with("role", "Approver")
                .with("tags", vec!["sox", "audit"]),
        ]
    }

    #[test]
    fn test_empty_term_is_identity() {
        let data = users();
        assert_eq!(filter_records(&data, "", None), data);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let data = users();
        let found = filter_records(&data, "AUDIT", None);
        // Alice's role and Carol's tags both match
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value("name"), &DataValue::from("Alice Martin"));
        assert_eq!(found[1].value("name"), &DataValue::from("Carol Ames"));
    }

    #[test]
    fn test_restricted_keys() {
        let data = users();
        let keys = vec!["name".to_string()];
        let found = filter_records(&data, "audit", Some(&keys));
        assert!(found.is_empty());

        let found = filter_records(&data, "stone", Some(&keys));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_null_and_missing_never_match() {
        let data = users();
        let keys = vec!["department".to_string(), "missing".to_string()];
        assert!(filter_records(&data, "null", Some(&keys)).is_empty());
    }

    #[test]
    fn test_numbers_and_booleans_match_their_text() {
        let data = vec![
            Record::new().with("riskScore", 42).with("isActive", true),
            Record::new().with("riskScore", 7).with("isActive", false),
        ];
        assert_eq!(filter_records(&data, "42", None).len(), 1);
        assert_eq!(filter_records(&data, "TRUE", None).len(), 1);
    }

    #[test]
    fn test_works_over_borrowed_records() {
        let data = users();
        let refs: Vec<&Record> = data.iter().collect();
        let found = filter_records(&refs, "bob", None);
        assert_eq!(found.len(), 1);
        assert!(std::ptr::eq(found[0], &data[1]));
    }
}
