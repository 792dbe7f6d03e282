use crate::data::datavalue::DataValue;
use feruca::{Collator, Tailoring};
use std::cell::RefCell;
use std::cmp::Ordering;

/// Locale-aware string ordering.
///
/// Uses the Unicode Collation Algorithm with the CLDR root collation, so
/// accented letters sort next to their base letter and lower case precedes
/// upper case on otherwise equal strings. Strings the collator considers
/// equal fall back to code-point order, which keeps the result a total order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.borrow_mut().collate(a, b))
        .then_with(|| a.cmp(b))
}

thread_local! {
    // Punctuation and spaces are significant, as in a browser's root collation
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::default(), false, true));
}

/// Compare two present (non-null) values.
///
/// Numbers compare numerically (integers and floats by value) and sort
/// before every other kind of value. All non-numeric values compare by their
/// text form with [`locale_compare`], so strings against booleans, arrays or
/// objects still coerce to text. With numbers in their own band the order is
/// total on mixed columns. NaN compares equal to every number.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::String(a), DataValue::String(b)) => locale_compare(a, b),
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (a, b) if a.is_number() && b.is_number() => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (a, _) if a.is_number() => Ordering::Less,
        (_, b) if b.is_number() => Ordering::Greater,
        (a, b) => locale_compare(&a.to_string(), &b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare_lowercase_before_uppercase() {
        assert_eq!(locale_compare("alice", "Alice"), Ordering::Less);
        assert_eq!(locale_compare("Alice", "alice"), Ordering::Greater);
    }

    #[test]
    fn test_locale_compare_prefix_sorts_first() {
        assert_eq!(locale_compare("Risk", "risk assessment"), Ordering::Less);
    }

    #[test]
    fn test_integer_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(2), &DataValue::Integer(10)),
            Ordering::Less
        );
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(3), &DataValue::Float(2.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(1.0), &DataValue::Integer(1)),
            Ordering::Equal
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(f64::NAN), &DataValue::Integer(1)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_numbers_are_not_compared_as_text() {
        // "10" < "9" as text, 9 < 10 as numbers
        assert_eq!(
            compare_datavalues(&DataValue::Integer(9), &DataValue::Integer(10)),
            Ordering::Less
        );
    }

    #[test]
    fn test_non_numeric_cross_type_falls_back_to_text() {
        // "true" vs "false"
        assert_eq!(
            compare_datavalues(&DataValue::Boolean(true), &DataValue::Boolean(false)),
            Ordering::Greater
        );
        // "true" vs "yes"
        assert_eq!(
            compare_datavalues(&DataValue::Boolean(true), &DataValue::from("yes")),
            Ordering::Less
        );
    }

    #[test]
    fn test_numbers_sort_before_text() {
        assert_eq!(
            compare_datavalues(&DataValue::Integer(10), &DataValue::from("9")),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::from("a"), &DataValue::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_datavalues(&DataValue::Boolean(false), &DataValue::Integer(0)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_accented_letters_sort_with_base_letter() {
        let mut names = vec!["Zoe", "Émile", "Alice", "Ölaf", "Otto"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(names, vec!["Alice", "Émile", "Ölaf", "Otto", "Zoe"]);

        assert_eq!(locale_compare("résumé", "resume"), Ordering::Greater);
        assert_eq!(locale_compare("éclair", "zebra"), Ordering::Less);
    }
}
