use super::model::{CurveSet, LabelSet};
use crate::error::SelectError;

// ---------------------------------------------------------------------------
// Key ordering
// ---------------------------------------------------------------------------

/// Extract the page number from a key such as `"#12:"` or `" #3: "`.
///
/// Whitespace is trimmed first, then `:` and `#` characters from both ends,
/// and whatever remains must parse as an integer. Numbers outside the `i64`
/// range count as unparseable.
pub fn page_number(key: &str) -> Option<i64> {
    key.trim()
        .trim_matches(':')
        .trim_matches('#')
        .trim()
        .parse::<i64>()
        .ok()
}

/// Display order for the keys of a curve set.
///
/// When every key carries a page number the keys are sorted numerically, so
/// `"#10:"` lands after `"#2:"`. A single key without a page number reverts
/// the whole set to lexical order.
pub fn order_keys(curves: &CurveSet) -> Vec<String> {
    let mut keys: Vec<String> = curves.keys().cloned().collect();

    if keys.iter().all(|k| page_number(k).is_some()) {
        keys.sort_by_key(|k| page_number(k));
    } else {
        log::debug!("curve keys are not all page numbers, sorting lexically");
        keys.sort();
    }
    keys
}

// ---------------------------------------------------------------------------
// Display labels
// ---------------------------------------------------------------------------

/// Display strings parallel to `keys`.
///
/// Without a label set the key is shown as-is; otherwise `"{key} {label}"`.
/// A key without a label is a caller error.
pub fn display_labels(
    keys: &[String],
    labels: Option<&LabelSet>,
) -> Result<Vec<String>, SelectError> {
    let Some(labels) = labels else {
        return Ok(keys.to_vec());
    };
    keys.iter()
        .map(|key| {
            labels
                .get(key)
                .map(|label| format!("{key} {label}"))
                .ok_or_else(|| SelectError::MissingLabel { key: key.clone() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Curve;

    fn curve_set(keys: &[&str]) -> CurveSet {
        keys.iter()
            .map(|k| (k.to_string(), Curve::from_points(&[[1e-6, 1.0]])))
            .collect()
    }

    #[test]
    fn parses_page_numbers() {
        assert_eq!(page_number("#1:"), Some(1));
        assert_eq!(page_number("  #42:  "), Some(42));
        assert_eq!(page_number("#-3:"), Some(-3));
        assert_eq!(page_number("7"), Some(7));
        assert_eq!(page_number("#a:"), None);
        assert_eq!(page_number("AC1"), None);
        assert_eq!(page_number(""), None);
        assert_eq!(page_number("#99999999999999999999:"), None);
    }

    #[test]
    fn numeric_keys_sort_by_number() {
        let keys = order_keys(&curve_set(&["#10:", "#2:", "#1:", "#33:", "#3:"]));
        assert_eq!(keys, vec!["#1:", "#2:", "#3:", "#10:", "#33:"]);
    }

    #[test]
    fn one_bad_key_falls_back_to_lexical_for_all() {
        let keys = order_keys(&curve_set(&["#10:", "#2:", "#1:", "extra"]));
        // ':' sorts after '0', so "#10:" comes first
        assert_eq!(keys, vec!["#10:", "#1:", "#2:", "extra"]);

        let mut lexical: Vec<String> = ["#10:", "#2:", "#1:", "extra"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        lexical.sort();
        assert_eq!(keys, lexical);
    }

    #[test]
    fn empty_set_orders_to_nothing() {
        assert!(order_keys(&CurveSet::new()).is_empty());
    }

    #[test]
    fn no_labels_means_keys_are_shown() {
        let keys = vec!["#1:".to_string(), "#2:".to_string()];
        assert_eq!(display_labels(&keys, None).unwrap(), keys);
    }

    #[test]
    fn labels_are_appended_after_a_space() {
        let keys = vec!["#1:".to_string()];
        let labels: LabelSet = [("#1:".to_string(), "Sample A".to_string())].into();
        assert_eq!(
            display_labels(&keys, Some(&labels)).unwrap(),
            vec!["#1: Sample A"]
        );
    }

    #[test]
    fn missing_label_is_an_error() {
        let keys = vec!["#1:".to_string(), "#2:".to_string()];
        let labels: LabelSet = [("#1:".to_string(), "Sample A".to_string())].into();
        assert_eq!(
            display_labels(&keys, Some(&labels)),
            Err(SelectError::MissingLabel { key: "#2:".into() })
        );
    }
}
