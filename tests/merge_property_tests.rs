//! Property tests for combining throughput aggregates

use loadgrid::error::ErrorCode;
use loadgrid::results::{combine, MergeError, ObjectsPerSecond, ResultData, ResultObjectType};
use proptest::prelude::*;

fn object_type() -> impl Strategy<Value = ResultObjectType> {
    prop_oneof![
        Just(ResultObjectType::Document),
        Just(ResultObjectType::Folder),
        Just(ResultObjectType::Site),
        Just(ResultObjectType::User),
        Just(ResultObjectType::Other),
    ]
}

proptest! {
    #[test]
    fn prop_combine_is_symmetric_mean(
        a in 0.0f64..1e9,
        b in 0.0f64..1e9,
        category in object_type(),
        description in "[a-z ]{0,12}",
    ) {
        let left = ObjectsPerSecond::new(a, category, description.clone()).unwrap();
        let right = ObjectsPerSecond::new(b, category, description.clone()).unwrap();

        let merged = combine(&left, &right).unwrap();
        prop_assert_eq!(&merged, &combine(&right, &left).unwrap());
        prop_assert_eq!(merged.value(), (a + b) / 2.0);
        prop_assert_eq!(merged.category(), category);
        prop_assert_eq!(merged.description(), description.as_str());
        prop_assert!(merged.value() >= a.min(b) && merged.value() <= a.max(b));
    }

    #[test]
    fn prop_mismatched_kinds_never_merge(
        a in object_type(),
        b in object_type(),
        left_desc in "[a-z]{1,6}",
        right_desc in "[a-z]{1,6}",
    ) {
        prop_assume!(a != b || left_desc != right_desc);
        let left = ObjectsPerSecond::new(1.0, a, left_desc.clone()).unwrap();
        let right = ObjectsPerSecond::new(2.0, b, right_desc).unwrap();

        let err = combine(&left, &right).unwrap_err();
        if a != b {
            prop_assert_eq!(err.field(), "category");
            prop_assert_eq!(err.code(), ErrorCode::MERGE_CATEGORY_MISMATCH);
        } else {
            prop_assert_eq!(err.field(), "description");
            prop_assert_eq!(err.code(), ErrorCode::MERGE_DESCRIPTION_MISMATCH);
        }
    }
}

#[test]
fn test_negative_and_nan_values_are_rejected() {
    for value in [-0.5, f64::NAN, f64::INFINITY] {
        let err = ObjectsPerSecond::new(value, ResultObjectType::User, "users").unwrap_err();
        assert!(matches!(err, MergeError::InvalidValue(_)));
    }
}

#[test]
fn test_deserialization_validates_value() {
    let ok: ObjectsPerSecond = serde_json::from_str(
        r#"{"value": 12.5, "category": "Site", "description": "sites"}"#,
    )
    .unwrap();
    assert_eq!(ok.value(), 12.5);
    assert!(ok.summary().contains("objectType=Site"));

    let bad = serde_json::from_str::<ObjectsPerSecond>(
        r#"{"value": -1.0, "category": "Site", "description": "sites"}"#,
    );
    assert!(bad.is_err());
}
