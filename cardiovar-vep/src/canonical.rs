use cardiovar_core::models::AnnotationRecord;

use crate::consts::{CANONICAL_FIELD, CANONICAL_FLAG};

///
/// Pick the representative annotation for a variant.
///
/// The first record whose `CANONICAL` attribute is exactly `YES` wins and scanning stops
/// there. With no canonical record the **first** record in file order is used. An empty
/// input yields `None` and the variant is dropped.
///
/// This is first-match in file order. Clinical significance resolution uses a different,
/// set-based policy on purpose; see `cardiovar_features::labels`.
///
pub fn select_canonical<'s, I>(records: I) -> Option<AnnotationRecord<'s>>
where
    I: IntoIterator<Item = AnnotationRecord<'s>>,
{
    let mut first = None;
    for record in records {
        if record.raw(CANONICAL_FIELD) == Some(CANONICAL_FLAG) {
            return Some(record);
        }
        if first.is_none() {
            first = Some(record);
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    use cardiovar_core::models::AnnotationSchema;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::decode::decode_annotations;

    #[fixture]
    fn schema() -> AnnotationSchema {
        AnnotationSchema::from_pipe_list("A|B|CANONICAL")
    }

    fn pick<'s>(payload: &str, schema: &'s AnnotationSchema) -> Option<AnnotationRecord<'s>> {
        select_canonical(decode_annotations(payload, schema).records)
    }

    #[rstest]
    fn test_single_canonical_block(schema: AnnotationSchema) {
        let chosen = pick("val1|val2|YES", &schema).unwrap();
        let pairs: Vec<(&str, &str)> = chosen.iter().collect();
        assert_eq!(
            pairs,
            vec![("A", "val1"), ("B", "val2"), ("CANONICAL", "YES")]
        );
    }

    #[rstest]
    fn test_falls_back_to_first(schema: AnnotationSchema) {
        let chosen = pick("t1|x|,t2|y|,t3|z|NO", &schema).unwrap();
        assert_eq!(chosen.get("A"), Some("t1"));
    }

    #[rstest]
    #[case("c|x|YES,t1|y|,t2|z|")]
    #[case("t1|y|,c|x|YES,t2|z|")]
    #[case("t1|y|,t2|z|,c|x|YES")]
    fn test_canonical_wins_at_any_position(schema: AnnotationSchema, #[case] payload: &str) {
        assert_eq!(pick(payload, &schema).unwrap().get("A"), Some("c"));
    }

    #[rstest]
    fn test_permuting_non_canonical_keeps_canonical(schema: AnnotationSchema) {
        let a = pick("t1|y|,c|x|YES,t2|z|", &schema).unwrap();
        let b = pick("t2|z|,c|x|YES,t1|y|", &schema).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_first_canonical_wins(schema: AnnotationSchema) {
        assert_eq!(pick("t|y|,c1|x|YES,c2|x|YES", &schema).unwrap().get("A"), Some("c1"));
    }

    #[rstest]
    fn test_canonical_flag_is_exact(schema: AnnotationSchema) {
        assert_eq!(pick("t1|y|yes,t2|z|YES ", &schema).unwrap().get("A"), Some("t1"));
    }

    #[rstest]
    fn test_no_records(schema: AnnotationSchema) {
        assert_eq!(pick("only|two", &schema), None);
    }
}
