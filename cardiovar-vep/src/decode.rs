use cardiovar_core::models::{AnnotationRecord, AnnotationSchema};

///
/// Annotation records decoded from one variant's payload, plus the number of
/// sub-blocks discarded for not matching the schema width.
///
#[derive(Debug, Default)]
pub struct DecodedAnnotations<'s> {
    pub records: Vec<AnnotationRecord<'s>>,
    pub discarded: usize,
}

///
/// Decode one annotation payload (`a|b|c,d|e|f`) against `schema`.
///
/// Each comma separated sub-block is split on `|`; a sub-block whose value
/// count differs from the number of declared fields is skipped and counted,
/// never treated as an error. File order is preserved.
///
pub fn decode_annotations<'s>(payload: &str, schema: &'s AnnotationSchema) -> DecodedAnnotations<'s> {
    let mut decoded = DecodedAnnotations::default();

    for block in payload.split(',') {
        let values: Vec<String> = block.split('|').map(str::to_string).collect();
        match AnnotationRecord::try_new(schema, values) {
            Some(record) => decoded.records.push(record),
            None => decoded.discarded += 1,
        }
    }

    decoded
}
