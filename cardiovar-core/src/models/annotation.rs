use fxhash::FxHashMap;

use crate::utils::is_missing;

///
/// Ordered annotation subfield names declared by a variant file header
/// (e.g. the `Format: Allele|Consequence|...` clause of the CSQ INFO line).
///
/// Captured once per file and passed by reference into every decode call.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSchema {
    fields: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl AnnotationSchema {
    pub fn new(fields: Vec<String>) -> Self {
        let mut index = FxHashMap::default();
        for (i, name) in fields.iter().enumerate() {
            // first declaration wins if a header repeats a name
            index.entry(name.clone()).or_insert(i);
        }
        AnnotationSchema { fields, index }
    }

    ///
    /// Build a schema from a pipe separated field list, `"Allele|Consequence|IMPACT"`.
    ///
    pub fn from_pipe_list(list: &str) -> Self {
        AnnotationSchema::new(list.split('|').map(str::to_string).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

///
/// One transcript-level annotation: positional values keyed by the schema they were decoded against.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord<'s> {
    schema: &'s AnnotationSchema,
    values: Vec<String>,
}

impl<'s> AnnotationRecord<'s> {
    ///
    /// Pair `values` with `schema`. Returns `None` when the value count does not
    /// match the number of declared fields.
    ///
    pub fn try_new(schema: &'s AnnotationSchema, values: Vec<String>) -> Option<Self> {
        if values.len() != schema.len() {
            return None;
        }
        Some(AnnotationRecord { schema, values })
    }

    pub fn schema(&self) -> &'s AnnotationSchema {
        self.schema
    }

    /// Raw value for `name`, including `"."` and empty strings.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.schema
            .position(name)
            .map(|i| self.values[i].as_str())
    }

    /// Value for `name`, or `None` when the field is undeclared or the value is missing.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).filter(|v| !is_missing(v))
    }

    /// `(field, raw value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .fields
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
