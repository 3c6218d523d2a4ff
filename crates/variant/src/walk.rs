use crate::Variant;

/// Receives the depth-first event stream produced by [`Variant::walk`].
///
/// Every method has a default no-op body so a visitor only needs to
/// implement the events it cares about (a JSON pretty-printer only cares
/// about scalars and the `*_begin`/`*_end` pairs; a key-collector only cares
/// about `object_key`).
#[allow(unused_variables)]
pub trait Visitor {
    fn empty(&mut self) {}
    fn null(&mut self) {}
    fn bool(&mut self, value: bool) {}
    fn int(&mut self, value: i64) {}
    fn double(&mut self, value: f64) {}
    fn bytes(&mut self, value: &[u8]) {}
    fn array_begin(&mut self) {}
    fn array_end(&mut self) {}
    fn object_begin(&mut self) {}
    fn object_key(&mut self, key: &[u8]) {}
    fn object_end(&mut self) {}
}

pub fn walk(variant: &Variant<'_>, visitor: &mut dyn Visitor) {
    match variant {
        Variant::None => visitor.empty(),
        Variant::Null => visitor.null(),
        Variant::Bool(b) => visitor.bool(*b),
        Variant::Int(i) => visitor.int(*i),
        Variant::Double(d) => visitor.double(*d),
        Variant::String(s) => visitor.bytes(s.as_bytes()),
        Variant::Vector(items) => {
            visitor.array_begin();
            for item in items {
                walk(item, visitor);
            }
            visitor.array_end();
        }
        Variant::Map(map) => {
            visitor.object_begin();
            for (key, value) in map.sorted_entries() {
                visitor.object_key(key.as_bytes());
                walk(value, visitor);
            }
            visitor.object_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcore_quarks::keys;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Visitor for Recorder {
        fn empty(&mut self) {
            self.0.push("empty".into());
        }
        fn null(&mut self) {
            self.0.push("null".into());
        }
        fn bool(&mut self, value: bool) {
            self.0.push(format!("bool({value})"));
        }
        fn int(&mut self, value: i64) {
            self.0.push(format!("int({value})"));
        }
        fn double(&mut self, value: f64) {
            self.0.push(format!("double({value})"));
        }
        fn bytes(&mut self, value: &[u8]) {
            self.0.push(format!("bytes({})", String::from_utf8_lossy(value)));
        }
        fn array_begin(&mut self) {
            self.0.push("array_begin".into());
        }
        fn array_end(&mut self) {
            self.0.push("array_end".into());
        }
        fn object_begin(&mut self) {
            self.0.push("object_begin".into());
        }
        fn object_key(&mut self, key: &[u8]) {
            self.0.push(format!("object_key({})", String::from_utf8_lossy(key)));
        }
        fn object_end(&mut self) {
            self.0.push("object_end".into());
        }
    }

    #[test]
    fn unset_variant_emits_empty() {
        let mut rec = Recorder::default();
        walk(&Variant::None, &mut rec);
        assert_eq!(rec.0, vec!["empty"]);
    }

    #[test]
    fn map_emits_keys_sorted_by_byte_order() {
        let mut map = crate::VMap::new();
        map.insert_or_assign(keys::SOURCE, Variant::Int(1));
        map.insert_or_assign(keys::COMMENT, Variant::Int(2));
        let variant = Variant::Map(map);

        let mut rec = Recorder::default();
        walk(&variant, &mut rec);
        assert_eq!(
            rec.0,
            vec![
                "object_begin",
                "object_key(comment)",
                "int(2)",
                "object_key(source)",
                "int(1)",
                "object_end",
            ]
        );
    }

    #[test]
    fn vector_emits_elements_in_document_order() {
        let variant = Variant::Vector(vec![Variant::Int(1), Variant::Bool(true), Variant::Null]);
        let mut rec = Recorder::default();
        walk(&variant, &mut rec);
        assert_eq!(
            rec.0,
            vec!["array_begin", "int(1)", "bool(true)", "null", "array_end"]
        );
    }
}
