// src/serialization/strings.rs
//
// The deduplicating string table: equal strings always receive the same
// dense index within one serialization lineage. The table is append-only
// for the lifetime of the lineage and is written out ahead of the message
// bytes.

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::descriptors::{ClassId, DescriptorArena};
use crate::serialization::wire;

/// Capability interface through which the serializer obtains every string
/// index. Supplied by the `SerializerExtension`, so a platform layer can
/// substitute its own table (for example one shared with other metadata).
pub trait StringTable {
    fn string_index(&mut self, value: &str) -> u32;

    /// Index of a class's fully qualified name.
    fn class_name_index(&mut self, arena: &DescriptorArena, class: ClassId) -> u32;

    /// Emit the table: a count followed by length-prefixed UTF-8 entries in
    /// index order.
    fn write_to(&self, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct SimpleStringTable {
    strings: Vec<String>,
    lookup: FxHashMap<String, u32>,
}

impl SimpleStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl StringTable for SimpleStringTable {
    fn string_index(&mut self, value: &str) -> u32 {
        if let Some(&index) = self.lookup.get(value) {
            return index;
        }
        let index = self.strings.len() as u32;
        self.strings.push(value.to_string());
        self.lookup.insert(value.to_string(), index);
        index
    }

    fn class_name_index(&mut self, arena: &DescriptorArena, class: ClassId) -> u32 {
        let fq_name = arena.fq_name(class);
        self.string_index(&fq_name)
    }

    fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        let mut bytes = Vec::new();
        wire::put_uvarint(&mut bytes, self.strings.len() as u64);
        for value in &self.strings {
            wire::put_uvarint(&mut bytes, value.len() as u64);
            bytes.extend_from_slice(value.as_bytes());
        }
        out.write_all(&bytes)
    }
}
