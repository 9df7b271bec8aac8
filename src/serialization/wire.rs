// src/serialization/wire.rs
//
// Protobuf-style wire primitives: base-128 varints and tagged fields.
// Message construction is infallible (everything lands in a Vec); only the
// final flush to a writer can fail, and that is handled at the serializer
// boundary.

/// Varint-encoded scalar field.
pub const WIRE_VARINT: u32 = 0;
/// Length-delimited field (nested message, string bytes).
pub const WIRE_LEN: u32 = 2;

/// A message that can emit itself in wire format.
pub trait Encode {
    fn encode(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

pub fn put_uvarint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

pub fn put_tag(out: &mut Vec<u8>, field: u32, wire_type: u32) {
    put_uvarint(out, (u64::from(field) << 3) | u64::from(wire_type));
}

pub fn put_varint_field(out: &mut Vec<u8>, field: u32, value: u64) {
    put_tag(out, field, WIRE_VARINT);
    put_uvarint(out, value);
}

/// Booleans are only ever written when true; false is the omitted default.
pub fn put_bool_field(out: &mut Vec<u8>, field: u32, value: bool) {
    if value {
        put_varint_field(out, field, 1);
    }
}

pub fn put_bytes_field(out: &mut Vec<u8>, field: u32, bytes: &[u8]) {
    put_tag(out, field, WIRE_LEN);
    put_uvarint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

pub fn put_message_field(out: &mut Vec<u8>, field: u32, message: &impl Encode) {
    put_bytes_field(out, field, &message.to_bytes());
}
