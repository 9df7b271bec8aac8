// src/serialization/mod.rs
//
// The metadata serializer: walks a descriptor graph in a fixed,
// deterministic order and emits a binary message tree plus a deduplicating
// string table. The two together form one persisted unit:
// [string table bytes][message bytes].

pub mod extension;
pub mod flags;
pub mod model;
pub mod order;
pub mod serializer;
pub mod strings;
pub mod wire;

pub use extension::{PlainExtension, SerializerExtension};
pub use model::{
    ClassMessage, ConstructorMessage, FunctionMessage, PackageMessage, PropertyMessage,
    TypeArgumentMessage, TypeMessage, TypeParameterMessage, ValueParameterMessage,
};
pub use serializer::DescriptorSerializer;
pub use strings::{SimpleStringTable, StringTable};
pub use wire::Encode;
