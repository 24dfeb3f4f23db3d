#![no_main]

use bytecomb::Serializer;
use bytecomb::ser::{
    BigEndian, I32Serializer, ListSerializer, MapSerializer, Nullable, SetSerializer,
    StringSerializer, U8Serializer, U16Serializer,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Counted collections must survive malicious counts and duplicate
    // entries without panicking or allocating unboundedly
    let list = ListSerializer::new(
        U16Serializer::<BigEndian>::new(),
        I32Serializer::<BigEndian>::new(),
    );
    let _ = list.decode_from_slice(data);

    let set = SetSerializer::new(U8Serializer::new(), I32Serializer::<BigEndian>::new());
    let _ = set.decode_from_slice(data);

    let map = MapSerializer::new(
        U8Serializer::new(),
        StringSerializer::new(),
        Nullable::new(I32Serializer::<BigEndian>::new()),
    );
    let _ = map.decode_from_slice(data);
});
