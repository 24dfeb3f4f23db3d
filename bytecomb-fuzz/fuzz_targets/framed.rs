#![no_main]

use bytecomb::{ByteBuf, Serializer};
use bytecomb::ser::{
    BigEndian, Framed, I32Serializer, ListSerializer, StringSerializer, U8Serializer,
    U16Serializer, Utf8Serializer,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // A frame whose declared length disagrees with its payload must fail
    // cleanly, and the outer cursor must land on a byte boundary the frame
    // declared, never one the inner decoder chose
    let framed = Framed::new(
        I32Serializer::<BigEndian>::new(),
        ListSerializer::new(U16Serializer::<BigEndian>::new(), StringSerializer::new()),
    );
    let _ = framed.decode_from_slice(data);

    let nested = Framed::new(
        U8Serializer::new(),
        Framed::new(U8Serializer::new(), Utf8Serializer::new()),
    );
    let mut source = ByteBuf::from(data);
    let before = source.read_pos();
    if nested.decode(&mut source).is_ok() {
        assert!(source.read_pos() >= before);
    }
});
