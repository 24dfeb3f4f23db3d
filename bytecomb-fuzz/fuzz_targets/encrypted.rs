#![no_main]

use std::sync::Arc;

use bytecomb::Serializer;
use bytecomb::cipher::{AesGcmCipher, SecretKey};
use bytecomb::pool::Pool;
use bytecomb::ser::{Encrypted, StringSerializer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes are essentially never a valid ciphertext; decoding
    // must reject them without panicking
    let key = SecretKey::from_bytes([0xA5; 32]);
    let enc_key = key.clone();
    let dec_key = key;
    let ser = Encrypted::new(
        StringSerializer::new(),
        Arc::new(Pool::new(move || AesGcmCipher::new(&enc_key))),
        Arc::new(Pool::new(move || AesGcmCipher::new(&dec_key))),
    );
    let _ = ser.decode_from_slice(data);
});
