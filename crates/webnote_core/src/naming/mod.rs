//! Random identifiers for freshly created notes.

use crate::constants::RANDOM_NOTE_ID_LEN;
use rand::Rng;

/// Characters used for generated ids; visually ambiguous glyphs are left out.
const ID_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTWXYZabcdefhijkmnprstwxyz2345678";

/// Generate a random note id of `len` characters.
pub fn random_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Generate an id for `GET /new`.
pub fn generate_note_id() -> String {
    random_id(RANDOM_NOTE_ID_LEN)
}
