//! Room code generation.

use quizroom_protocol::RoomCode;
use rand::Rng;

/// The 36 symbols a room code is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Something that produces candidate room codes.
///
/// The registry asks for codes until it gets one that isn't taken, so an
/// implementation is free to repeat itself. [`RandomCodes`] is the
/// production source; tests plug in scripted sequences to force
/// collisions.
pub trait CodeSource: Send + Sync + 'static {
    /// Returns a candidate code of `len` symbols.
    fn next_code(&self, len: usize) -> RoomCode;
}

/// Draws each symbol uniformly from [`CODE_ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self, len: usize) -> RoomCode {
        let mut rng = rand::rng();
        let code: String = (0..len)
            .map(|_| {
                CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]
                    as char
            })
            .collect();
        RoomCode::new(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_codes_length_and_alphabet() {
        for _ in 0..200 {
            let code = RandomCodes.next_code(6);
            assert_eq!(code.as_str().len(), 6);
            assert!(
                code.as_str().bytes().all(|b| CODE_ALPHABET.contains(&b)),
                "unexpected symbol in {code}"
            );
        }
    }

    #[test]
    fn test_random_codes_vary() {
        let a = RandomCodes.next_code(6);
        let differs = (0..20).any(|_| RandomCodes.next_code(6) != a);
        assert!(differs);
    }

    #[test]
    fn test_alphabet_has_36_symbols() {
        assert_eq!(CODE_ALPHABET.len(), 36);
    }
}
