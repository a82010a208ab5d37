use rand::{Rng, distr::Alphanumeric};

use credentials_core::TokenGenerator;

/// Alphanumeric tokens from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self, length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let token = RandomTokenGenerator.generate(42);
        assert_eq!(token.len(), 42);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, RandomTokenGenerator.generate(42));
    }
}
