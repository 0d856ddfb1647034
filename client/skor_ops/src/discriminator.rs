//! Anchor-style discriminators.
//!
//! Accounts are prefixed with `sha256("account:<TypeName>")[..8]` and
//! instruction data with `sha256("global:<instruction_name>")[..8]`.

use anchor_lang::solana_program::hash::hash;

use crate::constants::DISCRIMINATOR_LEN;

/// Computes the 8-byte discriminator for `<namespace>:<name>`.
pub fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let preimage = format!("{}:{}", namespace, name);
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Discriminator of an account type, e.g. `account_discriminator("StakeAccount")`.
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("account", type_name)
}

/// Discriminator of a program instruction, e.g. `instruction_discriminator("stake_tokens")`.
pub fn instruction_discriminator(instruction_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    sighash("global", instruction_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_discriminators_match_known_values() {
        assert_eq!(
            account_discriminator("StakeAccount"),
            [80, 158, 67, 124, 50, 189, 192, 255]
        );
        assert_eq!(
            account_discriminator("LockAccount"),
            [223, 64, 71, 124, 255, 86, 118, 192]
        );
        assert_eq!(
            account_discriminator("StakeCounter"),
            [217, 225, 207, 35, 18, 32, 248, 142]
        );
        assert_eq!(
            account_discriminator("Config"),
            [155, 12, 170, 224, 30, 250, 204, 130]
        );
    }

    #[test]
    fn instruction_discriminator_uses_global_namespace() {
        assert_eq!(
            instruction_discriminator("stake_tokens"),
            [136, 126, 91, 162, 40, 131, 13, 127]
        );
        assert_ne!(
            instruction_discriminator("stake_tokens"),
            account_discriminator("stake_tokens")
        );
    }
}
