use argon2::password_hash::rand_core::{OsRng, RngCore};
use cocina_core::constants::INVITE_TOKEN_BYTES;

/// ## Summary
/// Generates an opaque invite token: 32 random bytes, hex encoded (64 characters).
#[must_use]
pub fn generate_invite_token() -> String {
    let mut bytes = [0_u8; INVITE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
