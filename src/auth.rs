//! Builder API authentication for the relayer.
//!
//! | Credential | Method | Used by |
//! |------------|--------|---------|
//! | Signer key | secp256k1 over EIP-712 digests | Payload signatures |
//! | Builder | HMAC-SHA256 request headers | `/submit`, `/transactions` |

mod builder;

pub use builder::{
    build_builder_hmac_signature, BuilderApiKeyCreds, BuilderSigner, HmacSha256,
    BUILDER_API_KEY_ENV, BUILDER_API_KEY_HEADER, BUILDER_PASSPHRASE_ENV,
    BUILDER_PASSPHRASE_HEADER, BUILDER_SECRET_ENV, BUILDER_SIGNATURE_HEADER,
    BUILDER_TIMESTAMP_HEADER,
};
