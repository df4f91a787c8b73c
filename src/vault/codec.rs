//! Sealing and opening whole vaults.
//!
//! `VaultCodec` ties the pieces together:
//!
//! ```text
//! seal:  salt, nonce <- OS RNG
//!        key         <- KDF(passphrase, salt)
//!        ciphertext  <- AES-256-GCM(key, nonce, payload JSON)
//!        envelope    =  base64(salt, nonce, ciphertext) + kdf params
//!
//! open:  decode + length-check envelope
//!        key         <- KDF(passphrase, salt) with the envelope's params
//!        plaintext   <- verify + decrypt
//!        items       <- legacy array | versioned payload
//! ```
//!
//! Items are opaque JSON values at this layer; see `credential` for the
//! typed view.
//!
//! The codec holds no state between calls apart from the KDF params used
//! for new seals.  Each call derives its own key and drops it before
//! returning.

use std::time::Instant;

use crate::crypto::{self, KdfParams, NONCE_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};
use crate::events::{emit, EventKind, EventSink};

use serde_json::Value;

use super::envelope::Envelope;
use super::payload::{DecryptedPayload, VaultPayload, FORMAT_VERSION};

/// Seals credential lists into envelopes and opens them again.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultCodec {
    kdf: KdfParams,
}

impl VaultCodec {
    /// A codec that seals with the given KDF params.
    ///
    /// Fails with `ConfigError` if the params are out of bounds.
    pub fn new(kdf: KdfParams) -> Result<Self> {
        kdf.validate().map_err(VaultError::ConfigError)?;
        Ok(Self { kdf })
    }

    /// KDF params used for new seals.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf
    }

    /// Encrypt `items` under `passphrase` into a fresh envelope.
    ///
    /// Every call draws a new salt and nonce, so sealing the same input
    /// twice never yields the same envelope.
    pub fn seal(
        &self,
        items: &[Value],
        passphrase: &str,
        sink: &dyn EventSink,
    ) -> Result<Envelope> {
        let started = Instant::now();
        emit(
            sink,
            EventKind::Info,
            format!("starting seal sequence: format v{FORMAT_VERSION}"),
        );

        let salt = crypto::generate_salt()?;
        emit(
            sink,
            EventKind::CryptoDetail,
            format!("salt generated: {}-bit", SALT_LEN * 8),
        );

        let nonce = crypto::generate_nonce()?;
        emit(
            sink,
            EventKind::CryptoDetail,
            format!("nonce generated: {}-bit", NONCE_LEN * 8),
        );

        let key = crypto::derive_key(passphrase.as_bytes(), &salt, &self.kdf, sink)?;

        let plaintext = zeroize::Zeroizing::new(VaultPayload::current(items.to_vec()).to_bytes()?);
        emit(
            sink,
            EventKind::CryptoDetail,
            format!("encrypting payload: {} bytes", plaintext.len()),
        );

        let ciphertext = crypto::seal(&key, &nonce, &plaintext)?;
        drop(key);

        let envelope = Envelope {
            salt: crypto::encoding::encode(&salt),
            nonce: crypto::encoding::encode(&nonce),
            ciphertext: crypto::encoding::encode(&ciphertext),
            kdf: Some(self.kdf),
        };

        emit(
            sink,
            EventKind::Success,
            format!(
                "seal complete: {:.2}ms",
                started.elapsed().as_secs_f64() * 1000.0
            ),
        );
        Ok(envelope)
    }

    /// Decrypt an envelope and return its item list.
    pub fn open(
        &self,
        envelope: &Envelope,
        passphrase: &str,
        sink: &dyn EventSink,
    ) -> Result<Vec<Value>> {
        self.open_payload(envelope, passphrase, sink)
            .map(DecryptedPayload::into_items)
    }

    /// Decrypt an envelope and return the payload with its format details.
    ///
    /// Errors:
    /// - `MalformedEncoding` / `MalformedEnvelope`: the envelope is damaged,
    ///   detected before any key derivation.
    /// - `AccessDenied`: wrong passphrase, or ciphertext/salt/nonce altered.
    /// - `UnrecognizedPayloadShape`: decrypted, but not a known layout.
    pub fn open_payload(
        &self,
        envelope: &Envelope,
        passphrase: &str,
        sink: &dyn EventSink,
    ) -> Result<DecryptedPayload> {
        emit(sink, EventKind::Info, "starting open sequence");

        let decoded = envelope.decode().inspect_err(|e| {
            emit(sink, EventKind::Error, format!("envelope rejected: {e}"));
        })?;
        emit(
            sink,
            EventKind::CryptoDetail,
            format!("loading ciphertext: {} bytes", decoded.ciphertext.len()),
        );

        let key = crypto::derive_key(passphrase.as_bytes(), &decoded.salt, &decoded.kdf, sink)?;

        emit(sink, EventKind::CryptoDetail, "verifying aes-256-gcm tag");
        let plaintext = match crypto::open(&key, &decoded.nonce, &decoded.ciphertext) {
            Ok(pt) => zeroize::Zeroizing::new(pt),
            Err(e) => {
                emit(sink, EventKind::Error, "open failed: access denied");
                return Err(e);
            }
        };
        drop(key);
        emit(sink, EventKind::Success, "integrity verified");

        let payload = DecryptedPayload::parse(&plaintext).inspect_err(|_| {
            emit(sink, EventKind::Error, "unrecognized payload structure");
        })?;

        match &payload {
            DecryptedPayload::Legacy(_) => {
                emit(sink, EventKind::Warning, "legacy vault format detected");
            }
            DecryptedPayload::Versioned(_) => {
                emit(
                    sink,
                    EventKind::Success,
                    format!("payload format verified: v{}", payload.format_version()),
                );
            }
        }

        Ok(payload)
    }
}
