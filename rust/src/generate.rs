//! UUID generation: nil, random (version 4) and SHA-1 name based (version 5).

use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::uuid::{Uuid, UuidError, Version};

/// Namespace for SIP session identifiers (RFC 7989, section 4.1).
///
/// Identifiers already issued by deployed proxies depend on these exact bytes.
pub const NAMESPACE_SIP: Uuid = Uuid::from_u128(0xa58587da_c93d_11e2_ae90_f4ea67801e29);
/// RFC4122 appendix C: fully qualified domain names.
pub const NAMESPACE_DNS: Uuid = Uuid::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8);
/// RFC4122 appendix C: URLs.
pub const NAMESPACE_URL: Uuid = Uuid::from_u128(0x6ba7b811_9dad_11d1_80b4_00c04fd430c8);
/// RFC4122 appendix C: ISO OIDs.
pub const NAMESPACE_OID: Uuid = Uuid::from_u128(0x6ba7b812_9dad_11d1_80b4_00c04fd430c8);
/// RFC4122 appendix C: X.500 DNs.
pub const NAMESPACE_X500: Uuid = Uuid::from_u128(0x6ba7b814_9dad_11d1_80b4_00c04fd430c8);

/// Source of random bytes for version 4 generation.
///
/// Implementations must fill the whole slice from a single draw or fail.
pub trait EntropySource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), UuidError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), UuidError> {
        getrandom::fill(dest).map_err(|e| UuidError::EntropyUnavailable(e.to_string()))
    }
}

impl Uuid {
    /// The all-zero UUID.
    pub const fn nil() -> Self {
        Self::from_bytes([0; 16])
    }

    /// Generate a random version 4 UUID from the operating system CSPRNG.
    pub fn new_v4() -> Result<Self, UuidError> {
        Self::new_v4_from(&mut OsEntropy)
    }

    /// Generate a version 4 UUID from the given entropy source.
    pub fn new_v4_from<E: EntropySource + ?Sized>(source: &mut E) -> Result<Self, UuidError> {
        let mut bytes = [0u8; 16];
        source
            .fill(&mut bytes)
            .inspect_err(|e| warn!(error = %e, "entropy draw for v4 uuid failed"))?;
        Ok(Self::stamped(bytes, Version::Random))
    }

    /// Generate a version 5 UUID from a namespace and a non-empty name.
    pub fn new_v5(namespace: &Uuid, name: &[u8]) -> Result<Self, UuidError> {
        if name.is_empty() {
            return Err(UuidError::InvalidName);
        }

        let mut hasher = Sha1::new();
        hasher.update(namespace.as_bytes());
        hasher.update(name);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        let uuid = Self::stamped(bytes, Version::Sha1);

        debug!(%namespace, %uuid, name_len = name.len(), "generated v5 uuid");
        Ok(uuid)
    }

    /// Generate a version 5 UUID in the SIP session namespace.
    pub fn new_v5_sip(name: &[u8]) -> Result<Self, UuidError> {
        Self::new_v5(&NAMESPACE_SIP, name)
    }
}
