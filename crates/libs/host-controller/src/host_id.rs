use std::fmt;

use rand_core::{OsRng, RngCore};

const GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];

/// Identifier of a registered host: 128 random bits rendered as
/// lowercase 8-4-4-4-12 hex groups.
///
/// Only [`HostId::generate`] and [`HostId::from_bytes`] construct one, so
/// every value is canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(String);

impl HostId {
    /// Fresh identifier from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let hex = hex::encode(bytes);
        Self(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    /// `true` if `value` has the canonical grouped-hex shape.
    pub fn is_canonical(value: &str) -> bool {
        let groups: Vec<&str> = value.split('-').collect();
        groups.len() == GROUP_LENGTHS.len()
            && groups.iter().zip(GROUP_LENGTHS).all(|(group, len)| {
                group.len() == len
                    && group
                        .bytes()
                        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<HostId> for String {
    fn from(id: HostId) -> Self {
        id.0
    }
}
