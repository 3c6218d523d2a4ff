use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

pub const INFO_HASH_BYTES_LEN: usize = 20;

/// The SHA-1 hash of a torrent's info dictionary, computed over the exact
/// bytes that held the dictionary in the source stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct InfoHash([u8; INFO_HASH_BYTES_LEN]);

impl InfoHash {
    #[must_use]
    pub fn of(info_dict_bytes: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(info_dict_bytes);
        let digest = hasher.finalize();
        let mut bytes = [0u8; INFO_HASH_BYTES_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    #[must_use]
    pub fn bytes(&self) -> [u8; INFO_HASH_BYTES_LEN] {
        self.0
    }

    #[must_use]
    pub fn to_hex_string(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; INFO_HASH_BYTES_LEN]> for InfoHash {
    fn from(bytes: [u8; INFO_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{0:?} is not a 40-character hex info_hash")]
pub struct InfoHashParseError(String);

impl FromStr for InfoHash {
    type Err = InfoHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != INFO_HASH_BYTES_LEN * 2 {
            return Err(InfoHashParseError(s.to_string()));
        }
        let decoded = hex::decode(s).map_err(|_| InfoHashParseError(s.to_string()))?;
        let mut bytes = [0u8; INFO_HASH_BYTES_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}
