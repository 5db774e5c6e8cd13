//! Local signing of legacy EIP-155 transactions.
//!
//! Public RPC endpoints hold no accounts, so the ledger client signs its own
//! transactions and submits them with `eth_sendRawTransaction`.
//!
//! ```text
//! unsigned = rlp([nonce, gas_price, gas, to, value, data, chain_id, 0, 0])
//! signed   = rlp([nonce, gas_price, gas, to, value, data, v, r, s])
//! v        = chain_id * 2 + 35 + y_parity
//! ```

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::config::ConfigError;

pub type Address = [u8; 20];

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// A value transfer without access lists or fee markets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub to: Address,
    pub value: u64,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl LegacyTransaction {
    fn append_body(&self, stream: &mut RlpStream) {
        stream
            .append(&self.nonce)
            .append(&self.gas_price)
            .append(&self.gas_limit)
            .append(&self.to.to_vec())
            .append(&self.value)
            .append(&self.data);
    }

    /// Keccak-256 of the EIP-155 signing payload.
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&self.chain_id).append(&0u64).append(&0u64);
        keccak256(&stream.out())
    }
}

/// A secp256k1 key and the address it controls.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address_hex())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl LocalSigner {
    /// Parse a 32-byte private key given as hex, with or without `0x`.
    pub fn from_hex(secret: &str) -> Result<Self, ConfigError> {
        let digits = secret.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let bytes = Zeroizing::new(hex::decode(digits).map_err(|_| ConfigError::InvalidPrivateKey)?);
        let key = SigningKey::from_slice(&bytes).map_err(|_| ConfigError::InvalidPrivateKey)?;

        let point = key.verifying_key().as_affine().to_encoded_point(false);
        // Uncompressed SEC1 is 0x04 || X || Y; the address hashes X || Y.
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);

        Ok(Self { key, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lowercase `0x`-prefixed address.
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }

    /// RLP-encoded signed transaction, ready for `eth_sendRawTransaction`.
    pub fn sign(&self, tx: &LegacyTransaction) -> Result<Vec<u8>, k256::ecdsa::Error> {
        let (signature, recovery) = self.key.sign_prehash_recoverable(&tx.signing_hash())?;
        let v = tx.chain_id * 2 + 35 + u64::from(recovery.is_y_odd());
        let rs = signature.to_bytes();

        let mut stream = RlpStream::new_list(9);
        tx.append_body(&mut stream);
        stream
            .append(&v)
            .append(&trim_leading_zeros(&rs[..32]))
            .append(&trim_leading_zeros(&rs[32..]));
        Ok(stream.out().to_vec())
    }
}

/// Big-endian integers are encoded without leading zero bytes.
fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}
