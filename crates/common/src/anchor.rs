//! Anchor wire layout helpers
//!
//! Anchor programs prefix instruction data and account data with an
//! 8-byte discriminator derived from a namespaced sha256, followed by the
//! Borsh encoding of the arguments or fields. Only the handful of Borsh
//! shapes the client needs are covered here.

use crate::error::{CommonError, CommonResult};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

pub const DISCRIMINATOR_LEN: usize = 8;

fn namespaced_discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::new()
        .chain_update(namespace.as_bytes())
        .chain_update(b":")
        .chain_update(name.as_bytes())
        .finalize();
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Discriminator for an instruction handler, e.g. `interact_agent`
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_discriminator("global", name)
}

/// Discriminator for an account struct, e.g. `Agent`
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    namespaced_discriminator("account", name)
}

/// Discriminator followed by the Borsh encoding of `args`
pub fn instruction_data<T: BorshSerialize>(instruction: &str, args: &T) -> std::io::Result<Vec<u8>> {
    let mut data = instruction_discriminator(instruction).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

/// Builds instruction data: discriminator followed by Borsh-encoded args
#[derive(Debug, Clone)]
pub struct ArgsWriter {
    data: Vec<u8>,
}

impl ArgsWriter {
    pub fn new(instruction: &str) -> Self {
        Self {
            data: instruction_discriminator(instruction).to_vec(),
        }
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.data.push(value);
        self
    }

    pub fn bool(self, value: bool) -> Self {
        self.u8(value as u8)
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn bytes<const N: usize>(mut self, value: &[u8; N]) -> Self {
        self.data.extend_from_slice(value);
        self
    }

    pub fn pubkey(self, value: &Pubkey) -> Self {
        self.bytes(&value.to_bytes())
    }

    /// Borsh string: u32 length prefix then UTF-8 bytes
    pub fn string(mut self, value: &str) -> Self {
        self.data
            .extend_from_slice(&(value.len() as u32).to_le_bytes());
        self.data.extend_from_slice(value.as_bytes());
        self
    }

    pub fn option_bool(self, value: Option<bool>) -> Self {
        match value {
            Some(v) => self.u8(1).bool(v),
            None => self.u8(0),
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

/// Cursor over Anchor account data, bounds-checked on every read
#[derive(Debug)]
pub struct AccountReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AccountReader<'a> {
    /// Checks the account discriminator and positions the cursor after it
    pub fn new(data: &'a [u8], account: &'static str) -> CommonResult<Self> {
        let mut reader = Self { data, offset: 0 };
        let disc = reader.take(DISCRIMINATOR_LEN)?;
        if disc != account_discriminator(account) {
            return Err(CommonError::DiscriminatorMismatch { account });
        }
        Ok(reader)
    }

    fn take(&mut self, needed: usize) -> CommonResult<&'a [u8]> {
        if self.offset + needed > self.data.len() {
            return Err(CommonError::AccountDataTooSmall {
                offset: self.offset,
                needed,
                len: self.data.len(),
            });
        }
        let slice = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    pub fn u8(&mut self) -> CommonResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> CommonResult<bool> {
        Ok(self.u8()? != 0)
    }

    pub fn u32(&mut self) -> CommonResult<u32> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn u64(&mut self) -> CommonResult<u64> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn array<const N: usize>(&mut self) -> CommonResult<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }

    pub fn pubkey(&mut self) -> CommonResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.array()?))
    }

    pub fn string(&mut self) -> CommonResult<String> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CommonError::InvalidUtf8)
    }

    pub fn option_bool(&mut self) -> CommonResult<Option<bool>> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.bool()?)),
            tag => Err(CommonError::InvalidOptionTag(tag)),
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

/// Prefixes `body` with the discriminator of `account`
///
/// Used to fabricate account data in tests and local fixtures.
pub fn account_data(account: &str, body: &[u8]) -> Vec<u8> {
    let mut data = account_discriminator(account).to_vec();
    data.extend_from_slice(body);
    data
}
