//! Error types shared by the decoders and instruction builders

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommonError {
    #[error("account data too small: need {needed} bytes at offset {offset}, have {len}")]
    AccountDataTooSmall {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("discriminator mismatch for {account}")]
    DiscriminatorMismatch { account: &'static str },

    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid option tag {0}")]
    InvalidOptionTag(u8),

    #[error("credit score {0} is out of range (max 100)")]
    ScoreOutOfRange(u8),

    #[error("prompt text must not be empty")]
    EmptyPrompt,
}

pub type CommonResult<T> = Result<T, CommonError>;
