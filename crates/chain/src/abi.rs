// Copyright (C) 2015-2025 The Surety Project.
//
// abi.rs file belongs to the surety project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Contract ABI codec.
//!
//! Encodes method calls and decodes return data and event payloads using
//! the standard 32-byte-word head/tail layout. Only the parameter kinds the
//! deployed contracts actually use are supported; anything else is an
//! explicit `ChainError::Abi`.

use crate::error::{ChainError, ChainResult};
use sha3::{Digest, Keccak256};
use surety_primitives::{Address, Wei};

const WORD: usize = 32;

/// A single ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 20-byte account identifier, right-aligned in its word.
    Address(Address),
    /// Unsigned integer up to 128 bits (covers uint8 through uint256
    /// values this system handles; larger values fail decoding).
    Uint(u128),
    /// Boolean flag.
    Bool(bool),
    /// Dynamic UTF-8 string.
    String(String),
    /// Array of tokens (decode only).
    Array(Vec<Token>),
}

impl Token {
    /// Extracts an address, if this token is one.
    pub fn into_address(self) -> ChainResult<Address> {
        match self {
            Token::Address(a) => Ok(a),
            other => Err(ChainError::abi(format!("expected address, got {other:?}"))),
        }
    }

    /// Extracts an unsigned integer, if this token is one.
    pub fn into_uint(self) -> ChainResult<u128> {
        match self {
            Token::Uint(v) => Ok(v),
            other => Err(ChainError::abi(format!("expected uint, got {other:?}"))),
        }
    }

    /// Extracts a boolean, if this token is one.
    pub fn into_bool(self) -> ChainResult<bool> {
        match self {
            Token::Bool(b) => Ok(b),
            other => Err(ChainError::abi(format!("expected bool, got {other:?}"))),
        }
    }

    /// Extracts a string, if this token is one.
    pub fn into_string(self) -> ChainResult<String> {
        match self {
            Token::String(s) => Ok(s),
            other => Err(ChainError::abi(format!("expected string, got {other:?}"))),
        }
    }

    /// Extracts an array, if this token is one.
    pub fn into_array(self) -> ChainResult<Vec<Token>> {
        match self {
            Token::Array(items) => Ok(items),
            other => Err(ChainError::abi(format!("expected array, got {other:?}"))),
        }
    }

    fn is_dynamic(&self) -> bool {
        matches!(self, Token::String(_))
    }
}

/// A parameter kind, used to drive decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte account identifier.
    Address,
    /// Unsigned integer of any declared width.
    Uint,
    /// Boolean flag.
    Bool,
    /// Dynamic UTF-8 string.
    String,
    /// Dynamic array of a static element kind.
    Array(Box<ParamType>),
    /// Fixed-size array of a static element kind.
    FixedArray(Box<ParamType>, usize),
}

impl ParamType {
    fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Number of head words the kind occupies when static.
    fn head_words(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, len) if !self.is_dynamic() => {
                inner.head_words() * len
            }
            _ => 1,
        }
    }
}

/// Computes the 4-byte selector for a method signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Computes the topic-0 hash for an event signature, `0x`-prefixed.
#[must_use]
pub fn event_topic(signature: &str) -> String {
    let digest = Keccak256::digest(signature.as_bytes());
    format!("0x{}", hex::encode(digest))
}

/// Encodes a list of arguments into calldata (without selector).
///
/// # Errors
///
/// Returns `ChainError::Abi` for argument kinds the codec does not emit
/// (arrays are decode-only; no method of the deployed contracts takes one).
pub fn encode(tokens: &[Token]) -> ChainResult<Vec<u8>> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
            append_tail(&mut tail, token)?;
        } else {
            head.extend_from_slice(&static_word(token)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encodes a full method call: selector followed by the encoded arguments.
///
/// # Errors
///
/// Propagates `ChainError::Abi` from argument encoding.
pub fn encode_function(signature: &str, tokens: &[Token]) -> ChainResult<Vec<u8>> {
    let mut out = selector(signature).to_vec();
    out.extend_from_slice(&encode(tokens)?);
    Ok(out)
}

fn static_word(token: &Token) -> ChainResult<[u8; WORD]> {
    match token {
        Token::Address(addr) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr.as_bytes());
            Ok(word)
        }
        Token::Uint(value) => Ok(uint_word(*value)),
        Token::Bool(flag) => Ok(uint_word(u128::from(*flag))),
        other => Err(ChainError::abi(format!(
            "unsupported static argument: {other:?}"
        ))),
    }
}

fn append_tail(tail: &mut Vec<u8>, token: &Token) -> ChainResult<()> {
    match token {
        Token::String(s) => {
            tail.extend_from_slice(&uint_word(s.len() as u128));
            tail.extend_from_slice(s.as_bytes());
            let rem = s.len() % WORD;
            if rem != 0 {
                tail.extend(std::iter::repeat(0u8).take(WORD - rem));
            }
            Ok(())
        }
        other => Err(ChainError::abi(format!(
            "unsupported dynamic argument: {other:?}"
        ))),
    }
}

fn uint_word(value: u128) -> [u8; WORD] {
    Wei(value).to_be_word()
}

/// Decodes return data or an event payload against the expected kinds.
///
/// # Errors
///
/// Returns `ChainError::Abi` on truncated data, out-of-range offsets, or
/// values wider than the codec's 128-bit integer limit.
pub fn decode(kinds: &[ParamType], data: &[u8]) -> ChainResult<Vec<Token>> {
    let mut tokens = Vec::with_capacity(kinds.len());
    let mut offset = 0usize;

    for kind in kinds {
        if kind.is_dynamic() {
            let at = read_uint(data, offset)? as usize;
            tokens.push(decode_dynamic(kind, data, at)?);
            offset += WORD;
        } else {
            tokens.push(decode_static(kind, data, offset)?);
            offset += kind.head_words() * WORD;
        }
    }

    Ok(tokens)
}

fn decode_static(kind: &ParamType, data: &[u8], offset: usize) -> ChainResult<Token> {
    match kind {
        ParamType::Address => {
            let word = read_word(data, offset)?;
            Ok(Token::Address(Address::from_bytes(&word[12..])?))
        }
        ParamType::Uint => Ok(Token::Uint(read_uint(data, offset)?)),
        ParamType::Bool => Ok(Token::Bool(read_uint(data, offset)? != 0)),
        ParamType::FixedArray(inner, len) => {
            let mut items = Vec::with_capacity(*len);
            let stride = inner.head_words() * WORD;
            for i in 0..*len {
                items.push(decode_static(inner, data, offset + i * stride)?);
            }
            Ok(Token::Array(items))
        }
        other => Err(ChainError::abi(format!("{other:?} is not static"))),
    }
}

fn decode_dynamic(kind: &ParamType, data: &[u8], at: usize) -> ChainResult<Token> {
    match kind {
        ParamType::String => {
            let len = read_uint(data, at)? as usize;
            let start = at.checked_add(WORD).ok_or_else(offset_overflow)?;
            let end = start.checked_add(len).ok_or_else(offset_overflow)?;
            let bytes = data
                .get(start..end)
                .ok_or_else(|| ChainError::abi("string data out of bounds".to_string()))?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| ChainError::abi(format!("invalid utf-8 string: {e}")))?;
            Ok(Token::String(text))
        }
        ParamType::Array(inner) => {
            if inner.is_dynamic() {
                return Err(ChainError::abi(
                    "arrays of dynamic elements are not supported".to_string(),
                ));
            }
            let len = read_uint(data, at)? as usize;
            let base = at.checked_add(WORD).ok_or_else(offset_overflow)?;
            let stride = inner.head_words() * WORD;
            let mut items = Vec::with_capacity(len);
            for i in 0..len {
                items.push(decode_static(inner, data, base + i * stride)?);
            }
            Ok(Token::Array(items))
        }
        other => Err(ChainError::abi(format!("{other:?} is not dynamic"))),
    }
}

fn read_word(data: &[u8], offset: usize) -> ChainResult<[u8; WORD]> {
    let end = offset.checked_add(WORD).ok_or_else(offset_overflow)?;
    let slice = data
        .get(offset..end)
        .ok_or_else(|| ChainError::abi(format!("word at {offset} out of bounds")))?;
    let mut word = [0u8; WORD];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_uint(data: &[u8], offset: usize) -> ChainResult<u128> {
    let word = read_word(data, offset)?;
    Ok(Wei::from_be_word(&word)
        .map_err(|e| ChainError::abi(e.to_string()))?
        .value())
}

fn offset_overflow() -> ChainError {
    ChainError::abi("offset overflow".to_string())
}
