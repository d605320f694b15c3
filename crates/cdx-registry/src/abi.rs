//! # ABI encoding for registry calls
//!
//! Hand-rolled encoding for the two contract entry points this stack
//! touches: `mint(address,address,uint256,bytes)` and `ownerOf(uint256)`.
//! Selectors are computed from the signature string at runtime rather than
//! hard-coded, with known-vector tests pinning the values.
//!
//! Static arguments occupy one 32-byte slot each; the dynamic `bytes`
//! argument holds an offset in its head slot pointing at a length-prefixed,
//! right-padded tail.

use cdx_core::{hex, keccak256_bytes, EvmAddress, TokenId};

/// `mint(address owner, address holder, uint256 tokenId, bytes remarks)`.
pub const MINT_SIGNATURE: &str = "mint(address,address,uint256,bytes)";

/// ERC-721 `ownerOf(uint256 tokenId)`.
pub const OWNER_OF_SIGNATURE: &str = "ownerOf(uint256)";

/// Compute the 4-byte function selector for a signature string.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256_bytes(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encode `mint` calldata as `0x`-prefixed hex.
///
/// `remarks` is the raw ciphertext bytes (already encrypted; the empty
/// marker decodes to a single zero byte).
pub fn encode_mint(
    owner: &EvmAddress,
    holder: &EvmAddress,
    token_id: &TokenId,
    remarks: &[u8],
) -> String {
    let mut data = Vec::with_capacity(4 + 32 * 6 + remarks.len());
    data.extend_from_slice(&selector(MINT_SIGNATURE));

    data.extend_from_slice(&pad_address(owner));
    data.extend_from_slice(&pad_address(holder));
    data.extend_from_slice(token_id.as_bytes());
    // Offset of the bytes tail: four static head slots.
    data.extend_from_slice(&encode_usize(4 * 32));

    data.extend_from_slice(&encode_usize(remarks.len()));
    data.extend_from_slice(remarks);
    let trailing = remarks.len() % 32;
    if trailing != 0 {
        data.extend_from_slice(&[0u8; 32][..32 - trailing]);
    }

    hex::bytes_to_hex_prefixed(&data)
}

/// Encode `ownerOf` calldata as `0x`-prefixed hex.
pub fn encode_owner_of(token_id: &TokenId) -> String {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&selector(OWNER_OF_SIGNATURE));
    data.extend_from_slice(token_id.as_bytes());
    hex::bytes_to_hex_prefixed(&data)
}

/// Left-pad a 20-byte address into a 32-byte slot.
fn pad_address(address: &EvmAddress) -> [u8; 32] {
    let mut slot = [0u8; 32];
    slot[12..].copy_from_slice(address.as_bytes());
    slot
}

/// Encode a usize as a big-endian 32-byte word.
fn encode_usize(value: usize) -> [u8; 32] {
    let mut slot = [0u8; 32];
    slot[24..].copy_from_slice(&(value as u64).to_be_bytes());
    slot
}
