//! Utility functions for identifier minting

use bech32::Bech32m;
use uuid7::uuid7;

// construct a unique id from a fresh uuid then encode using bech32
pub fn new_bech32_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Deal handles are minted under the `deal_` prefix.
pub fn new_deal_id() -> anyhow::Result<String> {
    new_bech32_id("deal_")
}

/// Party addresses in tests and demos use the `user_` prefix.
pub fn new_party_addr() -> anyhow::Result<String> {
    new_bech32_id("user_")
}
