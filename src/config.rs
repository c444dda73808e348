//! Program and market configuration, read from JSON.
//!
//! Addresses are base58 strings. A minimal program configuration is `{}`, which targets the
//! default program id with no undocumented discriminators.
use std::path::Path;

use serde::{Deserialize, Serialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::{ClientError, ClientResult},
    instruction::DiscriminatorTable,
    pda::MarketAddresses,
    quantization::MarketGranularity,
};

pub(crate) mod base58 {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_program::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| D::Error::custom(format!("invalid address {s}: {e}")))
    }
}

fn default_program_id() -> Pubkey {
    crate::ID
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramConfig {
    #[serde(with = "base58", default = "default_program_id")]
    pub program_id: Pubkey,
    #[serde(default)]
    pub discriminators: DiscriminatorTable,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            discriminators: DiscriminatorTable::default(),
        }
    }
}

impl ProgramConfig {
    pub fn new(program_id: Pubkey, discriminators: DiscriminatorTable) -> ClientResult<Self> {
        discriminators.validate()?;
        Ok(Self {
            program_id,
            discriminators,
        })
    }

    pub fn from_json(json: &str) -> ClientResult<Self> {
        let config: Self = parse(json, "program")?;
        config.discriminators.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        Self::from_json(&read(path.as_ref())?)
    }
}

/// One market's addresses and integer grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    #[serde(with = "base58")]
    pub market: Pubkey,
    #[serde(with = "base58")]
    pub base_mint: Pubkey,
    #[serde(with = "base58")]
    pub quote_mint: Pubkey,
    #[serde(with = "base58")]
    pub fee_collector: Pubkey,
    pub granularity: MarketGranularity,
}

impl MarketConfig {
    pub fn from_json(json: &str) -> ClientResult<Self> {
        let config: Self = parse(json, "market")?;
        config.granularity.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        Self::from_json(&read(path.as_ref())?)
    }

    pub fn addresses(&self, program_id: &Pubkey) -> ClientResult<MarketAddresses> {
        MarketAddresses::derive(program_id, &self.market, &self.base_mint, &self.quote_mint)
    }
}

fn parse<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> ClientResult<T> {
    serde_json::from_str(json).map_err(|e| {
        msg!("Failed to parse {} configuration: {}", what, e);
        ClientError::config(format!("malformed {what} configuration: {e}"))
    })
}

fn read(path: &Path) -> ClientResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        msg!("Failed to read {}: {}", path.display(), e);
        ClientError::config(format!("cannot read {}: {e}", path.display()))
    })
}
