//! Static ABI tables and call encoding
//!
//! The auction contract, the ERC-721 mint entry point and the deployable
//! ERC-721 collection are described by JSON ABI documents compiled into the
//! binary and parsed once on first use with `alloy-json-abi`. Encoding goes
//! through `alloy-dyn-abi`; this module only maps arguments supplied by
//! parameter name onto the declared inputs and checks their types first, so
//! a typo in a name is reported instead of silently reordering words.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use alloy_primitives::U256;
//! use auction_agent_core::abi::{auction_abi, encode_call, function};
//! use auction_agent_core::types::AbiValue;
//!
//! let finalize = function(auction_abi()?, "finalizeAuction")?;
//! let mut args = BTreeMap::new();
//! args.insert("tokenId".to_string(), AbiValue::Uint(U256::from(1u64)));
//! let calldata = encode_call(finalize, &args)?;
//! assert_eq!(calldata.len(), 4 + 32);
//! # Ok::<(), auction_agent_core::Error>(())
//! ```

use std::collections::BTreeMap;

use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use once_cell::sync::OnceCell;

pub use alloy_json_abi::{Constructor, Function, JsonAbi, Param, StateMutability};

use crate::error::{Error, Result};
use crate::types::AbiValue;

/// ABI of the deployed NFT auction contract
pub const AUCTION_ABI_JSON: &str = r#"[
  {
    "type": "function",
    "name": "createAuction",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "nftContract", "type": "address" },
      { "name": "tokenId", "type": "uint256" },
      { "name": "startingPrice", "type": "uint256" },
      { "name": "duration", "type": "uint256" }
    ],
    "outputs": []
  },
  {
    "type": "function",
    "name": "bid",
    "stateMutability": "payable",
    "inputs": [{ "name": "tokenId", "type": "uint256" }],
    "outputs": []
  },
  {
    "type": "function",
    "name": "finalizeAuction",
    "stateMutability": "nonpayable",
    "inputs": [{ "name": "tokenId", "type": "uint256" }],
    "outputs": []
  },
  {
    "type": "event",
    "name": "AuctionCreated",
    "anonymous": false,
    "inputs": [
      { "name": "tokenId", "type": "uint256", "indexed": true },
      { "name": "startingPrice", "type": "uint256", "indexed": false },
      { "name": "endTime", "type": "uint256", "indexed": false }
    ]
  },
  {
    "type": "event",
    "name": "BidPlaced",
    "anonymous": false,
    "inputs": [
      { "name": "tokenId", "type": "uint256", "indexed": true },
      { "name": "bidder", "type": "address", "indexed": true },
      { "name": "amount", "type": "uint256", "indexed": false }
    ]
  },
  {
    "type": "event",
    "name": "AuctionFinalized",
    "anonymous": false,
    "inputs": [
      { "name": "tokenId", "type": "uint256", "indexed": true },
      { "name": "winner", "type": "address", "indexed": true },
      { "name": "amount", "type": "uint256", "indexed": false }
    ]
  }
]"#;

/// Minimal ERC-721 ABI used for minting
pub const ERC721_MINT_ABI_JSON: &str = r#"[
  {
    "type": "function",
    "name": "mint",
    "stateMutability": "payable",
    "inputs": [
      { "name": "to", "type": "address" },
      { "name": "quantity", "type": "uint256" }
    ],
    "outputs": []
  }
]"#;

/// ERC-721 collection deployed by `deploy_nft`
///
/// Creation bytecode supplied through `nft.collection_bytecode` must take
/// these constructor arguments.
pub const ERC721_COLLECTION_ABI_JSON: &str = r#"[
  {
    "type": "constructor",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "name", "type": "string" },
      { "name": "symbol", "type": "string" },
      { "name": "baseURI", "type": "string" }
    ]
  },
  {
    "type": "function",
    "name": "mint",
    "stateMutability": "payable",
    "inputs": [
      { "name": "to", "type": "address" },
      { "name": "quantity", "type": "uint256" }
    ],
    "outputs": []
  }
]"#;

static AUCTION_ABI: OnceCell<JsonAbi> = OnceCell::new();
static ERC721_MINT_ABI: OnceCell<JsonAbi> = OnceCell::new();
static ERC721_COLLECTION_ABI: OnceCell<JsonAbi> = OnceCell::new();

/// Parsed auction contract ABI
pub fn auction_abi() -> Result<&'static JsonAbi> {
    AUCTION_ABI.get_or_try_init(|| parse_abi(AUCTION_ABI_JSON))
}

/// Parsed ERC-721 mint ABI
pub fn erc721_mint_abi() -> Result<&'static JsonAbi> {
    ERC721_MINT_ABI.get_or_try_init(|| parse_abi(ERC721_MINT_ABI_JSON))
}

/// Parsed ABI of the deployable ERC-721 collection
pub fn erc721_collection_abi() -> Result<&'static JsonAbi> {
    ERC721_COLLECTION_ABI.get_or_try_init(|| parse_abi(ERC721_COLLECTION_ABI_JSON))
}

/// Parse a JSON ABI document
pub fn parse_abi(json: &str) -> Result<JsonAbi> {
    serde_json::from_str(json).map_err(|e| Error::abi(format!("Failed to parse ABI: {}", e)))
}

/// Look up a function by name; overloads resolve to the first declaration
pub fn function<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a Function> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| Error::abi(format!("Function '{}' not found in ABI", name)))
}

/// Constructor of a deployable contract
pub fn constructor(abi: &JsonAbi) -> Result<&Constructor> {
    abi.constructor
        .as_ref()
        .ok_or_else(|| Error::abi("ABI declares no constructor"))
}

/// Whether a function accepts attached value
pub fn is_payable(function: &Function) -> bool {
    function.state_mutability == StateMutability::Payable
}

/// Encode a call (selector and arguments) from arguments keyed by name
pub fn encode_call(function: &Function, arguments: &BTreeMap<String, AbiValue>) -> Result<Vec<u8>> {
    let signature = function.signature();
    let values = ordered_values(&function.inputs, arguments, &signature)?;
    function
        .abi_encode_input(&values)
        .map_err(|e| Error::abi(format!("Failed to encode {}: {}", signature, e)))
}

/// Encode constructor arguments, to be appended to creation bytecode
pub fn encode_constructor(
    constructor: &Constructor,
    arguments: &BTreeMap<String, AbiValue>,
) -> Result<Vec<u8>> {
    let values = ordered_values(&constructor.inputs, arguments, "constructor")?;
    constructor
        .abi_encode_input(&values)
        .map_err(|e| Error::abi(format!("Failed to encode constructor: {}", e)))
}

/// Arrange named arguments in declaration order, checking names and types
fn ordered_values(
    inputs: &[Param],
    arguments: &BTreeMap<String, AbiValue>,
    context: &str,
) -> Result<Vec<DynSolValue>> {
    if let Some(name) = arguments
        .keys()
        .find(|name| !inputs.iter().any(|param| &param.name == *name))
    {
        return Err(Error::abi(format!(
            "Unexpected argument '{}' for {}",
            name, context
        )));
    }

    inputs
        .iter()
        .map(|param| {
            let value = arguments.get(&param.name).ok_or_else(|| {
                Error::abi(format!("Missing argument '{}' for {}", param.name, context))
            })?;
            let expected: DynSolType = param.resolve().map_err(|e| {
                Error::abi(format!(
                    "Unsupported parameter type '{}' for '{}': {}",
                    param.ty, param.name, e
                ))
            })?;
            let encoded = value.to_sol_value();
            if !expected.matches(&encoded) {
                return Err(Error::abi(format!(
                    "Argument '{}' expects {}, got {}",
                    param.name,
                    param.ty,
                    value.type_name()
                )));
            }
            Ok(encoded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    #[test]
    fn test_auction_abi_functions() -> Result<()> {
        let abi = auction_abi()?;
        let mut names: Vec<&str> = abi.functions().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["bid", "createAuction", "finalizeAuction"]);

        assert_eq!(
            function(abi, "createAuction")?.signature(),
            "createAuction(address,uint256,uint256,uint256)"
        );
        assert!(is_payable(function(abi, "bid")?));
        assert!(!is_payable(function(abi, "finalizeAuction")?));
        assert!(matches!(function(abi, "cancelAuction"), Err(Error::Abi(_))));
        assert_eq!(abi.events().count(), 3);
        Ok(())
    }

    #[test]
    fn test_known_selector() -> Result<()> {
        // transfer(address,uint256) is the ERC-20 selector 0xa9059cbb
        let abi = parse_abi(
            r#"[{"type":"function","name":"transfer","stateMutability":"nonpayable",
                "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
                "outputs":[{"name":"","type":"bool"}]}]"#,
        )?;
        assert_eq!(
            function(&abi, "transfer")?.selector().as_slice(),
            &[0xa9, 0x05, 0x9c, 0xbb]
        );
        Ok(())
    }

    #[test]
    fn test_encode_create_auction() -> Result<()> {
        let create = function(auction_abi()?, "createAuction")?;
        let nft: Address = "0x1111111111111111111111111111111111111111"
            .parse()
            .unwrap();

        let mut args = BTreeMap::new();
        args.insert("nftContract".to_string(), AbiValue::Address(nft));
        args.insert("tokenId".to_string(), AbiValue::Uint(U256::from(7u64)));
        args.insert(
            "startingPrice".to_string(),
            AbiValue::Uint(U256::from(100_000_000_000_000_000u64)),
        );
        args.insert("duration".to_string(), AbiValue::Uint(U256::from(86_400u64)));

        let calldata = encode_call(create, &args)?;
        assert_eq!(calldata.len(), 4 + 4 * 32);
        assert_eq!(&calldata[..4], create.selector().as_slice());
        // address is left padded
        assert!(calldata[4..16].iter().all(|b| *b == 0));
        assert_eq!(&calldata[16..36], nft.as_slice());
        // token id word
        assert_eq!(calldata[36 + 31], 7);
        // duration word ends with 86400 = 0x015180
        assert_eq!(&calldata[129..], &[0x01, 0x51, 0x80]);
        Ok(())
    }

    #[test]
    fn test_encode_rejects_bad_arguments() -> Result<()> {
        let bid = function(auction_abi()?, "bid")?;

        let empty = BTreeMap::new();
        assert!(matches!(encode_call(bid, &empty), Err(Error::Abi(_))));

        let mut wrong_type = BTreeMap::new();
        wrong_type.insert("tokenId".to_string(), AbiValue::Address(Address::ZERO));
        let err = encode_call(bid, &wrong_type).unwrap_err();
        assert!(err.to_string().contains("expects uint256, got address"));

        let mut extra = BTreeMap::new();
        extra.insert("tokenId".to_string(), AbiValue::Uint(U256::from(1u64)));
        extra.insert("amount".to_string(), AbiValue::Uint(U256::from(1u64)));
        let err = encode_call(bid, &extra).unwrap_err();
        assert!(err.to_string().contains("Unexpected argument 'amount'"));
        Ok(())
    }

    #[test]
    fn test_erc721_mint_abi() -> Result<()> {
        let mint = function(erc721_mint_abi()?, "mint")?;
        assert_eq!(mint.signature(), "mint(address,uint256)");
        Ok(())
    }

    #[test]
    fn test_encode_collection_constructor() -> Result<()> {
        let collection = constructor(erc721_collection_abi()?)?;

        let mut args = BTreeMap::new();
        args.insert("name".to_string(), AbiValue::from("MyNFT"));
        args.insert("symbol".to_string(), AbiValue::from("MNFT"));
        args.insert(
            "baseURI".to_string(),
            AbiValue::from("https://example.com/nft/"),
        );

        let encoded = encode_constructor(collection, &args)?;
        // three head offsets, then length and one padded word per string
        assert_eq!(encoded.len(), 3 * 32 + 3 * 64);
        assert_eq!(encoded[31], 0x60);
        assert_eq!(encoded[3 * 32 + 31], 5);
        assert_eq!(&encoded[4 * 32..4 * 32 + 5], b"MyNFT");

        args.remove("symbol");
        let err = encode_constructor(collection, &args).unwrap_err();
        assert!(err.to_string().contains("Missing argument 'symbol'"));

        assert!(matches!(constructor(auction_abi()?), Err(Error::Abi(_))));
        Ok(())
    }
}
