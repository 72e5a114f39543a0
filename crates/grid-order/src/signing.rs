//! EIP-712 typed-data signing and canonical order hashing.
//!
//! The order hash is the EIP-712 signing hash
//! (`keccak256(0x1901 || domain_separator || struct_hash)`) under the
//! protocol's domain for the target chain. The matching service
//! computes the same hash independently, so agreement must be
//! bit-exact.

use alloy::primitives::{address, Address, B256, PrimitiveSignature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer as AlloySigner;
use alloy::sol;
use alloy::sol_types::eip712_domain;
use alloy::sol_types::SolStruct;
use async_trait::async_trait;

use crate::error::SigningError;
use crate::order::LimitOrder;

/// EIP-712 domain constants for the order protocol.
pub const EIP712_DOMAIN_NAME: &str = "1inch Aggregation Router";
pub const EIP712_DOMAIN_VERSION: &str = "6";
/// The protocol's verifying contract, deployed at the same address on
/// every supported chain.
pub const EIP712_VERIFYING_CONTRACT: Address =
    address!("111111125421cA6dC452d289314280a0f8842A65");

sol! {
    /// On-chain order layout, hashed field-for-field.
    #[derive(Debug)]
    struct Order {
        uint256 salt;
        address maker;
        address receiver;
        address makerAsset;
        address takerAsset;
        uint256 makingAmount;
        uint256 takingAmount;
        uint256 makerTraits;
    }
}

impl From<&LimitOrder> for Order {
    fn from(order: &LimitOrder) -> Self {
        Self {
            salt: order.salt,
            maker: order.maker,
            receiver: order.receiver,
            makerAsset: order.maker_asset,
            takerAsset: order.taker_asset,
            makingAmount: order.making_amount,
            takingAmount: order.taking_amount,
            makerTraits: order.maker_traits.as_raw(),
        }
    }
}

/// A signed order plus its canonical hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOrder {
    pub order: LimitOrder,
    /// 65-byte `r || s || v` signature, 0x-prefixed hex, v in {27, 28}.
    pub signature: String,
    pub order_hash: B256,
}

/// Delegated signing capability supplied by an externally connected
/// wallet. Awaiting it may block indefinitely on human interaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExternalSigner: Send + Sync {
    async fn sign_order_digest(&self, digest: B256) -> Result<PrimitiveSignature, SigningError>;
}

/// The identity signing an order as maker.
pub enum MakerSigner {
    /// Hot-wallet key held in process; signs locally, no network.
    Local(PrivateKeySigner),
    /// User-wallet delegation; suspension point.
    Delegated(Box<dyn ExternalSigner>),
}

impl std::fmt::Debug for MakerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(signer) => f
                .debug_tuple("MakerSigner::Local")
                .field(&signer.address())
                .finish(),
            Self::Delegated(_) => f.write_str("MakerSigner::Delegated"),
        }
    }
}

/// Compute the canonical order hash for a chain.
///
/// Pure function of the order fields and `chain_id`: same inputs, same
/// hash; any field change, different hash.
pub fn order_hash(order: &LimitOrder, chain_id: u64) -> B256 {
    let domain = eip712_domain! {
        name: EIP712_DOMAIN_NAME,
        version: EIP712_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: EIP712_VERIFYING_CONTRACT,
    };
    Order::from(order).eip712_signing_hash(&domain)
}

/// Sign an order for `chain_id` with the given maker identity.
///
/// Does not retry: a declined or failed signature surfaces as
/// `SigningError` and the caller decides what happens to the record.
pub async fn sign_order(
    order: &LimitOrder,
    chain_id: u64,
    signer: &MakerSigner,
) -> Result<SignedOrder, SigningError> {
    let digest = order_hash(order, chain_id);

    let signature = match signer {
        MakerSigner::Local(key) => key.sign_hash(&digest).await?,
        MakerSigner::Delegated(external) => external.sign_order_digest(digest).await?,
    };

    Ok(SignedOrder {
        order: order.clone(),
        signature: encode_signature(&signature),
        order_hash: digest,
    })
}

/// Encode a signature as the 65-byte hex string the orderbook expects.
pub fn encode_signature(signature: &PrimitiveSignature) -> String {
    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(&signature.r().to_be_bytes::<32>());
    bytes.extend_from_slice(&signature.s().to_be_bytes::<32>());
    bytes.push(if signature.v() { 28 } else { 27 });
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::build_limit_order;
    use crate::traits::MakerTraits;
    use alloy::primitives::U256;
    use grid_core::{OrderSide, TokenRef, TradeIntent};
    use rust_decimal_macros::dec;

    // Well-known test private key (DO NOT use in production)
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_signer() -> PrivateKeySigner {
        TEST_PRIVATE_KEY.parse().unwrap()
    }

    fn sample_order() -> LimitOrder {
        LimitOrder {
            salt: U256::from(42u64),
            maker: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
                .parse()
                .unwrap(),
            receiver: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
                .parse()
                .unwrap(),
            maker_asset: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
                .parse()
                .unwrap(),
            taker_asset: "0xdac17f958d2ee523a2206206994597c13d831ec7"
                .parse()
                .unwrap(),
            making_amount: U256::from(100_000_000_000_000_000u128),
            taking_amount: U256::from(234_000_000u64),
            maker_traits: MakerTraits::new()
                .with_expiration(1_700_000_000)
                .with_nonce(7)
                .allow_partial_fills()
                .allow_multiple_fills(),
        }
    }

    #[test]
    fn test_order_hash_deterministic() {
        let order = sample_order();
        assert_eq!(order_hash(&order, 1), order_hash(&order, 1));
    }

    #[test]
    fn test_order_hash_changes_with_chain_id() {
        let order = sample_order();
        assert_ne!(order_hash(&order, 1), order_hash(&order, 137));
    }

    #[test]
    fn test_order_hash_sensitive_to_every_field() {
        let base = sample_order();
        let base_hash = order_hash(&base, 1);

        let variants = [
            LimitOrder {
                salt: U256::from(43u64),
                ..base.clone()
            },
            LimitOrder {
                making_amount: base.making_amount + U256::ONE,
                ..base.clone()
            },
            LimitOrder {
                taking_amount: base.taking_amount + U256::ONE,
                ..base.clone()
            },
            LimitOrder {
                receiver: base.maker_asset,
                ..base.clone()
            },
            LimitOrder {
                maker_traits: base.maker_traits.with_nonce(8),
                ..base.clone()
            },
        ];

        for variant in variants {
            assert_ne!(order_hash(&variant, 1), base_hash, "variant: {variant:?}");
        }
    }

    #[tokio::test]
    async fn test_local_signing_produces_wire_format_signature() {
        let order = sample_order();
        let signer = MakerSigner::Local(test_signer());

        let signed = sign_order(&order, 1, &signer).await.unwrap();

        // 0x + 65 bytes hex = 132 chars; the submission endpoint
        // validates exactly this shape.
        assert_eq!(signed.signature.len(), 132);
        assert!(signed.signature.starts_with("0x"));
        let v = u8::from_str_radix(&signed.signature[130..], 16).unwrap();
        assert!(v == 27 || v == 28);
        assert_eq!(signed.order_hash, order_hash(&order, 1));
    }

    #[tokio::test]
    async fn test_local_signing_is_deterministic() {
        // RFC 6979: same key + same digest = same signature.
        let order = sample_order();
        let signer = MakerSigner::Local(test_signer());

        let a = sign_order(&order, 1, &signer).await.unwrap();
        let b = sign_order(&order, 1, &signer).await.unwrap();
        assert_eq!(a.signature, b.signature);
    }

    #[tokio::test]
    async fn test_delegated_signer_is_invoked_with_order_digest() {
        let order = sample_order();
        let expected_digest = order_hash(&order, 137);

        let mut external = MockExternalSigner::new();
        external
            .expect_sign_order_digest()
            .withf(move |digest| *digest == expected_digest)
            .times(1)
            .returning(|digest| {
                // Any valid signature will do; produce one synchronously
                // from the test key.
                let signer = test_signer();
                let sig = alloy::signers::SignerSync::sign_hash_sync(&signer, &digest).unwrap();
                Ok(sig)
            });

        let signer = MakerSigner::Delegated(Box::new(external));
        let signed = sign_order(&order, 137, &signer).await.unwrap();
        assert_eq!(signed.signature.len(), 132);
    }

    #[tokio::test]
    async fn test_delegated_decline_surfaces_reason() {
        let mut external = MockExternalSigner::new();
        external
            .expect_sign_order_digest()
            .returning(|_| Err(SigningError::Declined("user rejected in wallet".into())));

        let signer = MakerSigner::Delegated(Box::new(external));
        let err = sign_order(&sample_order(), 1, &signer).await.unwrap_err();
        match err {
            SigningError::Declined(reason) => assert!(reason.contains("user rejected")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_built_order_signs_end_to_end() {
        let base = TokenRef::new(
            "WETH",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
                .parse()
                .unwrap(),
            18,
            "Wrapped Ether",
        );
        let quote = TokenRef::new(
            "USDT",
            "0xdac17f958d2ee523a2206206994597c13d831ec7"
                .parse()
                .unwrap(),
            6,
            "Tether USD",
        );
        let intent = TradeIntent::new(OrderSide::Sell, dec!(2340), dec!(0.1), "WETH", "test");

        let key = test_signer();
        let order = build_limit_order(&intent, &base, &quote, key.address(), 60).unwrap();
        let signed = sign_order(&order, 1, &MakerSigner::Local(key)).await.unwrap();

        assert_eq!(signed.order.maker, signed.order.receiver);
        assert_eq!(signed.signature.len(), 132);
    }
}
