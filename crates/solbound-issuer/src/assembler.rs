//! Transaction assembly
//!
//! One mint is one atomic transaction:
//!
//! 1. `CreateV2`: mint the picked item into the collection, owned by the requester
//! 2. `BurnChecked`: burn the configured amount from the requester's token account
//! 3. `SetComputeUnitPrice`
//!
//! The requester pays fees and signs last. The server fills the collection
//! authority's and the new asset's signature slots.

use crate::{MintError, Result};
use solbound_crypto::TxSigner;
use solbound_tx::programs::{compute_budget, mpl_core, token};
use solbound_tx::{Instruction, V0Message, VersionedTransaction};
use solbound_types::{parse_address, Hash, InventoryItem, Pubkey};
use std::borrow::Cow;

/// Characters of a rejected requester input kept for logs
pub const REQUESTER_EXCERPT_CHARS: usize = 64;

/// Burn and fee parameters, fixed by configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeParams {
    pub fungible_mint: Pubkey,
    pub burn_amount: u64,
    pub burn_decimals: u8,
    pub compute_unit_price: u64,
}

/// Everything a mint transaction is built from
pub struct AssemblyInput<'a> {
    pub item: &'a InventoryItem,
    pub requester: Pubkey,
    pub metadata_uri: &'a str,
    pub collection: Pubkey,
    pub category_attribute: &'a str,
    pub authority: &'a dyn TxSigner,
    pub item_signer: &'a dyn TxSigner,
    pub fees: &'a FeeParams,
    pub recent_blockhash: Hash,
}

/// A partially signed mint transaction
#[derive(Debug, Clone)]
pub struct TransactionEnvelope {
    pub transaction: VersionedTransaction,
    /// Address of the asset the transaction creates
    pub asset: Pubkey,
}

impl TransactionEnvelope {
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.transaction.message.fee_payer()
    }

    pub fn to_base64(&self) -> Result<String> {
        Ok(self.transaction.to_base64()?)
    }
}

/// Validate a requester-supplied address
pub fn parse_requester(input: &str) -> Result<Pubkey> {
    parse_address(input).map_err(|_| MintError::InvalidRequesterIdentity {
        input: requester_excerpt(input).into_owned(),
    })
}

/// Bounded form of untrusted requester input, safe to log
pub fn requester_excerpt(input: &str) -> Cow<'_, str> {
    match input.char_indices().nth(REQUESTER_EXCERPT_CHARS) {
        None => Cow::Borrowed(input),
        Some((cut, _)) => Cow::Owned(format!("{}... ({} bytes)", &input[..cut], input.len())),
    }
}

/// Instructions in execution order
pub fn build_instructions(input: &AssemblyInput<'_>) -> Result<Vec<Instruction>> {
    let create = mpl_core::create_v2(&mpl_core::CreateAssetArgs {
        asset: input.item_signer.pubkey(),
        collection: input.collection,
        authority: input.authority.pubkey(),
        payer: input.requester,
        owner: input.requester,
        name: input.item.display_name.clone(),
        uri: input.metadata_uri.to_string(),
        attributes: vec![mpl_core::Attribute {
            key: input.category_attribute.to_string(),
            value: input.item.category.clone(),
        }],
    });

    let token_account = token::associated_token_address(&input.requester, &input.fees.fungible_mint)?;
    let burn = token::burn_checked(
        &token_account,
        &input.fees.fungible_mint,
        &input.requester,
        input.fees.burn_amount,
        input.fees.burn_decimals,
    );

    let priority = compute_budget::set_compute_unit_price(input.fees.compute_unit_price);

    Ok(vec![create, burn, priority])
}

/// Compile and partially sign the mint transaction
pub fn assemble(input: &AssemblyInput<'_>) -> Result<TransactionEnvelope> {
    let instructions = build_instructions(input)?;
    let message = V0Message::compile(&input.requester, &instructions, input.recent_blockhash)?;

    let mut transaction = VersionedTransaction::new_unsigned(message);
    transaction.partial_sign(&[input.authority, input.item_signer])?;

    tracing::debug!(
        requester = %input.requester,
        asset = %input.item_signer.pubkey(),
        accounts = transaction.message.account_keys.len(),
        "Assembled mint transaction"
    );

    Ok(TransactionEnvelope {
        transaction,
        asset: input.item_signer.pubkey(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solbound_crypto::{verify, Keypair};
    use solbound_tx::programs::{compute_budget::is_set_compute_unit_price, mpl_core::is_create_v2};
    use solbound_tx::programs::token::{decode_burn_checked, is_burn_checked};
    use solbound_types::SecretKeyMaterial;

    struct Fixture {
        authority: Keypair,
        item_signer: Keypair,
        item: InventoryItem,
        fees: FeeParams,
        requester: Pubkey,
    }

    fn fixture() -> Fixture {
        let item_signer = Keypair::from_seed(&[21; 32]);
        Fixture {
            authority: Keypair::from_seed(&[20; 32]),
            item: InventoryItem {
                private_identity: SecretKeyMaterial::from_bytes(vec![21; 32]).unwrap(),
                display_name: "OG #21".to_string(),
                category: "Legendary".to_string(),
                image_ref: "21.png".to_string(),
            },
            item_signer,
            fees: FeeParams {
                fungible_mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263".parse().unwrap(),
                burn_amount: 1_000_000_000,
                burn_decimals: 9,
                compute_unit_price: 100,
            },
            requester: Keypair::from_seed(&[22; 32]).pubkey(),
        }
    }

    fn input(f: &Fixture) -> AssemblyInput<'_> {
        AssemblyInput {
            item: &f.item,
            requester: f.requester,
            metadata_uri: "https://gateway.test/meta",
            collection: Pubkey::new([30; 32]),
            category_attribute: "Rarity",
            authority: &f.authority,
            item_signer: &f.item_signer,
            fees: &f.fees,
            recent_blockhash: Hash::new([31; 32]),
        }
    }

    #[test]
    fn test_instruction_order() {
        let f = fixture();
        let envelope = assemble(&input(&f)).unwrap();
        let message = &envelope.transaction.message;

        let programs: Vec<_> = message
            .instructions
            .iter()
            .map(|ix| (*message.program_id(ix).unwrap(), ix.data.clone()))
            .collect();

        assert_eq!(programs.len(), 3);
        assert!(is_create_v2(&programs[0].0, &programs[0].1));
        assert!(is_burn_checked(&programs[1].0, &programs[1].1));
        assert!(is_set_compute_unit_price(&programs[2].0, &programs[2].1));
        assert_eq!(decode_burn_checked(&programs[1].1), Some((1_000_000_000, 9)));
    }

    #[test]
    fn test_requester_pays_and_signs_last() {
        let f = fixture();
        let envelope = assemble(&input(&f)).unwrap();

        assert_eq!(envelope.fee_payer(), Some(&f.requester));
        assert_eq!(envelope.asset, f.item_signer.pubkey());
        assert_eq!(envelope.transaction.missing_signers(), vec![f.requester]);

        let message = envelope.transaction.message.serialize().unwrap();
        for signer in [&f.authority, &f.item_signer] {
            let sig = envelope.transaction.signature_of(&signer.pubkey()).unwrap();
            assert!(verify(&signer.pubkey(), &message, sig).unwrap());
        }
    }

    #[test]
    fn test_burn_source_is_requester_token_account() {
        let f = fixture();
        let instructions = build_instructions(&input(&f)).unwrap();
        let expected = token::associated_token_address(&f.requester, &f.fees.fungible_mint).unwrap();
        assert_eq!(instructions[1].accounts[0].pubkey, expected);
        assert_eq!(instructions[1].accounts[2].pubkey, f.requester);
    }

    #[test]
    fn test_parse_requester() {
        assert!(matches!(
            parse_requester("not-an-address"),
            Err(MintError::InvalidRequesterIdentity { .. })
        ));
        assert!(parse_requester("8kMLNM2TGXRu9drhceN3ZxqoDPYWgcjZJBr9HiCUfxzn").is_ok());
    }

    #[test]
    fn test_rejected_requester_is_truncated() {
        let huge = "x".repeat(10_000);
        match parse_requester(&huge) {
            Err(MintError::InvalidRequesterIdentity { input }) => {
                assert!(input.starts_with(&"x".repeat(REQUESTER_EXCERPT_CHARS)));
                assert!(input.ends_with("... (10000 bytes)"));
                assert!(input.len() < 100);
            }
            other => panic!("unexpected {:?}", other.map(|p| p.to_string())),
        }
    }

    #[test]
    fn test_requester_excerpt() {
        assert_eq!(requester_excerpt("short"), "short");
        let exact = "a".repeat(REQUESTER_EXCERPT_CHARS);
        assert_eq!(requester_excerpt(&exact), exact.as_str());

        // multi-byte characters are never split
        let wide = "é".repeat(REQUESTER_EXCERPT_CHARS + 1);
        let excerpt = requester_excerpt(&wide);
        assert!(excerpt.starts_with(&"é".repeat(REQUESTER_EXCERPT_CHARS)));
        assert!(excerpt.ends_with(&format!("({} bytes)", wide.len())));
    }
}
