//! Chain commands - issuance status and token account lookup

use crate::display;
use solbound_inventory::Inventory;
use solbound_issuer::{allocate, decide, MintError};
use solbound_registry::{AssetRegistry, ChainRpc, RpcClient};
use solbound_tx::programs::token::associated_token_address;
use solbound_types::{parse_address, Pubkey};

/// Compare the inventory against what the chain reports as minted
pub async fn status(inventory: &Inventory, rpc: &RpcClient, collection: &Pubkey, verbose: bool) -> anyhow::Result<()> {
    let issued = rpc.scan_issued(collection).await?;
    let header = rpc.fetch_collection(collection).await?;

    display::section("Issuance Status");
    display::labeled("RPC", rpc.url());
    display::labeled("Collection", &collection.to_string());
    display::labeled("Update authority", &header.update_authority.to_string());
    display::labeled("Collection size", &header.current_size.to_string());

    let decisions: Vec<_> = inventory.iter().map(|entry| decide(entry, &issued)).collect();
    let minted = decisions.iter().filter(|d| d.already_issued).count();

    println!();
    display::issuance_counts(inventory.len(), minted);

    let unknown = issued
        .iter()
        .filter(|asset| inventory.find(&asset.public_identity).is_none())
        .count();
    if unknown > 0 {
        display::warning(&format!("{} minted assets do not belong to this inventory", unknown));
    }

    match allocate(inventory, &issued) {
        Ok(next) => display::labeled(
            "Next item",
            &format!("{} ({})", next.item.display_name, next.public_identity),
        ),
        Err(MintError::InventoryExhausted { .. }) => display::warning("All items have been minted"),
        Err(e) => return Err(e.into()),
    }

    if verbose {
        println!();
        for decision in &decisions {
            let owner = issued.get(&decision.entry.public_identity).map(|asset| asset.owner);
            println!(
                "{}",
                display::issuance_row(
                    &decision.entry.item.display_name,
                    &decision.entry.public_identity,
                    owner.as_ref(),
                )
            );
        }
    }

    Ok(())
}

/// Print the associated token account of `owner` for `mint`
pub fn derive_ata(owner: &str, mint: &str) -> anyhow::Result<()> {
    let owner = parse_address(owner)?;
    let mint = parse_address(mint)?;
    let ata = associated_token_address(&owner, &mint)?;

    println!("{}", ata);
    Ok(())
}
