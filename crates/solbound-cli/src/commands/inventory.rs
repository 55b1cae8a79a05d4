//! Inventory commands - seal and inspect the encrypted item list

use crate::display;
use anyhow::Context;
use colored::*;
use solbound_inventory::{CiphertextSource, Inventory, InventoryStore};
use solbound_types::InventoryItem;
use std::path::Path;

/// Validate a plaintext inventory document and return its sealed form
pub fn seal_document(store: &InventoryStore, plaintext: &str) -> anyhow::Result<(String, usize)> {
    let items: Vec<InventoryItem> =
        serde_json::from_str(plaintext).context("input is not an inventory document")?;

    // Rejects unusable keys and duplicate identities before anything is written.
    let inventory = Inventory::from_items(items.clone())?;

    Ok((store.seal(&items)?, inventory.len()))
}

/// Encrypt a plaintext inventory file
pub fn encrypt(store: &InventoryStore, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let plaintext = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let (sealed, count) = seal_document(store, &plaintext)?;

    match output {
        Some(path) => {
            std::fs::write(path, &sealed).with_context(|| format!("cannot write {}", path.display()))?;
            display::success(&format!("Sealed {} items into {}", count, path.display()));
        }
        None => println!("{}", sealed),
    }
    Ok(())
}

/// List decrypted items with their derived identities
///
/// Secret key material is never printed.
pub fn inspect(store: &InventoryStore, source: &CiphertextSource, json: bool) -> anyhow::Result<()> {
    let inventory = store.load(source)?;

    if json {
        let listing: Vec<_> = inventory
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "asset": entry.public_identity.to_string(),
                    "name": entry.item.display_name,
                    "type": entry.item.category,
                    "image": entry.item.image_ref,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    display::section(&format!("Inventory ({} items)", inventory.len()));
    for (index, entry) in inventory.iter().enumerate() {
        println!(
            "  {:>4}  {}  {:<24} {:<12} {}",
            index,
            entry.public_identity.to_string().bright_cyan(),
            entry.item.display_name,
            entry.item.category.bright_yellow(),
            entry.item.image_ref.bright_black()
        );
    }
    Ok(())
}
