// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the JSON Schema of the namespace manifest.

use anyhow::Result;
use namespace_reconciler::types::NamespaceManifest;

fn main() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&NamespaceManifest::json_schema())?);
    Ok(())
}
