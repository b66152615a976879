//! `deckctl` - CLI for presentdeck
//!
//! This binary provides the command-line interface for listing presentations
//! and managing their asset bundles.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;

use presentdeck::cli::{AssetsCommand, Cli, Command, ConfigCommand};
use presentdeck::{
    init_logging, AssetBundle, AssetRecord, Config, Payload, Playback, PresentationManager,
    Store,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    if let Command::Config(config_cmd) = cli.command {
        return handle_config(&config, config_cmd);
    }

    let store = Store::open(config.database_path())?;
    let manager = PresentationManager::new(store);

    if config.storage.reconcile_on_open && !matches!(cli.command, Command::Repair) {
        manager.reconcile()?;
    }

    let result = match cli.command {
        Command::List(list_cmd) => handle_list(&manager, list_cmd.json),
        Command::Assets(assets_cmd) => handle_assets(&manager, assets_cmd),
        Command::Repair => handle_repair(&manager),
        Command::Status(status_cmd) => handle_status(&manager, status_cmd.json),
        Command::Config(_) => Ok(()),
    };

    finish(result, manager.into_store().close())
}

/// The command's own error wins over a failure to close the store.
fn finish(result: anyhow::Result<()>, closed: presentdeck::Result<()>) -> anyhow::Result<()> {
    if let Err(err) = result {
        if let Err(close_err) = closed {
            tracing::warn!("Failed to close store: {close_err}");
        }
        return Err(err);
    }
    closed?;
    Ok(())
}

fn handle_list(manager: &PresentationManager, json: bool) -> anyhow::Result<()> {
    let presentations = manager.ensure_seeded()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&presentations)?);
        return Ok(());
    }

    for presentation in &presentations {
        let assets = if presentation.has_assets {
            "assets added"
        } else {
            "no assets"
        };
        println!(
            "{:<8} {:<24} {:<28} [{assets}]",
            presentation.id, presentation.title, presentation.description
        );
    }
    Ok(())
}

fn handle_assets(manager: &PresentationManager, cmd: AssetsCommand) -> anyhow::Result<()> {
    match cmd {
        AssetsCommand::Save { id, logos, video } => {
            let [logo1, logo2, logo3] = logos.as_slice() else {
                bail!("exactly 3 logos are required, got {}", logos.len());
            };
            let bundle = AssetBundle::new(
                [read_payload(logo1)?, read_payload(logo2)?, read_payload(logo3)?],
                read_payload(&video)?,
            )?;
            manager.save_assets(&id, bundle)?;
            println!("Saved assets for presentation {id}");
        }
        AssetsCommand::Clear { id } => {
            manager.clear_assets(&id)?;
            println!("Cleared assets for presentation {id}");
        }
        AssetsCommand::Show { id, json } => {
            let assets = playable_assets(manager, &id)?;
            if json {
                let slots: Vec<_> = slots(&assets)
                    .map(|(name, payload)| {
                        serde_json::json!({
                            "slot": name,
                            "mediaType": payload.map(Payload::media_type),
                            "bytes": payload.map(Payload::len),
                            "blake3": payload.map(Payload::digest),
                        })
                    })
                    .collect();
                let output = serde_json::json!({
                    "id": assets.id,
                    "complete": assets.is_complete(),
                    "slots": slots,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Assets for presentation {}", assets.id);
                for (name, payload) in slots(&assets) {
                    match payload {
                        Some(payload) => println!(
                            "  {name:<6} {:<18} {:>10} bytes  {}",
                            payload.media_type(),
                            payload.len(),
                            &payload.digest()[..16]
                        ),
                        None => println!("  {name:<6} (empty)"),
                    }
                }
            }
        }
        AssetsCommand::Export { id, out } => {
            let assets = playable_assets(manager, &id)?;
            std::fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;

            for (name, payload) in slots(&assets) {
                let Some(payload) = payload else { continue };
                let path = out.join(format!(
                    "{name}.{}",
                    payload.file_extension().unwrap_or("bin")
                ));
                std::fs::write(&path, payload.data())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn handle_repair(manager: &PresentationManager) -> anyhow::Result<()> {
    let report = manager.reconcile()?;
    if report.is_clean() {
        println!("Store is consistent, nothing to repair.");
        return Ok(());
    }
    for id in &report.flags_fixed {
        println!("Fixed asset flag for presentation {id}");
    }
    for id in &report.orphans_removed {
        println!("Removed orphaned assets {id}");
    }
    Ok(())
}

fn handle_status(manager: &PresentationManager, json: bool) -> anyhow::Result<()> {
    let store = manager.store();
    let stats = store.stats()?;
    let schema_version = store.schema_version()?;

    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "schema_version": schema_version,
            "presentations": stats.presentations,
            "asset_bundles": stats.asset_bundles,
            "flagged": stats.flagged,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("deckctl status");
        println!("--------------");
        println!("Database:      {}", store.path().display());
        println!("Schema:        v{schema_version}");
        println!("Presentations: {}", stats.presentations);
        println!("Asset bundles: {}", stats.asset_bundles);
        println!("With assets:   {}", stats.flagged);
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!(
                    "  Reconcile on open:  {}",
                    config.storage.reconcile_on_open
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn read_payload(path: &Path) -> anyhow::Result<Payload> {
    Payload::read_file(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Resolve assets for playback, treating "nothing to show" as an error.
fn playable_assets(manager: &PresentationManager, id: &str) -> anyhow::Result<AssetRecord> {
    match manager.assets_for_playback(id)? {
        Playback::Ready(assets) => Ok(assets),
        Playback::Unavailable => bail!("no assets found for presentation {id}"),
    }
}

/// Slot names paired with their payloads, logos first.
fn slots(assets: &AssetRecord) -> impl Iterator<Item = (&'static str, Option<&Payload>)> {
    ["logo1", "logo2", "logo3"]
        .into_iter()
        .zip(assets.logos.iter().map(Option::as_ref))
        .chain(std::iter::once(("video", assets.video.as_ref())))
}
