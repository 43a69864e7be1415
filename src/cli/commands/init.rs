//! `daybook init` command - initialize the data directory

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::identity::EntityKind;
use crate::core::store::{NumberData, RegistryData, Store, YamlStore};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let data_dir = global.data_dir.clone().unwrap_or_else(|| config.data_dir());

    std::fs::create_dir_all(&data_dir).into_diagnostic()?;

    // seed the sidecars; never clobber an existing directory's state
    let store = YamlStore::new(&data_dir);
    if !data_dir.join("registry.yaml").exists() {
        store
            .store_registry(&RegistryData::default())
            .into_diagnostic()?;
    }
    if !data_dir.join("numbers.yaml").exists() {
        store.store_numbers(&NumberData::new()).into_diagnostic()?;
    }

    println!(
        "{} Initialized daybook data directory at {}",
        style("✓").green(),
        style(data_dir.display()).cyan()
    );
    println!();
    println!("Collections (created on first write):");
    for kind in EntityKind::all() {
        println!(
            "  {}",
            style(format!("{}.yaml", kind.collection_name())).dim()
        );
    }
    println!();
    println!("Next steps:");
    println!(
        "  {} Create your first task",
        style("daybook task new \"water the plants\"").yellow()
    );
    println!("  {} List tasks", style("daybook task list").yellow());
    println!(
        "  {} Write a journal line",
        style("daybook log new \"started using daybook\"").yellow()
    );
    Ok(())
}
