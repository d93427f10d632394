//! Inspect and exercise the module registry
//!
//! Usage:
//!   module-registry [--config <path>] [--log <filter>] eligible
//!   module-registry [--config <path>] locate
//!   module-registry [--config <path>] boot

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use module_registry::config::{LoggingConfig, RegistryConfig};
use module_registry::module::builtin::registry_from_config;
use module_registry::module::registry::{ModuleLocator, SystemProbe};
use module_registry::utils::init_logging_from_config;

#[derive(Parser, Debug)]
#[command(name = "module-registry", about = "Module lifecycle registry tool")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the modules eligible under the current configuration
    Eligible,
    /// Print the resolved modules base directory
    Locate,
    /// Load, initialize and shut down the eligible built-in modules
    Boot,
}

fn load_config(args: &Args) -> anyhow::Result<RegistryConfig> {
    let mut config = match &args.config {
        Some(path) => RegistryConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(filter) = &args.log {
        config.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging_from_config(config.logging.as_ref());

    match args.command {
        Command::Eligible => {
            let registry = registry_from_config(&config);
            for name in registry.eligible_modules()? {
                println!("{name}");
            }
        }
        Command::Locate => {
            let probe = SystemProbe::with_package_root(config.locator.package_root.clone());
            println!("{}", ModuleLocator::new(probe).base_dir().display());
        }
        Command::Boot => {
            let registry = registry_from_config(&config);
            registry.load_modules(None).await?;
            registry.init_modules().await?;

            let settings = registry.settings();
            for name in registry.active_modules() {
                let module_settings = settings
                    .get(&name)
                    .map(serde_json::Value::to_string)
                    .unwrap_or_else(|| "null".to_string());
                println!("{name}\t{module_settings}");
            }
            info!(entities = registry.entities().len(), "Boot complete");

            registry.shutdown_all().await?;
        }
    }

    Ok(())
}
