use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use precompile_bind_core::{
    config::DEFAULT_CONFIG_FILE, find_matching_abi_method_with, load_abi_file, AbiTable, Binder,
    BindingConfig, ImplManifest, MatchPolicy, NativeMethod,
};
use std::path::Path;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "precompile-bind")]
#[command(about = "Validate precompile implementations against their contract ABI", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind every method of an implementation manifest to the ABI
    Check {
        /// Path to the JSON ABI file
        #[arg(long)]
        abi: String,

        /// Path to the implementation manifest
        #[arg(long = "impl")]
        impl_path: String,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,

        /// Match policy: first or strict
        #[arg(long)]
        policy: Option<String>,

        /// Fail when an ABI method has no implementation
        #[arg(long)]
        require_complete: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Show which ABI method each native name would bind to
    Match {
        /// Path to the JSON ABI file
        #[arg(long)]
        abi: String,

        /// Match policy: first or strict
        #[arg(long, default_value = "first")]
        policy: String,

        /// Native method names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the methods declared by an ABI file
    Methods {
        /// Path to the JSON ABI file
        #[arg(long)]
        abi: String,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "precompile_bind=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Check {
            abi,
            impl_path,
            config,
            policy,
            require_complete,
            format,
        } => {
            check_command(abi, impl_path, config, policy, require_complete, format)?;
        }
        Commands::Match { abi, policy, names } => {
            match_command(abi, policy, names)?;
        }
        Commands::Methods { abi, format } => {
            methods_command(abi, format)?;
        }
        Commands::Init { path, force } => {
            init_command(&path, force)?;
            println!("{} {}", "Wrote".green().bold(), path);
        }
    }

    Ok(())
}

fn parse_policy(policy: &str) -> Result<MatchPolicy> {
    MatchPolicy::from_str(policy).ok_or_else(|| anyhow!("unknown match policy '{}', expected first or strict", policy))
}

fn check_command(
    abi_path: String,
    impl_path: String,
    config_path: Option<String>,
    policy: Option<String>,
    require_complete: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut config = BindingConfig::load(config_path.as_deref())?;

    // Command-line flags win over the config file
    if let Some(policy) = policy {
        config = config.with_policy(parse_policy(&policy)?);
    }
    if require_complete {
        config = config.require_complete();
    }

    let table = load_abi_file(&abi_path)?;
    let manifest = ImplManifest::load(&impl_path)?;
    debug!(abi = %abi_path, methods = manifest.methods.len(), "loaded inputs");

    let report = Binder::new(table, config).bind_all(&manifest.precompile, &manifest.methods);

    if format == OutputFormat::Json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        report.print_human();
    }

    if report.is_ok() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}

fn match_command(abi_path: String, policy: String, names: Vec<String>) -> Result<()> {
    let table = load_abi_file(&abi_path)?;
    let policy = parse_policy(&policy)?;

    for name in names {
        let native = NativeMethod::new(name.as_str());
        match find_matching_abi_method_with(&native, &table, policy) {
            Ok(Some(abi_name)) => println!("{} → {}", name, abi_name.green()),
            Ok(None) => println!("{} → {}", name, "-".dimmed()),
            Err(err) => println!("{} → {}", name, err.to_string().red()),
        }
    }

    Ok(())
}

fn methods_command(abi_path: String, format: OutputFormat) -> Result<()> {
    let table = load_abi_file(&abi_path)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&methods_json(&table))?);
    } else {
        println!("ABI methods in {}:\n", abi_path);
        for method in table.methods() {
            let inputs: Vec<String> = method.inputs.iter().map(|t| t.full_name()).collect();
            let outputs: Vec<String> = method.outputs.iter().map(|t| t.full_name()).collect();
            let outputs = if outputs.is_empty() {
                "(none)".yellow().to_string()
            } else {
                outputs.join(", ")
            };
            println!("  {}({}) → {}", method.name.bold(), inputs.join(", "), outputs);
        }
        println!("\nTotal: {} methods", table.len());
    }

    Ok(())
}

fn init_command(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        return Err(anyhow!("{} already exists, pass --force to overwrite", path));
    }
    BindingConfig::default().save(path)
}

fn methods_json(table: &AbiTable) -> serde_json::Value {
    let methods: Vec<_> = table
        .methods()
        .map(|method| {
            json!({
                "name": method.name,
                "inputs": method.inputs.iter().map(|t| t.full_name()).collect::<Vec<_>>(),
                "outputs": method.outputs.iter().map(|t| t.full_name()).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "total": table.len(), "methods": methods })
}
