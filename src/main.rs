use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tower_lsp::Server;
use tracing_subscriber::EnvFilter;

use labsp::render;
use labsp::{
    build_registry, create_service, create_service_with_registry, discover_registry,
    load_settings, FunctionRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "labsp", version, about = "Lab-automation function registry and LSP")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// settings.toml to use instead of searching from the current directory.
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the language server over stdio (default).
    Serve,
    /// Print the help page for one function.
    Show {
        name: String,
    },
    /// List registered function names in registration order.
    List {
        /// Only names starting with this prefix (case-insensitive).
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Write a markdown help site.
    Docs {
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    // stdout carries the LSP channel; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labsp=info")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);
    let settings = cli.common.settings.as_deref();

    match command {
        Command::Serve => {
            // Without --settings the server discovers them from the workspace root.
            let registry = settings.map(|p| load_registry(Some(p))).transpose()?;
            serve(registry)?;
        }
        Command::Show { name } => {
            let registry = load_registry(settings)?;
            let descriptor = registry.lookup(&name)?;
            print!("{}", render::descriptor_markdown(descriptor));
        }
        Command::List { prefix } => {
            let registry = load_registry(settings)?;
            match prefix {
                Some(prefix) => {
                    for descriptor in registry.with_prefix(&prefix) {
                        println!("{}", descriptor.name);
                    }
                }
                None => {
                    for name in registry.names() {
                        println!("{}", name);
                    }
                }
            }
        }
        Command::Docs { out } => {
            let registry = load_registry(settings)?;
            let written = render::write_help_site(&registry, &out)
                .with_context(|| format!("failed to write help site to {}", out.display()))?;
            println!("wrote {} pages to {}", written, out.display());
        }
    }
    Ok(())
}

/// Build the registry from an explicit settings file, or discover settings
/// from the current directory.
fn load_registry(settings: Option<&Path>) -> Result<FunctionRegistry> {
    let Some(path) = settings else {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        return Ok(discover_registry(&cwd));
    };
    if !path.is_file() {
        anyhow::bail!("settings file {} does not exist", path.display());
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(build_registry(&load_settings(path), dir))
}

#[tokio::main]
async fn serve(registry: Option<FunctionRegistry>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = match registry {
        Some(registry) => create_service_with_registry(registry.into()),
        None => create_service(),
    };
    Server::new(stdin, stdout, socket).serve(service).await;
    Ok(())
}
