// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cloud client validation tool.
//!
//! This is a standalone CLI example for exercising the cloud client against a
//! real ownCloud/Nextcloud server. It serves as both a validation tool and
//! example code for using the CloudClient API.

use std::error::Error;
use std::io::{Read as _, Write as _};

use cirrus_cloud::{CloudClient, CloudConfig, CloudError, Tag};
use clap::{Parser, Subcommand};
use colored::Colorize as _;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Cloud client validation tool.
#[derive(Parser)]
#[command(name = "cloud_cli")]
#[command(about = "ownCloud/Nextcloud client validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// DAV root of the server, e.g. https://cloud.example.com/remote.php/dav/
    #[arg(long)]
    server: Option<String>,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password or app token for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls {
        /// Directory path relative to the user's root
        #[arg(default_value = "")]
        path: String,
        /// PROPFIND depth
        #[arg(long, default_value = "1")]
        depth: u32,
    },
    /// Create a directory
    Mkdir {
        /// Directory path
        path: String,
    },
    /// Delete a file or directory
    Rm {
        /// Path to delete
        path: String,
    },
    /// Upload a local file (or "-" for stdin)
    Put {
        /// Local file path
        input: String,
        /// Destination path on the server
        dest: String,
    },
    /// Download a file to stdout or a local path
    Get {
        /// Path on the server
        path: String,
        /// Local output file (stdout if omitted)
        #[arg(long)]
        output: Option<String>,
    },
    /// Check whether a path exists
    Exists {
        /// Path on the server
        path: String,
    },
    /// List system tags
    Tags,
    /// Create a system tag
    TagCreate {
        /// Tag name
        name: String,
        /// Hide the tag from regular users
        #[arg(long)]
        hidden: bool,
    },
    /// Assign a system tag to a file, creating the tag if needed
    Tag {
        /// Path on the server
        path: String,
        /// Tag name
        name: String,
    },
}

impl Cli {
    fn build_config(&self) -> Result<CloudConfig, Box<dyn Error>> {
        // Read from environment variables first
        let server = self
            .server
            .clone()
            .or_else(|| std::env::var("CIRRUS_URL").ok())
            .ok_or("CIRRUS_URL must be provided via --server or CIRRUS_URL env var")?;

        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("CIRRUS_USERNAME").ok())
            .ok_or("CIRRUS_USERNAME must be provided via --username or CIRRUS_USERNAME env var")?;

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("CIRRUS_PASSWORD").ok())
            .ok_or("CIRRUS_PASSWORD must be provided via --password or CIRRUS_PASSWORD env var")?;

        let mut config = CloudConfig::new(server, username, password);
        config.timeout_secs = self.timeout;
        config.user_agent = "cirrus-cloud-cli/0.1.0".to_string();
        Ok(config)
    }
}

async fn cmd_ls(client: &CloudClient, path: &str, depth: u32) -> Result<(), CloudError> {
    let listing = client.list_directory(path, depth).await?;

    if listing.responses.is_empty() {
        println!("Nothing found");
        return Ok(());
    }

    println!("{:-<100}", "");
    println!("{:<60} {:>12} {:<10} {:<16}", "Href", "Size", "Id", "Type");
    println!("{:-<100}", "");

    for response in &listing.responses {
        let Some(prop) = response.properties.first() else {
            println!("{}", response.href);
            continue;
        };
        let kind = if prop.is_collection() {
            "directory".blue().to_string()
        } else {
            prop.content_type.clone()
        };
        let size = prop
            .content_length_bytes()
            .or_else(|| prop.size_bytes())
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{:<60} {:>12} {:<10} {:<16}",
            response.href, size, prop.file_id, kind
        );
    }

    Ok(())
}

async fn cmd_mkdir(client: &CloudClient, path: &str) -> Result<(), CloudError> {
    client.mkdir(path).await?;
    println!("{}", "✓ Directory ready".green());
    Ok(())
}

async fn cmd_rm(client: &CloudClient, path: &str) -> Result<(), CloudError> {
    client.delete(path).await?;
    println!("{}", "✓ Deleted".green());
    Ok(())
}

async fn cmd_exists(client: &CloudClient, path: &str) {
    if client.exists(path).await {
        println!("{}", "✓ Exists".green());
    } else {
        println!("{}", "✗ Does not exist".red());
    }
}

async fn cmd_put(client: &CloudClient, input: &str, dest: &str) -> Result<(), Box<dyn Error>> {
    let content = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(input)?
    };

    let len = content.len();
    client.upload(content, dest).await?;
    println!("{}", "✓ Uploaded".green());
    println!("{dest} ({len} bytes)");
    Ok(())
}

async fn cmd_get(
    client: &CloudClient,
    path: &str,
    output: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let content = client.download(path).await?;
    match output {
        Some(file) => {
            std::fs::write(file, &content)?;
            println!("{}", "✓ Downloaded".green());
            println!("{path} -> {file} ({} bytes)", content.len());
        }
        None => std::io::stdout().write_all(&content)?,
    }
    Ok(())
}

async fn cmd_tags(client: &CloudClient) -> Result<(), CloudError> {
    let tags = client.system_tags().await?;

    println!("{:-<80}", "");
    println!("{:<8} {:<30} {:<10} {:<10}", "Id", "Name", "Visible", "Assignable");
    println!("{:-<80}", "");

    for prop in tags.responses.iter().flat_map(|r| &r.properties) {
        if prop.id.is_empty() {
            continue;
        }
        let flag = |v: Option<bool>| v.map_or_else(|| "?".to_string(), |b| b.to_string());
        println!(
            "{:<8} {:<30} {:<10} {:<10}",
            prop.id,
            prop.display_name,
            flag(prop.is_user_visible()),
            flag(prop.is_user_assignable()),
        );
    }

    Ok(())
}

async fn cmd_tag_create(client: &CloudClient, name: &str, hidden: bool) -> Result<(), CloudError> {
    let mut tag = Tag::new(name);
    tag.user_visible = !hidden;

    if client.add_system_tag(&tag).await? {
        println!("{}", "✓ Tag created".green());
    } else {
        println!("{}", "⚠ Tag already exists".yellow());
    }
    Ok(())
}

async fn cmd_tag(client: &CloudClient, path: &str, name: &str) -> Result<(), CloudError> {
    if client.add_tag(path, &Tag::new(name)).await? {
        println!("{}", "✓ Tag assigned".green());
    } else {
        println!("{}", "⚠ Tag already assigned or file not found".yellow());
    }
    Ok(())
}

/// Format error for user-friendly display.
fn format_error(err: &(dyn Error + 'static)) -> String {
    let label = "Error:".red().bold();
    match err.downcast_ref::<CloudError>() {
        Some(CloudError::NotFound(href)) => format!("{label} Resource not found: {href}"),
        Some(CloudError::Server {
            status, exception, ..
        }) if status.as_u16() == 401 || status.as_u16() == 403 => {
            format!("{label} Authentication failed ({exception})")
        }
        Some(CloudError::Http(e)) => {
            format!("{label} Network error - check server URL and connection: {e}")
        }
        _ => format!("{label} {err}"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env files (if they exist)
    // Priority: .env.local (highest) -> .env -> existing environment variables (lowest)
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("cirrus_cloud=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.build_config()?;
    let client = CloudClient::new(config)?;

    // Create a new runtime for the async operations
    let runtime = tokio::runtime::Runtime::new()?;

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Ls { path, depth } => cmd_ls(&client, &path, depth).await.map_err(Into::into),
            Commands::Mkdir { path } => cmd_mkdir(&client, &path).await.map_err(Into::into),
            Commands::Rm { path } => cmd_rm(&client, &path).await.map_err(Into::into),
            Commands::Put { input, dest } => cmd_put(&client, &input, &dest).await,
            Commands::Get { path, output } => cmd_get(&client, &path, output.as_deref()).await,
            Commands::Exists { path } => {
                cmd_exists(&client, &path).await;
                Ok(())
            }
            Commands::Tags => cmd_tags(&client).await.map_err(Into::into),
            Commands::TagCreate { name, hidden } => {
                cmd_tag_create(&client, &name, hidden).await.map_err(Into::into)
            }
            Commands::Tag { path, name } => cmd_tag(&client, &path, &name).await.map_err(Into::into),
        }
    });

    if let Err(e) = result {
        // Flush stdout before printing error
        std::io::stdout().flush().ok();
        eprintln!("{}", format_error(&*e));
        std::process::exit(1);
    }

    Ok(())
}
