//! Podkit CLI, a command-line client for Linked Data Platform pods
//!
//! Talks to a pod over HTTP through `PodClient`. `podkit demo` runs the
//! microblog flow against an in-memory pod instead.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use futures::StreamExt;
use podkit::{
    AclGrant, Catalog, MemoryPod, PodClient, PodConfig, ResolvedResource, ResolvedValue, Shape,
    ShapeInstance,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "podkit", version, about = "Linked Data Platform pod client")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "PODKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a profile card
    Profile {
        /// WebID, e.g. https://alice.example/profile/card#me
        webid: String,
    },
    /// List the channels of every workspace in a space document
    Containers {
        /// Document listing the workspaces
        space: String,
    },
    /// List the posts of a channel
    Resources {
        /// Channel container URI
        container: String,
    },
    /// Create a channel in a workspace
    NewChannel {
        /// Workspace container URI
        space: String,

        #[arg(long)]
        title: String,

        #[command(flatten)]
        author: Author,
    },
    /// Create a post in a channel
    NewPost {
        /// Channel container URI
        container: String,

        #[arg(long)]
        body: String,

        #[command(flatten)]
        author: Author,
    },
    /// Replace the ACL of a resource or container
    Acl {
        uri: String,

        /// WebID of the owner
        #[arg(long)]
        owner: String,

        /// Extra access mode (read, write, append, control)
        #[arg(long = "mode")]
        modes: Vec<String>,

        /// Agent granted the extra modes; none means public
        #[arg(long = "agent")]
        agents: Vec<String>,
    },
    /// Delete a resource and its ACL
    DeleteResource { uri: String },
    /// Delete a container, its members, ACL and metadata
    DeleteContainer { uri: String },
    /// Run the microblog flow against an in-memory pod
    Demo,
}

#[derive(clap::Args)]
struct Author {
    /// Author display name
    #[arg(long = "author-name", requires = "webid")]
    name: Option<String>,

    /// Author WebID
    #[arg(long = "author-webid", id = "webid")]
    webid: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    let config = load_config(cli.config.as_ref())?;
    let client = PodClient::connect(config)?;
    let catalog = Catalog::new(client.vocabulary())?;

    match cli.command {
        Commands::Profile { webid } => {
            let profile = client.fetch_profile(&webid, catalog.user_account()).await?;
            print_resources(catalog.user_account(), &[profile], &format)
        }
        Commands::Containers { space } => {
            let channels = collect_containers(&client, &space, catalog.channel()).await?;
            print_resources(catalog.channel(), &channels, &format)
        }
        Commands::Resources { container } => {
            let posts = client.list_resources(&container, catalog.post()).await?;
            print_resources(catalog.post(), &posts, &format)
        }
        Commands::NewChannel { space, title, author } => {
            let channel = with_author(&catalog, catalog.new_channel(&title)?, &author)?;
            let created = client.create_container(&space, &channel).await?;
            print_json_or(&created, &format, || {
                println!("Created channel {}", created.container_uri)
            })
        }
        Commands::NewPost { container, body, author } => {
            let post = with_author(&catalog, catalog.new_post(&body)?, &author)?;
            let created = client.create_resource(&container, &post).await?;
            print_json_or(&created, &format, || {
                println!("Created post {}", created.resource_uri)
            })
        }
        Commands::Acl { uri, owner, modes, agents } => {
            let grant = (!modes.is_empty()).then(|| AclGrant::agents(modes, agents));
            let update = client.set_acl(&uri, &owner, grant.as_ref()).await?;
            print_json_or(&update, &format, || println!("Wrote {}", update.acl_uri))
        }
        Commands::DeleteResource { uri } => {
            let report = client.delete_resource(&uri).await?;
            print_deleted(&report.deleted, &format)
        }
        Commands::DeleteContainer { uri } => {
            let report = client.delete_container(&uri).await?;
            print_deleted(&report.deleted, &format)
        }
        Commands::Demo => run_demo(&format).await,
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PodConfig> {
    let config = match path {
        Some(path) => PodConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PodConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn with_author(catalog: &Catalog, mut instance: ShapeInstance, author: &Author) -> Result<ShapeInstance> {
    if let Some(webid) = &author.webid {
        let name = author.name.as_deref().unwrap_or_default();
        instance.set("owner", catalog.new_creator(name, webid)?)?;
    }
    Ok(instance)
}

/// Every workspace batch, logging failed workspaces instead of stopping
async fn collect_containers(
    client: &PodClient,
    space: &str,
    shape: &Shape,
) -> Result<Vec<ResolvedResource>> {
    let mut batches = client.list_containers(space, shape).await?;
    let mut channels = Vec::new();
    while let Some(batch) = batches.next().await {
        match batch {
            Ok(batch) => channels.extend(batch),
            Err(e) => eprintln!("Warning: {}", e),
        }
    }
    Ok(channels)
}

fn print_resources(shape: &Shape, resources: &[ResolvedResource], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(resources)?);
        }
        OutputFormat::Table => {
            if resources.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let columns: Vec<&str> = shape.properties().map(|(name, _)| name).collect();
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&columns);

            for resource in resources {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|name| format_value(resource.get(name)))
                    .collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", resources.len());
        }
    }
    Ok(())
}

fn format_value(value: Option<&ResolvedValue>) -> String {
    match value {
        Some(ResolvedValue::Text(text)) => text.clone(),
        Some(ResolvedValue::Nested(nested)) => nested
            .text("name")
            .filter(|name| !name.is_empty())
            .or(nested.uri.as_deref())
            .unwrap_or_default()
            .to_string(),
        Some(ResolvedValue::Missing) | None => String::new(),
    }
}

fn print_json_or<T: serde::Serialize>(
    value: &T,
    format: &OutputFormat,
    table: impl FnOnce(),
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => table(),
    }
    Ok(())
}

fn print_deleted(deleted: &[String], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(deleted)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["deleted"]);
            for uri in deleted {
                table.add_row(vec![uri]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

const DEMO_ROOT: &str = "https://alice.example/";
const DEMO_WEBID: &str = "https://alice.example/profile/card#me";

async fn run_demo(format: &OutputFormat) -> Result<()> {
    let pod = Arc::new(MemoryPod::new());
    pod.seed(
        "https://alice.example/profile/card",
        r#"@prefix foaf: <http://xmlns.com/foaf/0.1/> .
           @prefix space: <http://www.w3.org/ns/pim/space#> .
           <#me> foaf:name "Alice" ;
                 foaf:img <https://alice.example/alice.png> ;
                 space:storage <https://alice.example/> ."#,
    )
    .await?;
    let workspace = format!("{DEMO_ROOT}microblog/");
    pod.add_container(&workspace).await;
    let space_doc = format!("{DEMO_ROOT}settings/spaces");
    pod.seed(
        &space_doc,
        &format!("<{workspace}> a <http://rdfs.org/sioc/ns#Space> ."),
    )
    .await?;

    let client = PodClient::new(pod.clone());
    let catalog = Catalog::new(client.vocabulary())?;

    println!("== profile");
    let profile = client.fetch_profile(DEMO_WEBID, catalog.user_account()).await?;
    print_resources(catalog.user_account(), &[profile], format)?;

    let author = catalog.new_creator("Alice", DEMO_WEBID)?;
    let channel = catalog.new_channel("Cooking")?.with("owner", author.clone())?;
    let created = client.create_container(&workspace, &channel).await?;
    info!(container = %created.container_uri, "demo channel created");

    for body in ["Bread rises overnight", "Salt the water"] {
        let post = catalog.new_post(body)?.with("owner", author.clone())?;
        client.create_resource(&created.container_uri, &post).await?;
    }

    println!("== channels");
    let channels = collect_containers(&client, &space_doc, catalog.channel()).await?;
    print_resources(catalog.channel(), &channels, format)?;

    println!("== posts");
    let posts = client
        .list_resources(&created.container_uri, catalog.post())
        .await?;
    print_resources(catalog.post(), &posts, format)?;

    println!("== acl");
    let grant = AclGrant::public(["read"]);
    let update = client
        .set_acl(&created.container_uri, DEMO_WEBID, Some(&grant))
        .await?;
    print_json_or(&update, format, || println!("Wrote {}", update.acl_uri))?;

    println!("== delete");
    let report = client.delete_container(&created.container_uri).await?;
    print_deleted(&report.deleted, format)
}
