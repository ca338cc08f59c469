use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use mindmap_core::geometry::Size;
use mindmap_model::{Hierarchy, MapNode, parse_document};
use mindmap_runtime::{
    AppMode, DocumentStore, Editor, Export, FileStore, MindMapApp, MindMapConfig, Model, Msg,
    ShareRequest, load_document, load_or_default, parse_share_response, save_document,
};
use reqwest::blocking::Client;

use crate::error::{CliError, Result};

#[derive(Debug, Parser)]
#[command(name = "mindmap", about = "Mind-map document tools", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the locally stored document.
    #[arg(long, global = true, default_value = ".mindmap")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that a file is a usable document.
    Validate { file: PathBuf },

    /// Draw a document as SVG.
    Render(RenderArgs),

    /// Replace the stored document with a file.
    Import { file: PathBuf },

    /// Write the stored document to a dated JSON file.
    Export {
        /// Output file or directory (defaults to the current directory).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Publish the stored document and print the read-only link.
    Share(ShareArgs),

    /// Delete the stored document.
    Reset,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document to draw (defaults to the stored document).
    pub file: Option<PathBuf>,

    /// Write the SVG here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = 1000.0)]
    pub width: f32,

    #[arg(long, default_value_t = 650.0)]
    pub height: f32,

    /// Show every node, ignoring the auto-collapse policy.
    #[arg(long)]
    pub expand_all: bool,
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Base URL of the server.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub server: String,

    #[arg(long = "timeout", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: u64,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => MindMapConfig::from_toml_file(path)?,
        None => MindMapConfig::default(),
    };
    let store = FileStore::new(&cli.store);
    match cli.command {
        Commands::Validate { file } => {
            let summary = validate(&file)?;
            println!("{summary}");
            Ok(())
        }
        Commands::Render(args) => {
            let document = match &args.file {
                Some(path) => read_document(path)?,
                None => stored_document(&config, &store)?,
            };
            let svg = render_svg(config, document, &args)?;
            match &args.output {
                Some(path) => fs::write(path, svg)?,
                None => print!("{svg}"),
            }
            Ok(())
        }
        Commands::Import { file } => {
            import(&config, &store, &file)?;
            println!("Import succeeded.");
            Ok(())
        }
        Commands::Export { output } => {
            let path = export(&config, &store, output.as_deref())?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Share(args) => {
            let url = share(&config, &store, &args)?;
            println!("{url}");
            Ok(())
        }
        Commands::Reset => {
            store.remove(&config.storage_key)?;
            tracing::info!(store = %store.dir().display(), "stored document removed");
            Ok(())
        }
    }
}

fn read_document(path: &Path) -> Result<MapNode> {
    let text = fs::read_to_string(path)?;
    Ok(parse_document(&text)?)
}

/// The stored document. Unlike the editor, the CLI never substitutes the
/// placeholder map for a missing or corrupt entry.
pub fn stored_document(config: &MindMapConfig, store: &dyn DocumentStore) -> Result<MapNode> {
    load_document(store, &config.storage_key)?.ok_or_else(|| CliError::NothingStored {
        key: config.storage_key.clone(),
    })
}

/// One-line description of a valid document.
pub fn validate(path: &Path) -> Result<String> {
    let document = read_document(path)?;
    let mut ids = mindmap_core::IdAllocator::new();
    let hierarchy = Hierarchy::build(document, &mut ids)?;
    let depth = hierarchy.iter().map(|n| n.depth()).max().unwrap_or(0);
    Ok(format!(
        "ok: \"{}\", {} nodes, depth {}",
        hierarchy.root().name(),
        hierarchy.node_count(),
        depth
    ))
}

/// Lay out `document` and serialize the settled frame.
pub fn render_svg(config: MindMapConfig, document: MapNode, args: &RenderArgs) -> Result<String> {
    if !(args.width > 0.0 && args.height > 0.0) {
        return Err(CliError::invalid("width and height must be positive"));
    }
    let mut app = MindMapApp::new(config, AppMode::View, document, Size::new(args.width, args.height))?;
    let _ = app.init();
    if args.expand_all {
        let _ = app.update(Msg::ExpandAll);
    }
    app.finish_animations();
    Ok(app.to_svg())
}

/// Validate `file` and store it as the current document.
pub fn import(config: &MindMapConfig, store: &dyn DocumentStore, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let current = load_or_default(store, &config.storage_key, &config.default_root_name);
    let mut editor = Editor::new(current, true)?;
    editor.import_document(&text)?;
    save_document(store, &config.storage_key, editor.document())?;
    tracing::info!(nodes = editor.document().count(), "document imported");
    Ok(())
}

/// Write the stored document. A directory (or no path) gets the dated
/// default file name.
pub fn export(
    config: &MindMapConfig,
    store: &dyn DocumentStore,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let document = stored_document(config, store)?;
    let export = Export::new(&document, Utc::now());
    let path = match output {
        Some(path) if path.is_dir() => path.join(&export.filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&export.filename),
    };
    fs::write(&path, export.contents)?;
    Ok(path)
}

/// Full share URL for a server base and the configured endpoint.
pub fn share_url(server: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            server.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

/// POST the stored document and return the read-only link.
pub fn share(config: &MindMapConfig, store: &dyn DocumentStore, args: &ShareArgs) -> Result<String> {
    let document = stored_document(config, store)?;
    let request = ShareRequest::new(share_url(&args.server, &config.share_endpoint), &document);
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(args.timeout_seconds))
        .build()?;
    let response = client
        .post(&request.endpoint)
        .header(reqwest::header::CONTENT_TYPE, request.content_type)
        .body(request.body)
        .send()
        .map_err(|e| mindmap_core::MindMapError::network(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.text()?;
    let link = parse_share_response(status, &body)?;
    tracing::info!(url = %link.url, "share link created");
    Ok(link.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_url_joins_paths() {
        assert_eq!(share_url("http://h:5000/", "/api/share"), "http://h:5000/api/share");
        assert_eq!(share_url("http://h", "api/share"), "http://h/api/share");
        assert_eq!(share_url("http://h", "https://x/y"), "https://x/y");
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mindmap", "reset", "--store", "/tmp/maps"]).unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/maps"));
        assert!(matches!(cli.command, Commands::Reset));
    }

    #[test]
    fn render_flags() {
        let cli = Cli::try_parse_from(["mindmap", "render", "map.json", "--expand-all", "-o", "out.svg"])
            .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert!(args.expand_all);
        assert_eq!(args.file, Some(PathBuf::from("map.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.svg")));
        assert_eq!(args.width, 1000.0);
    }
}
