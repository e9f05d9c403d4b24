use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use crossterm::style::Stylize;
use serde_json::Value;

use flotiq_cli::api::{ApiError, ContentApiClient, ContentObject, MediaPayload, ReqwestTransport};
use flotiq_cli::config::FileCredentialStore;
use flotiq_cli::logging::init_tracing;
use flotiq_cli::search::SearchSession;

fn print_help() {
    println!("{}", "flotiq-cli - Content API client".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  flotiq-cli <COMMAND> [ARGS]");
    println!();
    println!("{}", "Commands:".yellow());
    println!("  {}                       - List content type definitions", "types".green());
    println!("  {}  <type> [page]         - List objects of a type, one page at a time", "list".green());
    println!("  {}   <type> <id>          - Fetch a single object, hydrated", "get".green());
    println!("  {} <type> [text]        - Search objects; interactive when no text given", "search".green());
    println!("  {} <type> <file|->     - Create an object from a JSON file or stdin", "create".green());
    println!("  {} <type> <id> <file|-> - Replace an object", "update".green());
    println!("  {} <type> <id>          - Delete an object", "delete".green());
    println!("  {} <file>               - Upload a media file", "upload".green());
    println!("  {} --token <t> [--url <u>] - Store credentials", "config".green());
    println!();
    println!("{}", "Environment:".yellow());
    println!("  {} / {} override the stored credentials", "FLOTIQ_API_KEY".green(), "FLOTIQ_API_URL".green());
    println!("  {} controls log verbosity (default: info)", "RUST_LOG".green());
    println!();
    println!("{}", "Interactive search:".yellow());
    println!("  type to offer input to the gate, {} to force a query,", ":go".green());
    println!("  {} <name> to switch content type, {} to leave", ":type".green(), ":quit".green());
}

fn build_client() -> Result<Arc<ContentApiClient>> {
    let store = FileCredentialStore::new()?;
    Ok(Arc::new(ContentApiClient::new(
        Arc::new(ReqwestTransport::new()),
        Arc::new(store),
    )))
}

/// Label used when rendering an object on one line.
fn object_label(object: &ContentObject) -> String {
    for field in ["title", "name", "label"] {
        if let Some(value) = object.fields.get(field).and_then(Value::as_str) {
            return value.to_string();
        }
    }
    String::new()
}

fn print_objects(objects: &[ContentObject]) {
    for object in objects {
        let label = object_label(object);
        if label.is_empty() {
            println!("  {}", object.id.clone().cyan());
        } else {
            println!("  {}  {}", object.id.clone().cyan(), label);
        }
    }
}

async fn cmd_types(client: &ContentApiClient) -> Result<()> {
    match client.list_content_types().await {
        Ok(types) => {
            for ct in &types {
                let label = if ct.label.is_empty() { &ct.name } else { &ct.label };
                println!("{}  {}", ct.name.clone().cyan(), label);
            }
            println!("{} content types", types.len());
            Ok(())
        }
        Err(e) if e.is_no_data() => {
            println!("{}", "No content types defined.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_list(client: &ContentApiClient, type_name: &str, page: u32) -> Result<()> {
    match client.list_content_objects(type_name, page).await {
        Ok(listing) => {
            print_objects(&listing.data);
            match listing.next_page {
                Some(next) => println!(
                    "page {page}/{} - next: flotiq-cli list {type_name} {next}",
                    listing.total_pages
                ),
                None => println!("page {page}/{} - last page", listing.total_pages),
            }
            Ok(())
        }
        Err(e) if e.is_no_data() => {
            println!("{}", format!("No data for {type_name}.").yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_get(client: &ContentApiClient, type_name: &str, id: &str) -> Result<()> {
    let object = client.get_content_object(type_name, id).await?;
    println!("{}", serde_json::to_string_pretty(&object)?);
    Ok(())
}

async fn cmd_search_once(client: &ContentApiClient, type_name: &str, text: &str) -> Result<()> {
    let results = client.search(type_name, text).await?;
    print_objects(&results);
    println!("found {} results", results.len());
    Ok(())
}

/// Line-driven stand-in for the search screen: every line is offered to
/// the gate, `:go` is the manual trigger, `:type` the picker.
async fn cmd_search_interactive(client: Arc<ContentApiClient>, type_name: &str) -> Result<()> {
    let mut session = SearchSession::new(client, type_name);
    println!(
        "Searching {} - type at least {} characters",
        session.content_type().to_string().cyan(),
        flotiq_cli::search::MIN_QUERY_LEN + 1
    );

    let stdin = io::stdin();
    loop {
        print!("{}", "search> ".blue());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if line.chars().count() > flotiq_cli::search::MAX_QUERY_LEN {
            println!(
                "{}",
                format!(
                    "Max {} characters allowed.",
                    flotiq_cli::search::MAX_QUERY_LEN
                )
                .yellow()
            );
        }

        let outcome = if line == ":quit" || line == ":q" {
            break;
        } else if line == ":go" {
            session.confirm().await
        } else if let Some(name) = line.strip_prefix(":type ") {
            session.select_content_type(name.trim()).await
        } else {
            session.on_input(line).await
        };

        match outcome {
            Ok(Some(results)) => {
                print_objects(&results);
                println!("found {} results", results.len());
            }
            Ok(None) => {
                if let Some(last) = session.last_results() {
                    println!("found {} results (cached)", last.objects.len());
                }
            }
            Err(ApiError::InvalidToken) => return Err(ApiError::InvalidToken.into()),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
    Ok(())
}

fn read_body(source: &str) -> Result<Value> {
    let contents = if source == "-" {
        let mut buffer = String::new();
        io::Read::read_to_string(&mut io::stdin(), &mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Cannot read {source}"))?
    };
    serde_json::from_str(&contents).with_context(|| format!("{source} is not valid JSON"))
}

/// Encode a single file as a multipart form body. The client treats the
/// payload as opaque, so the encoding lives with the caller.
fn encode_multipart(file_name: &str, bytes: &[u8]) -> MediaPayload {
    let boundary = format!(
        "----flotiq-cli-{}-{}",
        std::process::id(),
        chrono::Local::now().format("%s%f")
    );

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MediaPayload::new(format!("multipart/form-data; boundary={boundary}"), body)
}

async fn cmd_upload(client: &ContentApiClient, path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {path}"))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin");

    client.upload_media(&encode_multipart(file_name, &bytes)).await?;
    println!("{} uploaded {path}", "OK".green());
    Ok(())
}

fn cmd_config(args: &[String]) -> Result<()> {
    let mut token = None;
    let mut url = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--token" => token = iter.next().cloned(),
            "--url" => url = iter.next().cloned(),
            other => return Err(anyhow!("Unknown config option: {other}")),
        }
    }

    let token = token.ok_or_else(|| anyhow!("config requires --token <t>"))?;
    let store = FileCredentialStore::new()?;
    store.save(&token, url.as_deref())?;
    println!("{} credentials written to {}", "OK".green(), store.path().display());
    Ok(())
}

fn require<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument: {what}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    match args[0].as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "types" => {
            let client = build_client()?;
            cmd_types(&client).await
        }
        "list" => {
            let type_name = require(&args, 1, "<type>")?;
            let page = match args.get(2) {
                Some(raw) => raw.parse().context("page must be a positive number")?,
                None => 1,
            };
            let client = build_client()?;
            cmd_list(&client, type_name, page).await
        }
        "get" => {
            let type_name = require(&args, 1, "<type>")?;
            let id = require(&args, 2, "<id>")?;
            let client = build_client()?;
            cmd_get(&client, type_name, id).await
        }
        "search" => {
            let type_name = require(&args, 1, "<type>")?;
            match args.get(2) {
                Some(text) => {
                    let client = build_client()?;
                    cmd_search_once(&client, type_name, text).await
                }
                None => cmd_search_interactive(build_client()?, type_name).await,
            }
        }
        "create" => {
            let type_name = require(&args, 1, "<type>")?;
            let body = read_body(require(&args, 2, "<file|->")?)?;
            build_client()?.create_content_object(type_name, &body).await?;
            println!("{} created", "OK".green());
            Ok(())
        }
        "update" => {
            let type_name = require(&args, 1, "<type>")?;
            let id = require(&args, 2, "<id>")?;
            let body = read_body(require(&args, 3, "<file|->")?)?;
            build_client()?.update_content_object(type_name, id, &body).await?;
            println!("{} updated {id}", "OK".green());
            Ok(())
        }
        "delete" => {
            let type_name = require(&args, 1, "<type>")?;
            let id = require(&args, 2, "<id>")?;
            build_client()?.remove_content_object(type_name, id).await?;
            println!("{} deleted {id}", "OK".green());
            Ok(())
        }
        "upload" => {
            let client = build_client()?;
            cmd_upload(&client, require(&args, 1, "<file>")?).await
        }
        "config" => cmd_config(&args[1..]),
        other => {
            eprintln!("{}", format!("Unknown command: {other}").red());
            print_help();
            Err(anyhow!("Unknown command: {other}"))
        }
    }
}
