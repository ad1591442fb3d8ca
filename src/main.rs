use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use sift::Provider;
use sift::core::config::{self, ResolvedConfig};
use sift::core::credential::{CredentialSources, resolve_credential};
use sift::core::render::render_results;
use sift::core::{DispatchMode, Dispatcher};
use sift::inference::{
    CompletionInvoker, InvokerSettings, ModelSpec, OpenAiProvider, RawHttpProvider,
};

#[derive(Parser)]
#[command(name = "sift", about = "Run a text through a set of prompts and print each completion")]
struct Args {
    /// File holding the source text (reads stdin when omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Force the call strategy for the chosen model
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Completion endpoint for raw-HTTP models
    #[arg(long)]
    endpoint: Option<String>,

    /// Prompt template; repeat to send several (replaces the configured prompts)
    #[arg(short, long = "prompt")]
    prompts: Vec<String>,

    /// API key (takes precedence over secrets, config and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Send all prompts at once instead of one after another
    #[arg(long)]
    concurrent: bool,

    /// Name the model in error messages
    #[arg(long)]
    qualify_errors: bool,

    /// Show which credential sources hold a key, then exit
    #[arg(long)]
    show_credential_sources: bool,

    /// List configured models, then exit
    #[arg(long)]
    list_models: bool,
}

/// Exits with status 2 after printing a user-facing message.
fn reject(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(2);
}

fn model_spec(args: &Args, resolved: &ResolvedConfig) -> ModelSpec {
    let mut spec = resolved.models.spec_for(&resolved.model_name);
    if let Some(provider) = args.provider {
        spec.provider = provider;
    }
    if let Some(ref endpoint) = args.endpoint {
        spec = spec.with_endpoint(endpoint.clone());
    }
    spec
}

fn read_text(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sift.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("sift.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        eprintln!("warning: {e}; using defaults");
        config::SiftConfig::default()
    });
    let resolved = config::resolve(&file_config, args.model.as_deref());

    log::info!("Sift starting up with model: {}", resolved.model_name);

    if args.list_models {
        for (name, provider, description) in resolved.models.models() {
            println!("{name}\t{}\t{}", provider.label(), description.unwrap_or(""));
        }
        return Ok(());
    }

    if args.show_credential_sources {
        let sources = CredentialSources::gather(args.api_key.clone(), &resolved);
        for (source, is_set) in sources.report() {
            println!("API key is set in {source}: {is_set}");
        }
        return Ok(());
    }

    let credential = match resolve_credential(args.api_key.clone(), &resolved) {
        Some(credential) => credential,
        None => reject(
            "No valid API key found. Pass --api-key or configure one in ~/.sift/secrets.toml, \
             ~/.sift/config.toml or OPENAI_API_KEY.",
        ),
    };

    let text = read_text(args.file.as_ref())?;
    if text.trim().is_empty() {
        reject("Please enter some text.");
    }

    let templates = if args.prompts.is_empty() {
        resolved.prompts.clone()
    } else {
        args.prompts.clone()
    };

    let mode = if args.concurrent || resolved.concurrent {
        DispatchMode::Concurrent
    } else {
        DispatchMode::Sequential
    };

    let invoker = CompletionInvoker::new(
        Arc::new(OpenAiProvider::new(Some(resolved.openai_base_url.clone()))),
        Arc::new(RawHttpProvider::new()),
        InvokerSettings {
            system_prompt: resolved.system_prompt.clone(),
            max_tokens: resolved.max_tokens,
        },
    );
    let dispatcher = Dispatcher::new(invoker, mode);

    let spec = model_spec(&args, &resolved);
    let results = dispatcher.dispatch(&text, &templates, &spec, &credential).await;

    print!("{}", render_results(&results, args.qualify_errors));
    Ok(())
}
