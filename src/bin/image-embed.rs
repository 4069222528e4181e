use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgGroup, Parser};
use image::RgbImage;

use image_embed::{fetch, output, EmbedOptions, EmbeddingEngine, Error};

#[derive(Parser)]
#[command(
    name = "image-embed",
    about = "Print a normalized feature vector for an image as JSON",
    version,
    after_help = "Output contract: a JSON array on stdout means success; a JSON object\n\
                  {\"error\": ..., \"detail\": ...} means failure. Exit status is 0 either\n\
                  way. Diagnostics go to stderr only."
)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "path"])))]
struct Cli {
    /// HTTP(S) URL of the image to embed
    #[arg(long)]
    url: Option<String>,

    /// Local path of the image to embed
    #[arg(long)]
    path: Option<PathBuf>,

    /// ONNX model file (a classifier exported with its pooled output reachable)
    #[arg(
        short,
        long,
        env = "IMAGE_EMBED_MODEL",
        default_value = "models/resnet50.onnx"
    )]
    model: PathBuf,

    /// Graph node to read features from, cutting off the classification head
    /// (omit if the model already outputs pooled features)
    #[arg(long, env = "IMAGE_EMBED_FEATURE_NODE")]
    feature_node: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error stderr output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = EmbedOptions {
        model: cli.model.clone(),
        feature_node: cli.feature_node.clone(),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let image = match load_image(&cli) {
        Ok(img) => img,
        Err(e) => return report_failure(&e),
    };

    if opts.verbose {
        eprintln!("Image: {}x{}", image.width(), image.height());
    }

    let start = Instant::now();
    let engine = match EmbeddingEngine::load(&opts) {
        Ok(engine) => engine,
        Err(e) => return report_failure(&e),
    };

    if opts.verbose {
        eprintln!(
            "Model loaded from {} in {:?}",
            cli.model.display(),
            start.elapsed()
        );
    }

    match engine.embed(&image) {
        Ok(vector) => {
            if !opts.quiet {
                eprintln!("Embedded: {} dims in {:?}", vector.len(), start.elapsed());
            }
            println!("{}", output::vector_json(&vector));
        }
        Err(e) => report_failure(&e),
    }
}

fn load_image(cli: &Cli) -> image_embed::Result<RgbImage> {
    match (&cli.url, &cli.path) {
        (Some(url), _) => {
            if cli.verbose {
                eprintln!("Fetching {url}");
            }
            fetch::load_from_url(url)
        }
        (_, Some(path)) => fetch::load_from_path(path),
        // clap's arg group requires exactly one of --url/--path
        (None, None) => unreachable!("argument parser enforces --url xor --path"),
    }
}

/// Log the failure to stderr and print the JSON error object to stdout.
/// The process still exits 0; the payload shape carries the failure.
fn report_failure(err: &Error) {
    eprintln!("Error: {err}");
    println!("{}", output::error_json(err.tag(), &err.to_string()));
}
