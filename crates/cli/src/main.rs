//! CLI tool for generating PowerPoint decks from a topic.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deckgen_core::config::DEFAULT_CONFIG_FILE;
use deckgen_core::{
    parse_response, Config, ContentGenerator, DeckSpec, GenerationRequest, ImageResolver, SlideKind,
};
use deckgen_pptx::{DeckBuilder, DeckReader};
use deckgen_providers::{CachedImageResolver, CohereGenerator, NoImages, ReplayGenerator};
use std::fs;
use std::path::{Path, PathBuf};

/// File the raw model reply is saved to with `--save-response`.
const RESPONSE_FILE: &str = "response.txt";

/// Extra `--help` text on filling the image cache.
const IMAGE_CACHE_HELP: &str = "\
Images:
  Image slides get a picture only when `image_cache` is set in the
  configuration file. For an image query such as \"Nile river\" the cache is
  searched for `Nile_river.<ext>` (spaces become `_`, punctuation is dropped),
  then for the first image inside a `Nile_river/` directory. Supported
  extensions: png, jpg, jpeg, gif, bmp, tif, tiff. Without a cache, or on a
  miss, the slide keeps its text and has no picture.";

/// Generate a themed PowerPoint deck about a topic.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
#[command(after_long_help = IMAGE_CACHE_HELP)]
struct Args {
    /// Topic of the presentation
    topic: String,

    /// Model used to write the outline
    #[arg(short, long, default_value = "command-r-plus")]
    model: String,

    /// Number of slides to ask for
    #[arg(short = 'n', long, default_value = "8")]
    slides: String,

    /// Theme: light, dark or aesthetic (unknown themes use light)
    #[arg(short, long, default_value = "light")]
    theme: String,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Build from a saved reply instead of calling the model
    #[arg(short, long)]
    response: Option<PathBuf>,

    /// Save the raw model reply next to the deck
    #[arg(long)]
    save_response: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    let request = GenerationRequest::new(&args.topic, &args.model, &args.slides, &args.theme)
        .context("Invalid request")?;

    let template = config.template_path(request.theme);
    if !template.is_file() {
        bail!(
            "Template for the {} theme not found at {}",
            request.theme,
            template.display()
        );
    }

    let storage_dir = config.storage_dir(&request.legal_topic);
    fs::create_dir_all(&storage_dir)
        .with_context(|| format!("Failed to create {}", storage_dir.display()))?;

    let reply = generate(&args, &config, &request)?;
    if args.save_response {
        let path = storage_dir.join(RESPONSE_FILE);
        fs::write(&path, &reply).with_context(|| format!("Failed to write {}", path.display()))?;
        if args.verbose {
            eprintln!("Reply saved to: {}", path.display());
        }
    }

    let records = parse_response(&reply);
    if records.is_empty() {
        log::warn!("The reply contained no recognizable slides");
    }
    let spec = DeckSpec::with_slides(request.topic.clone(), request.theme, records);

    if let Some(note) = image_cache_note(&spec, &config) {
        log::warn!("{}", note);
    }
    let images: Box<dyn ImageResolver> = match &config.image_cache {
        Some(dir) => Box::new(CachedImageResolver::new(dir)),
        None => Box::new(NoImages),
    };

    let path = DeckBuilder::new(&config.template_dir, images.as_ref())
        .build(&spec, &storage_dir)
        .context("Failed to build the deck")?;

    if args.verbose {
        print_summary(&path)?;
    }
    println!("{}", path.display());

    Ok(())
}

/// Get the outline reply from the model or a saved file.
fn generate(args: &Args, config: &Config, request: &GenerationRequest) -> Result<String> {
    let generator: Box<dyn ContentGenerator> = match &args.response {
        Some(path) => Box::new(ReplayGenerator::new(path)),
        None => Box::new(CohereGenerator::from_config(config, &request.model)),
    };

    let reply = generator
        .generate(&request.prompt())
        .context("Content generation failed")?;

    log::debug!("==== Reply Start ====");
    log::debug!("{}", reply);
    log::debug!("==== Reply End ====");

    Ok(reply)
}

/// Warning for image slides that cannot get a picture.
fn image_cache_note(spec: &DeckSpec, config: &Config) -> Option<String> {
    let image_slides = spec.count_of(SlideKind::ImageSlide);
    if image_slides == 0 || config.image_cache.is_some() {
        return None;
    }
    Some(format!(
        "{} image slide(s) will have no picture: image_cache is not configured (see --help)",
        image_slides
    ))
}

/// Print what was written, read back from the file.
fn print_summary(path: &Path) -> Result<()> {
    let slides = DeckReader::new()
        .read_path(path)
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    eprintln!("Written {} slides:", slides.len());
    for slide in &slides {
        let pictures = match slide.content.pictures {
            0 => String::new(),
            1 => " [1 picture]".to_string(),
            n => format!(" [{} pictures]", n),
        };
        eprintln!("  {:>2}. {}{}", slide.number, slide.title(), pictures);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::Theme;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["deckgen", "Machine Learning"]).unwrap();
        assert_eq!(args.topic, "Machine Learning");
        assert_eq!(args.slides, "8");
        assert_eq!(args.theme, "light");
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(args.response.is_none());
        assert!(!args.save_response);
    }

    #[test]
    fn test_args_slides_stay_raw() {
        let args = Args::try_parse_from([
            "deckgen",
            "AI",
            "--slides",
            "ten",
            "--theme",
            "neon",
            "--response",
            "reply.txt",
            "--save-response",
        ])
        .unwrap();
        assert_eq!(args.slides, "ten");
        assert_eq!(args.response, Some(PathBuf::from("reply.txt")));
        assert!(args.save_response);
        assert!(GenerationRequest::new(&args.topic, &args.model, &args.slides, &args.theme).is_err());
    }

    #[test]
    fn test_topic_is_required() {
        assert!(Args::try_parse_from(["deckgen"]).is_err());
    }

    #[test]
    fn test_long_help_explains_image_cache() {
        use clap::CommandFactory;

        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("image_cache"));
        assert!(help.contains("Nile_river.<ext>"));
    }

    #[test]
    fn test_image_cache_note() {
        let reply = "[L_IS][TITLE]Nile[/TITLE][CONTENT]River[/CONTENT][IMAGE]Nile river[/IMAGE]\
                     [SLIDEBREAK][L_CS][TITLE]Uses[/TITLE][CONTENT]- a[/CONTENT]";
        let spec = DeckSpec::with_slides("Nile", Theme::Light, parse_response(reply));
        let text_only =
            DeckSpec::with_slides("Nile", Theme::Light, parse_response("[L_CS][TITLE]A[/TITLE]"));

        let uncached = Config::from_toml("save_location = \"decks\"", Some("key".to_string())).unwrap();
        let cached = Config::from_toml(
            "save_location = \"decks\"\nimage_cache = \"cache\"",
            Some("key".to_string()),
        )
        .unwrap();

        let note = image_cache_note(&spec, &uncached).unwrap();
        assert!(note.starts_with("1 image slide(s)"));
        assert!(note.contains("image_cache"));
        assert_eq!(image_cache_note(&spec, &cached), None);
        assert_eq!(image_cache_note(&text_only, &uncached), None);
    }
}
