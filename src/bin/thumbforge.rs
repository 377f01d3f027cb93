use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use thumbforge::store::ThumbnailStore as _;

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    /// Override the store location (defaults to the user data dir).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a thumbnail image and save it to the store.
    Generate(GenerateArgs),
    /// List saved thumbnails, most recent first.
    List,
    /// Delete a saved thumbnail by id.
    Delete(DeleteArgs),
    /// Render a saved thumbnail with an edit session and write a PNG.
    Export(ExportArgs),
    /// Print the available categories and style presets.
    Catalog,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Video title or topic.
    #[arg(long)]
    title: String,

    /// Content category.
    #[arg(long, value_enum)]
    category: CategoryChoice,

    /// Style preset id (see `thumbforge catalog`).
    #[arg(long, default_value = "cinematic")]
    style: String,

    /// Free-form prompt details.
    #[arg(long)]
    prompt: Option<String>,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,
}

#[derive(Parser, Debug)]
struct DeleteArgs {
    #[arg(long)]
    id: String,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Id of the saved thumbnail to render.
    #[arg(long)]
    id: String,

    /// Edit session JSON (overlays + adjustments). Without it the bare
    /// image is exported.
    #[arg(long)]
    session: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long, default_value = thumbforge::EXPORT_FILENAME)]
    out: PathBuf,

    /// Extra directory to load fonts from, in addition to system fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryChoice {
    Gaming,
    Tech,
    Vlog,
    Finance,
    Cooking,
    Podcast,
    Education,
}

impl From<CategoryChoice> for thumbforge::Category {
    fn from(c: CategoryChoice) -> Self {
        match c {
            CategoryChoice::Gaming => thumbforge::Category::Gaming,
            CategoryChoice::Tech => thumbforge::Category::Tech,
            CategoryChoice::Vlog => thumbforge::Category::Vlog,
            CategoryChoice::Finance => thumbforge::Category::Finance,
            CategoryChoice::Cooking => thumbforge::Category::Cooking,
            CategoryChoice::Podcast => thumbforge::Category::Podcast,
            CategoryChoice::Education => thumbforge::Category::Education,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store = open_store(cli.store.as_deref())?;
    match cli.cmd {
        Command::Generate(args) => cmd_generate(&store, args),
        Command::List => cmd_list(&store),
        Command::Delete(args) => cmd_delete(&store, args),
        Command::Export(args) => cmd_export(&store, args),
        Command::Catalog => cmd_catalog(),
    }
}

fn open_store(path: Option<&std::path::Path>) -> anyhow::Result<thumbforge::JsonFileStore> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => thumbforge::default_store_path()?,
    };
    Ok(thumbforge::JsonFileStore::new(path))
}

fn cmd_generate(store: &thumbforge::JsonFileStore, args: GenerateArgs) -> anyhow::Result<()> {
    use thumbforge::ImageGenerator as _;

    let category: thumbforge::Category = args.category.into();
    let request = thumbforge::GenerationRequest {
        title: args.title.clone(),
        category,
        style_id: args.style.clone(),
        user_prompt: args.prompt.clone(),
    };

    let client = thumbforge::GeminiClient::new(args.api_key)?;
    let image = client.generate(&request)?;

    let record = thumbforge::GeneratedThumbnail::new(
        image.to_data_uri(),
        args.prompt.unwrap_or_default(),
        args.title,
        category,
    );
    store.save(&record)?;

    println!("{}", record.id);
    eprintln!("saved '{}' ({category})", record.title);
    Ok(())
}

fn cmd_list(store: &thumbforge::JsonFileStore) -> anyhow::Result<()> {
    let records = store.list();
    if records.is_empty() {
        eprintln!("no saved thumbnails");
        return Ok(());
    }
    for r in records {
        let created = chrono::DateTime::from_timestamp_millis(r.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| r.created_at.to_string());
        println!("{}  {}  [{}]  {}", r.id, created, r.category, r.title);
    }
    Ok(())
}

fn cmd_delete(store: &thumbforge::JsonFileStore, args: DeleteArgs) -> anyhow::Result<()> {
    store.delete_by_id(&args.id)?;
    eprintln!("deleted {}", args.id);
    Ok(())
}

fn cmd_export(store: &thumbforge::JsonFileStore, args: ExportArgs) -> anyhow::Result<()> {
    let record = store.find_by_id(&args.id).ok_or_else(|| {
        thumbforge::ThumbforgeError::not_found(format!("no saved thumbnail with id '{}'", args.id))
    })?;

    let mut state = thumbforge::EditorState::for_image(record.url);
    if let Some(path) = &args.session {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read session '{}'", path.display()))?;
        let session: thumbforge::EditSession =
            serde_json::from_str(&raw).with_context(|| "parse session JSON")?;
        state = thumbforge::editor::apply_session(state, &session);
    }

    let mut fonts = thumbforge::FontLibrary::new();
    if let Some(dir) = &args.fonts_dir {
        fonts = fonts.with_fonts_dir(dir);
    }

    let mut compositor = thumbforge::Compositor::new(fonts)?;
    compositor.write_png(&state, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_catalog() -> anyhow::Result<()> {
    println!("categories:");
    for c in thumbforge::Category::ALL {
        println!("  {c}");
    }
    println!("styles:");
    for s in thumbforge::STYLES {
        println!("  {:<12} {}  ({})", s.id, s.name, s.preview_color);
    }
    Ok(())
}
