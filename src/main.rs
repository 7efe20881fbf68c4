use anyhow::Context as _;
use std::path::{Path, PathBuf};
use wiki_render::{
    config::Settings,
    highlight, path,
    renderer::{PageRenderer, shell},
    repository::{MemoryRepository, Repository as _},
    transform::{Contact, Events, IncludePages, Pipeline, WikiTags},
    tree::{self, Tree},
};

fn print_usage() {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] <page.json>");
    println!("       {exe} --highlight <language> <file>\n");
    println!("or, use environment variables:");
    println!("    WIKI_RENDER_CONFIG\n");
    println!("Options:");
    println!("    --config: Settings file (JSON)");
    println!("    --pages: Directory of page trees (*.json) for links and inclusions");
    println!("    --no-edit-links: Do not render edit links\n");
}

fn usage<T>(err: &'static str) -> anyhow::Result<T> {
    print_usage();
    Err(anyhow::Error::msg(err))
}

fn free_arg(args: &mut pico_args::Arguments, err: &'static str) -> anyhow::Result<String> {
    if let Some(arg) = args.opt_free_from_str::<String>()? {
        Ok(arg)
    } else {
        usage(err)
    }
}

/// Converts the path of a file below `dir` into a page path, so that
/// `dir/a/b.json` becomes `/a/b`.
fn page_path(dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(dir).ok()?.with_extension("");
    let segments = relative
        .components()
        .map(|segment| segment.as_os_str().to_string_lossy())
        .collect::<Vec<_>>();
    Some(format!("/{}", segments.join("/")))
}

fn load_tree(file: &Path) -> anyhow::Result<Tree> {
    let reader = std::fs::File::open(file)
        .with_context(|| format!("could not open {}", file.display()))?;
    tree::json::from_reader(std::io::BufReader::new(reader))
        .with_context(|| format!("could not decode {}", file.display()))
}

/// Adds every `*.json` file below `dir` to the repository.
fn load_pages(repository: &mut MemoryRepository, root: &Path, dir: &Path) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("could not read {}", dir.display()))?;
    for entry in entries {
        let file = entry?.path();
        if file.is_dir() {
            load_pages(repository, root, &file)?;
        } else if file.extension().is_some_and(|extension| extension == "json")
            && let Some(page_path) = page_path(root, &file)
        {
            repository.insert(page_path, load_tree(&file)?);
        }
    }
    Ok(())
}

fn highlight_file(language: &str, file: &str) -> anyhow::Result<()> {
    let code =
        std::fs::read_to_string(file).with_context(|| format!("could not read {file}"))?;
    println!("{}", highlight::format(Some(language), &code));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print_usage();
        return Ok(());
    }

    if let Some(language) = args.opt_value_from_str::<_, String>("--highlight")? {
        let file = free_arg(&mut args, "Missing file argument")?;
        if !args.finish().is_empty() {
            return usage("Unknown extra arguments passed");
        }
        return highlight_file(&language, &file);
    }

    let config = args
        .opt_value_from_str::<_, PathBuf>("--config")?
        .or_else(|| std::env::var_os("WIKI_RENDER_CONFIG").map(PathBuf::from));
    let pages = args.opt_value_from_str::<_, PathBuf>("--pages")?;
    let no_edit_links = args.contains("--no-edit-links");
    let _ = args.contains("--");
    let page_file = PathBuf::from(free_arg(&mut args, "Missing page file argument")?);

    if !args.finish().is_empty() {
        return usage("Unknown extra arguments passed");
    }

    let settings = match config {
        Some(config) => Settings::from_path(&config)
            .with_context(|| format!("could not load settings from {}", config.display()))?,
        None => Settings::default(),
    };

    let mut repository = MemoryRepository::new();
    if let Some(pages) = &pages {
        load_pages(&mut repository, pages, pages)?;
        log::info!("Loaded {} pages from {}", repository.len(), pages.display());
    }

    // A page inside the pages directory is taken from the repository, which
    // gives it its path.
    let stored = pages
        .as_deref()
        .and_then(|pages| page_path(pages, &page_file))
        .and_then(|page_path| repository.lookup_page(&page_path))
        .map(|page| page.into_owned());
    let mut tree = match stored.map_or_else(|| load_tree(&page_file), Ok) {
        Ok(tree) => tree,
        Err(err) => {
            let page = shell::error_page(
                "Error",
                "The page could not be loaded.",
                Some(&format!("{err:#}")),
            );
            print!("{}", shell::render_document(page, &settings, settings.head.as_deref()));
            return Err(err);
        }
    };

    Pipeline::new()
        .push(IncludePages::new(&repository))
        .push(Contact::new())
        .push(Events::new(&repository, &settings))
        .push(WikiTags::new(&repository, &settings))
        .apply(&mut tree);

    let Some(root) = tree.root() else {
        return Err(anyhow::Error::msg("Page tree has no root"));
    };
    let mut writer = PageRenderer::new(&tree, &repository, &settings)
        .with_edit_links(settings.edit_links && !no_edit_links)
        .render(root);
    if writer.body_lines().is_empty() {
        writer = shell::message_page("This page is empty.");
    }
    if let Some(page_path) = tree.page_path(root) {
        writer.set_title(path::name(page_path));
    }

    print!("{}", shell::render_document(writer, &settings, settings.head.as_deref()));
    Ok(())
}
