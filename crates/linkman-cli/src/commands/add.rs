//! Add command handler

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use linkman_core::{parse_url, source_of, Config, Store, DEFAULT_LIST};

use crate::metadata::fetch_title;
use crate::output::Output;

/// Arguments for `linkman add`
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// URLs to save
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Use provided title instead of fetching
    #[arg(short, long)]
    pub title: Option<String>,

    /// Skip fetching the page title
    #[arg(long)]
    pub skip_title_fetch: bool,

    /// Allow duplicates
    #[arg(short, long)]
    pub force: bool,

    /// Target list
    #[arg(short, long, default_value = DEFAULT_LIST)]
    pub list: String,
}

/// Where the title of a new link comes from
#[derive(Debug, PartialEq, Eq)]
enum TitleSource {
    Provided(String),
    Skipped,
    Fetch,
}

fn title_source(args: &AddArgs, config: &Config) -> TitleSource {
    match &args.title {
        Some(title) => TitleSource::Provided(title.clone()),
        None if args.skip_title_fetch || !config.fetch_titles => TitleSource::Skipped,
        None => TitleSource::Fetch,
    }
}

/// Create links for every URL given
///
/// URLs that already have a link are skipped unless `--force` is set.
pub fn run(store: &Store, config: &Config, args: &AddArgs, output: &Output) -> Result<()> {
    for raw in &args.urls {
        add_url(store, config, args, raw, output)?;
    }
    Ok(())
}

fn add_url(
    store: &Store,
    config: &Config,
    args: &AddArgs,
    raw: &str,
    output: &Output,
) -> Result<()> {
    let url = parse_url(raw).context("Unable to add URL")?;

    if !args.force
        && store
            .link_exists(&url)
            .context("Unable to check for existing link")?
    {
        output.message(&format!("URL {} already exists, skipping", raw));
        return Ok(());
    }

    let source = source_of(&url).context("Malformed URL")?;

    let title = match title_source(args, config) {
        TitleSource::Provided(title) => title,
        TitleSource::Skipped => String::new(),
        TitleSource::Fetch => {
            let timeout = Duration::from_secs(config.fetch_timeout_secs);
            fetch_title(&url, timeout).context("Unable to fetch page title")?
        }
    };

    let mut link = store.new_link(url, source, title, args.list.as_str());
    store.save_link(&mut link).context("Unable to save link")?;

    output.success("Created link:");
    output.print_link(&link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use linkman_core::{from_list, LinkFilter, ALL_LISTS};
    use tempfile::TempDir;

    const URL: &str = "https://www.wikipedia.org/";

    fn setup(temp_dir: &TempDir) -> (Store, Config) {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let store = Store::open_with_config(&config).unwrap();
        (store, config)
    }

    fn args(urls: &[&str]) -> AddArgs {
        AddArgs {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            title: None,
            skip_title_fetch: true,
            force: false,
            list: DEFAULT_LIST.to_string(),
        }
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_add_without_title() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        run(&store, &config, &args(&[URL]), &quiet()).unwrap();

        let links = store.find_all_links().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url.as_str(), URL);
        assert_eq!(links[0].source, "wikipedia");
        assert!(links[0].title.is_empty());
        assert_eq!(links[0].list, "default");
    }

    #[test]
    fn test_add_with_custom_title() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        let add = AddArgs {
            title: Some("Custom Title".to_string()),
            skip_title_fetch: false,
            ..args(&[URL])
        };
        run(&store, &config, &add, &quiet()).unwrap();

        let links = store.find_all_links().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Custom Title");
    }

    #[test]
    fn test_add_no_duplicates_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        run(&store, &config, &args(&[URL]), &quiet()).unwrap();
        run(&store, &config, &args(&[URL]), &quiet()).unwrap();

        assert_eq!(store.link_count().unwrap(), 1);
    }

    #[test]
    fn test_add_force_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        let forced = AddArgs {
            force: true,
            ..args(&[URL])
        };
        run(&store, &config, &forced, &quiet()).unwrap();
        run(&store, &config, &forced, &quiet()).unwrap();

        assert_eq!(store.link_count().unwrap(), 2);
        assert!(store.link_exists(&parse_url(URL).unwrap()).unwrap());
    }

    #[test]
    fn test_add_multiple_urls_to_list() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        let add = AddArgs {
            list: "reading".to_string(),
            ..args(&["https://www.youtube.com/watch?v=1", "https://stackoverflow.com/q/2"])
        };
        run(&store, &config, &add, &quiet()).unwrap();

        assert!(store.find_links(&LinkFilter::new([])).unwrap().is_empty());
        let links = store
            .find_links(&LinkFilter::new([from_list(ALL_LISTS)]))
            .unwrap();
        let sources: Vec<_> = links.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, vec!["youtube", "stackoverflow"]);
        assert!(links.iter().all(|l| l.list == "reading"));
    }

    #[test]
    fn test_add_invalid_url_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        let result = run(&store, &config, &args(&["not a url"]), &quiet());
        assert!(result.is_err());
        assert_eq!(store.link_count().unwrap(), 0);
    }

    #[test]
    fn test_add_ip_host_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (store, config) = setup(&temp_dir);

        let result = run(&store, &config, &args(&["http://127.0.0.1:8080/"]), &quiet());
        assert!(result.is_err());
    }

    #[test]
    fn test_title_source() {
        let config = Config::default();

        assert_eq!(title_source(&args(&[URL]), &config), TitleSource::Skipped);

        let fetch = AddArgs {
            skip_title_fetch: false,
            ..args(&[URL])
        };
        assert_eq!(title_source(&fetch, &config), TitleSource::Fetch);

        let no_fetch_config = Config {
            fetch_titles: false,
            ..Config::default()
        };
        assert_eq!(title_source(&fetch, &no_fetch_config), TitleSource::Skipped);

        let provided = AddArgs {
            title: Some("Mine".to_string()),
            ..fetch
        };
        assert_eq!(
            title_source(&provided, &config),
            TitleSource::Provided("Mine".to_string())
        );
    }
}
