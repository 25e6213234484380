//! List command handler

use anyhow::{Context, Result};
use clap::Args;

use linkman_core::{
    from_list, include_archived, no_archived, only_archived, title_not_empty, with_source,
    with_title, LinkFilter, Store, DEFAULT_LIST,
};

use crate::output::Output;

/// Arguments for `linkman list`
///
/// Without options, prints the non-archived links of the `default` list.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Show only links from specified source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Show only links from specified list ('*' for all lists)
    #[arg(short, long, default_value = DEFAULT_LIST)]
    pub list: String,

    /// Show only links whose title contains specified string
    #[arg(short, long)]
    pub title: Option<String>,

    /// Filter out links without title
    #[arg(short = 'T', long)]
    pub require_title: bool,

    /// Include archived links
    #[arg(short, long)]
    pub archived: bool,

    /// Show only archived links
    #[arg(short = 'A', long)]
    pub only_archived: bool,

    /// Output template with {id}, {source}, {title}, {url}, {list}, {archived}
    #[arg(short, long)]
    pub format: Option<String>,
}

impl ListArgs {
    /// Build the filter described by the flags
    ///
    /// `--only-archived` wins over `--archived`.
    pub fn filter(&self) -> LinkFilter {
        let mut conditions = Vec::new();

        if let Some(source) = &self.source {
            conditions.push(with_source(source.as_str()));
        }

        if let Some(title) = &self.title {
            conditions.push(with_title(title.as_str()));
        }

        conditions.push(from_list(self.list.as_str()));

        if self.require_title {
            conditions.push(title_not_empty());
        }

        conditions.push(if self.only_archived {
            only_archived()
        } else if self.archived {
            include_archived()
        } else {
            no_archived()
        });

        LinkFilter::new(conditions)
    }
}

/// Print the links matching the flags
pub fn run(store: &Store, args: &ListArgs, output: &Output) -> Result<()> {
    let links = store
        .find_links(&args.filter())
        .context("Unable to fetch links")?;
    output.print_links(&links, args.format.as_deref())
}
