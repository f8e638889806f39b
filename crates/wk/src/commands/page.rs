//! Page addressing commands: `path`, `parse`, `link`, `sitemap`.

use std::path::PathBuf;

use clap::Args;
use wk_page::{
    PageRecord, ParsedPagePath, build_site_map, file_path, parse_page_path, relative_path,
};

use super::ConfigArgs;
use crate::error::{CliError, read_file};
use crate::output::Output;

/// Arguments for the path command.
#[derive(Args, Debug)]
pub(crate) struct PathArgs {
    /// Page name (e.g. "docs/guide").
    page: String,

    /// Culture of the page version (default: neutral).
    #[arg(short = 'l', long)]
    culture: Option<String>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl PathArgs {
    /// Execute the path command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load(None)?;
        let neutral = config.neutral_culture()?;

        if let Some(culture) = self.culture.as_deref()
            && culture != neutral.as_str()
        {
            config.require_site_culture(culture)?;
        }

        let path = file_path(&self.page, self.culture.as_deref(), &neutral)?;
        output.result(&path);
        Ok(())
    }
}

/// Arguments for the parse command.
#[derive(Args, Debug)]
pub(crate) struct ParseArgs {
    /// Storage file path (e.g. "docs/guide.fr.md").
    file: String,
}

impl ParseArgs {
    /// Execute the parse command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        output.result(&format_parsed(&parse_page_path(&self.file)));
        Ok(())
    }
}

/// Render a parsed path as `page` or `page (culture)`.
fn format_parsed(parsed: &ParsedPagePath) -> String {
    match &parsed.culture {
        Some(culture) => format!("{} ({culture})", parsed.page_name),
        None => parsed.page_name.clone(),
    }
}

/// Arguments for the link command.
#[derive(Args, Debug)]
pub(crate) struct LinkArgs {
    /// Page the link is placed on.
    from: String,

    /// Page the link points to.
    to: String,
}

impl LinkArgs {
    /// Execute the link command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        output.result(&relative_path(&self.from, &self.to)?);
        Ok(())
    }
}

/// Arguments for the sitemap command.
#[derive(Args, Debug)]
pub(crate) struct SitemapArgs {
    /// JSON file with an array of page records.
    pages: PathBuf,

    /// Print breadcrumbs for this page instead of the whole map.
    #[arg(long)]
    breadcrumbs: Option<String>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl SitemapArgs {
    /// Execute the sitemap command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load(None)?;
        let neutral = config.neutral_culture()?;

        let records: Vec<PageRecord> = serde_json::from_str(&read_file(&self.pages)?)?;
        let site_map = build_site_map(&records, &neutral);
        tracing::info!(
            records = records.len(),
            nodes = site_map.node_count(),
            "Built site map"
        );

        let json = match &self.breadcrumbs {
            Some(page) => serde_json::to_string_pretty(&site_map.breadcrumbs(page)),
            None => serde_json::to_string_pretty(&site_map),
        }
        .map_err(CliError::Output)?;
        output.result(&json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wk_page::Culture;

    use super::*;

    #[test]
    fn test_format_parsed_neutral() {
        let parsed = parse_page_path("docs/guide.md");
        assert_eq!(format_parsed(&parsed), "docs/guide");
    }

    #[test]
    fn test_format_parsed_localized() {
        let parsed = ParsedPagePath {
            page_name: "docs/guide".to_owned(),
            culture: Some(Culture::new("fr").unwrap()),
        };
        assert_eq!(format_parsed(&parsed), "docs/guide (fr)");
    }
}
