//! `hush site` — site catalog inspection and editing.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use hush_core::{sites, Site, SiteSlug, SiteType};

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    /// List catalog sites and their domains.
    List(SiteListArgs),
    /// Add a site (or replace one with the same slug).
    Add(SiteAddArgs),
}

#[derive(Args, Debug)]
pub struct SiteListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SiteAddArgs {
    /// Catalog slug, e.g. "reddit".
    pub slug: String,

    /// Site category.
    #[arg(long = "type", default_value = "other")]
    pub site_type: SiteTypeArg,

    /// Default grace period in minutes for `hush unblock`.
    #[arg(long, default_value_t = sites::DEFAULT_UNBLOCK_MINUTES)]
    pub minutes: u64,

    /// Domains blocked together for this site.
    #[arg(required = true)]
    pub domains: Vec<String>,
}

pub fn run(command: SiteCommand) -> Result<()> {
    let home = super::home()?;
    match command {
        SiteCommand::List(args) => {
            let catalog = sites::load_at(&home).context("failed to load site catalog")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&catalog.sites)?);
                return Ok(());
            }

            #[derive(Tabled)]
            struct SiteRow {
                #[tabled(rename = "SLUG")]
                slug: String,
                #[tabled(rename = "TYPE")]
                site_type: String,
                #[tabled(rename = "MINUTES")]
                minutes: u64,
                #[tabled(rename = "DOMAINS")]
                domains: String,
            }

            let rows: Vec<SiteRow> = catalog
                .sites
                .iter()
                .map(|s| SiteRow {
                    slug: s.slug.0.clone(),
                    site_type: s.site_type.to_string(),
                    minutes: s.default_minutes,
                    domains: s.domains.join(", "),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{table}");
            Ok(())
        }
        SiteCommand::Add(args) => {
            if args.slug.trim().is_empty() {
                bail!("site slug must not be empty");
            }
            let site = Site {
                slug: SiteSlug::from(args.slug.as_str()),
                site_type: args.site_type.into(),
                default_minutes: args.minutes,
                domains: args.domains,
            };
            sites::upsert_site_at(&home, site)
                .with_context(|| format!("failed to save site '{}'", args.slug))?;
            println!("saved site '{}'", args.slug);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Shared SiteType argument — parsed from CLI strings, converts to core type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse [`SiteType`] from CLI args.
#[derive(Debug, Clone, Default)]
pub struct SiteTypeArg(pub SiteType);

impl std::str::FromStr for SiteTypeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "social" => Ok(Self(SiteType::Social)),
            "video" => Ok(Self(SiteType::Video)),
            "news" => Ok(Self(SiteType::News)),
            "forum" => Ok(Self(SiteType::Forum)),
            "other" => Ok(Self(SiteType::Other)),
            other => Err(format!(
                "unknown site type '{other}'; expected: social, video, news, forum, other"
            )),
        }
    }
}

impl From<SiteTypeArg> for SiteType {
    fn from(arg: SiteTypeArg) -> Self {
        arg.0
    }
}
