mod logger;

use anyhow::{Context, Result, bail};
use catalog_render::guide::GUIDE_FILE_NAME;
use catalog_render::{
    CatalogOptions, ImageResolver, OutputKind, PaperSize, RenderConfig, RenderRequest,
};
use catalog_sheets::{
    ACCESS_TOKEN_ENV, DEFAULT_SPREADSHEET, DEFAULT_WORKSHEET, RowSource, SheetsClient, SheetsError,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "catalogo", about = "Product catalog generator", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the PDF catalog (cover plus one section per category)
    Catalog {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the paged PDF template with a footer on every page
    Template {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an editable DOCX version of the catalog
    Editable {
        #[command(flatten)]
        source: SourceArgs,

        /// Output DOCX file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the visual mockup of the layout zones
    Mockup {
        /// Paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the user guide PDF
    Guide {
        /// Paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Output PDF file
        #[arg(short, long, default_value = GUIDE_FILE_NAME)]
        output: PathBuf,
    },

    /// Write the demo catalog to a CSV file or a Google spreadsheet
    Sample {
        /// Write the demo rows to this CSV file
        #[arg(long, conflicts_with = "sheet", required_unless_present = "sheet")]
        csv: Option<PathBuf>,

        /// Create (or fill) this Google spreadsheet
        #[arg(long)]
        sheet: Option<String>,

        /// Worksheet to write
        #[arg(long, default_value = DEFAULT_WORKSHEET)]
        worksheet: String,

        /// OAuth access token for the Google APIs
        #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
        access_token: Option<String>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Input CSV file (columns: categoria, nombre, descripcion, precio, stock, imagen)
    #[arg(short, long, conflicts_with = "sheet", required_unless_present = "sheet")]
    input: Option<PathBuf>,

    /// Google spreadsheet name
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_SPREADSHEET)]
    sheet: Option<String>,

    /// Worksheet holding the catalog rows
    #[arg(long, default_value = DEFAULT_WORKSHEET)]
    worksheet: String,

    /// OAuth access token for the Google APIs
    #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    access_token: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> Result<RowSource> {
        if let Some(path) = self.input {
            return Ok(RowSource::Csv(path));
        }
        let spreadsheet = self.sheet.unwrap_or_else(|| DEFAULT_SPREADSHEET.to_string());
        let client = sheets_client(self.access_token)?;
        Ok(RowSource::Sheet {
            client,
            spreadsheet,
            worksheet: self.worksheet,
        })
    }
}

#[derive(Args)]
struct StyleArgs {
    /// JSON options file; flags below override its values
    #[arg(long)]
    options: Option<PathBuf>,

    /// Save the effective options to this JSON file
    #[arg(long)]
    save_options: Option<PathBuf>,

    /// Theme color as #RRGGBB
    #[arg(long)]
    theme_color: Option<String>,

    /// Cover title
    #[arg(long)]
    title: Option<String>,

    /// Cover subtitle
    #[arg(long)]
    subtitle: Option<String>,

    /// Cover logo image
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Small logo printed on every product card
    #[arg(long)]
    mini_logo: Option<PathBuf>,

    /// Product cards per row
    #[arg(long)]
    cards_per_row: Option<usize>,

    /// Card rows per page (template only)
    #[arg(long)]
    rows_per_page: Option<usize>,

    /// Skip the cover page
    #[arg(long)]
    no_cover: bool,

    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,
}

impl StyleArgs {
    async fn into_config(self) -> Result<RenderConfig> {
        let mut options = match &self.options {
            Some(path) => CatalogOptions::load(path)
                .await
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => CatalogOptions::default(),
        };

        if let Some(color) = self.theme_color {
            options.theme_color = color;
        }
        if let Some(title) = self.title {
            options.cover_title = title;
        }
        if let Some(subtitle) = self.subtitle {
            options.cover_subtitle = subtitle;
        }
        if let Some(logo) = self.logo {
            options.cover_logo = Some(logo);
        }
        if let Some(mini_logo) = self.mini_logo {
            options.mini_logo = Some(mini_logo);
        }
        if let Some(n) = self.cards_per_row {
            options.cards_per_row = n;
        }
        if let Some(n) = self.rows_per_page {
            options.rows_per_page = n;
        }
        if self.no_cover {
            options.include_cover = false;
        }
        if let Some(paper) = self.paper {
            options.paper = paper.into();
        }

        options.validate()?;
        if let Some(path) = &self.save_options {
            options.save(path).await?;
            println!("Saved options → {}", path.display());
        }

        Ok(options.into_render_config().await?)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

fn sheets_client(access_token: Option<String>) -> Result<SheetsClient> {
    match access_token {
        Some(token) if !token.trim().is_empty() => Ok(SheetsClient::new(token)),
        _ => bail!(
            "A Google access token is required (--access-token or {})",
            ACCESS_TOKEN_ENV
        ),
    }
}

/// Load the rows and render them. Without style arguments the default
/// configuration is used and no logo files are read.
async fn render_products(
    kind: OutputKind,
    source: SourceArgs,
    style: Option<StyleArgs>,
    output: Option<PathBuf>,
) -> Result<()> {
    let source = source.into_source()?;
    let raw = match source.load().await {
        Ok(raw) => raw,
        Err(SheetsError::EmptyTable(from)) => {
            tracing::warn!("No products found in {}", from);
            bail!("Nothing to render: {} has no product rows", from);
        }
        Err(e) => return Err(e.into()),
    };

    let table = catalog_render::normalize_table(&raw);
    println!("Loaded {} products from {}", table.len(), source.describe());

    let config = match style {
        Some(style) => style.into_config().await?,
        None => RenderConfig::default(),
    };
    let output = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
    let resolver = ImageResolver::http()?;

    catalog_render::generate(RenderRequest::new(kind, table, config), &resolver, &output).await?;
    print_generated(kind, &output);
    Ok(())
}

fn print_generated(kind: OutputKind, output: &Path) {
    println!(
        "Generated {} ({}) → {}",
        kind.default_file_name(),
        kind.mime_type(),
        output.display()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Catalog {
            source,
            style,
            output,
        } => render_products(OutputKind::PdfCatalog, source, Some(style), output).await?,

        Commands::Template {
            source,
            style,
            output,
        } => render_products(OutputKind::PdfTemplate, source, Some(style), output).await?,

        Commands::Editable { source, output } => {
            render_products(OutputKind::EditableDocument, source, None, output).await?
        }

        Commands::Mockup { paper, output } => {
            let kind = OutputKind::PdfMockup;
            let output = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
            let bytes = catalog_render::render_mockup(paper.into()).await?;
            tokio::fs::write(&output, bytes).await?;
            print_generated(kind, &output);
        }

        Commands::Guide { paper, output } => {
            let bytes = catalog_render::render_guide(paper.into()).await?;
            tokio::fs::write(&output, bytes).await?;
            println!("Generated user guide → {}", output.display());
        }

        Commands::Sample {
            csv,
            sheet,
            worksheet,
            access_token,
        } => {
            if let Some(path) = csv {
                catalog_sheets::write_template_csv(&path).await?;
                println!("Wrote demo catalog → {}", path.display());
            } else {
                let spreadsheet = sheet.unwrap_or_else(|| DEFAULT_SPREADSHEET.to_string());
                let client = sheets_client(access_token)?;
                let id = client.create_template(&spreadsheet, &worksheet).await?;
                println!(
                    "Wrote demo catalog → spreadsheet '{}' ({}), worksheet '{}'",
                    spreadsheet, id, worksheet
                );
            }
        }
    }

    Ok(())
}
