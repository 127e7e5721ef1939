use crate::types::*;
use chrono::{DateTime, Local};
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME_COLOR: &str = "#2E86C1";
pub const DEFAULT_COVER_TITLE: &str = "Catálogo de Productos";
pub const DEFAULT_COVER_SUBTITLE: &str = "Lista de productos";
pub const DEFAULT_CARDS_PER_ROW: usize = 2;
pub const DEFAULT_ROWS_PER_PAGE: usize = 3;

/// Presentation settings for a single render, with assets already loaded
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub theme_color: RgbColor,
    pub include_cover: bool,
    pub cover_title: String,
    pub cover_subtitle: String,
    pub cover_logo: Option<Vec<u8>>,
    pub mini_logo: Option<Vec<u8>>,
    pub cards_per_row: usize,
    pub rows_per_page: usize,
    pub paper: PaperSize,
    /// Timestamp stamped on the cover, footers and the editable document
    pub generated_at: DateTime<Local>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme_color: RgbColor::new(46.0 / 255.0, 134.0 / 255.0, 193.0 / 255.0),
            include_cover: true,
            cover_title: DEFAULT_COVER_TITLE.to_string(),
            cover_subtitle: DEFAULT_COVER_SUBTITLE.to_string(),
            cover_logo: None,
            mini_logo: None,
            cards_per_row: DEFAULT_CARDS_PER_ROW,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            paper: PaperSize::A4,
            generated_at: Local::now(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cards_per_row == 0 {
            return Err(RenderError::Config(
                "Cards per row must be at least 1".to_string(),
            ));
        }
        if self.rows_per_page == 0 {
            return Err(RenderError::Config(
                "Rows per page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Persistable catalog settings. Logos are referenced by path and only read
/// when converted into a [`RenderConfig`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogOptions {
    pub theme_color: String,
    pub include_cover: bool,
    pub cover_title: String,
    pub cover_subtitle: String,
    pub cover_logo: Option<PathBuf>,
    pub mini_logo: Option<PathBuf>,
    pub cards_per_row: usize,
    pub rows_per_page: usize,
    pub paper: PaperSize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            include_cover: true,
            cover_title: DEFAULT_COVER_TITLE.to_string(),
            cover_subtitle: DEFAULT_COVER_SUBTITLE.to_string(),
            cover_logo: None,
            mini_logo: None,
            cards_per_row: DEFAULT_CARDS_PER_ROW,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            paper: PaperSize::A4,
        }
    }
}

impl CatalogOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RenderError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        RgbColor::from_hex(&self.theme_color)?;
        if self.cards_per_row == 0 {
            return Err(RenderError::Config(
                "Cards per row must be at least 1".to_string(),
            ));
        }
        if self.rows_per_page == 0 {
            return Err(RenderError::Config(
                "Rows per page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and read the referenced logo files
    pub async fn into_render_config(self) -> Result<RenderConfig> {
        self.validate()?;

        let cover_logo = match &self.cover_logo {
            Some(path) => Some(tokio::fs::read(path).await?),
            None => None,
        };
        let mini_logo = match &self.mini_logo {
            Some(path) => Some(tokio::fs::read(path).await?),
            None => None,
        };

        Ok(RenderConfig {
            theme_color: RgbColor::from_hex(&self.theme_color)?,
            include_cover: self.include_cover,
            cover_title: self.cover_title,
            cover_subtitle: self.cover_subtitle,
            cover_logo,
            mini_logo,
            cards_per_row: self.cards_per_row,
            rows_per_page: self.rows_per_page,
            paper: self.paper,
            generated_at: Local::now(),
        })
    }
}
