//! Project aggregate: brief, asset library, brand kit and documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layer::DEFAULT_FONT_FAMILY;
use crate::{AssetId, Document, EditorResult, LayerKind};

/// The creative brief a project is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignBrief {
    /// Main title.
    pub title: String,
    /// Subtitle.
    pub subtitle: String,
    /// Body copy.
    pub body: String,
    /// Contact line.
    pub contact: String,
    /// Keywords for copy and image generation.
    pub keywords: Vec<String>,
    /// Palette as hex colors.
    pub palette: Vec<String>,
    /// Tone of voice.
    pub tone: String,
    /// Preferred font family.
    pub font: Option<String>,
}

/// Opaque handle to the original file of an asset, owned by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle(String);

impl FileHandle {
    /// Wrap a host file handle.
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The raw handle.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An image in the project library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Stable identifier referenced by image layers.
    pub id: AssetId,
    /// Original file.
    pub file_handle: FileHandle,
    /// Displayable preview reference (e.g. an object URL).
    pub preview_reference: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl Asset {
    /// Create an asset with a fresh id.
    #[must_use]
    pub fn new(
        file_handle: FileHandle,
        preview_reference: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: AssetId::new(),
            file_handle,
            preview_reference: preview_reference.into(),
            width,
            height,
        }
    }

    /// Width divided by height, if the height is non-zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }
}

/// Ordered collection of image assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetLibrary {
    assets: Vec<Asset>,
}

impl AssetLibrary {
    /// Append an asset, replacing any existing asset with the same id in place.
    pub fn add(&mut self, asset: Asset) -> AssetId {
        let id = asset.id.clone();
        match self.assets.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
        id
    }

    /// Get an asset.
    #[must_use]
    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }

    /// Whether the library holds `id`.
    #[must_use]
    pub fn contains(&self, id: &AssetId) -> bool {
        self.get(id).is_some()
    }

    /// Remove an asset.
    pub fn remove(&mut self, id: &AssetId) -> Option<Asset> {
        let index = self.assets.iter().position(|asset| &asset.id == id)?;
        Some(self.assets.remove(index))
    }

    /// Assets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// What a brand kit entry is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandRole {
    /// Main logo, main color, heading font.
    Primary,
    /// Secondary variant.
    Secondary,
    /// Accent use.
    Accent,
    /// Headings.
    Heading,
    /// Body text.
    Body,
    /// Backgrounds.
    Background,
}

/// A logo in the brand kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandLogo {
    /// Library asset holding the logo.
    pub asset_id: AssetId,
    /// Intended use.
    pub role: BrandRole,
}

/// A color in the brand kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColor {
    /// Color as hex.
    pub hex: String,
    /// Intended use.
    pub role: BrandRole,
}

/// A font in the brand kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFont {
    /// Font family name.
    pub family: String,
    /// Intended use.
    pub role: BrandRole,
}

/// Optional usage rules of a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandConstraints {
    /// Minimum logo width in pixels.
    pub min_logo_width: Option<f64>,
    /// Clear space around the logo in pixels.
    pub logo_clear_space: Option<f64>,
    /// Free-text guidance.
    pub notes: Option<String>,
}

/// Logos, colors and fonts of a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandKit {
    /// Logos.
    pub logos: Vec<BrandLogo>,
    /// Colors.
    pub colors: Vec<BrandColor>,
    /// Fonts.
    pub fonts: Vec<BrandFont>,
    /// Usage constraints.
    pub constraints: Option<BrandConstraints>,
}

impl BrandKit {
    /// First font with the given role.
    #[must_use]
    pub fn font_for(&self, role: BrandRole) -> Option<&str> {
        self.fonts
            .iter()
            .find(|font| font.role == role)
            .map(|font| font.family.as_str())
    }
}

/// The whole editable project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Design brief.
    #[serde(default)]
    pub brief: DesignBrief,
    /// Image library.
    #[serde(default)]
    pub assets: AssetLibrary,
    /// Brand kit.
    #[serde(default)]
    pub brand_kit: BrandKit,
    /// Documents; never empty.
    pub documents: Vec<Document>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl Project {
    /// Create a project around its first document.
    #[must_use]
    pub fn new(brief: DesignBrief, document: Document) -> Self {
        Self {
            brief,
            assets: AssetLibrary::default(),
            brand_kit: BrandKit::default(),
            documents: vec![document],
            notes: String::new(),
        }
    }

    /// Font family for new text layers.
    ///
    /// Prefers the brand kit's heading, primary, then body font, then the
    /// brief's font, then [`DEFAULT_FONT_FAMILY`].
    #[must_use]
    pub fn default_font_family(&self) -> &str {
        [BrandRole::Heading, BrandRole::Primary, BrandRole::Body]
            .into_iter()
            .find_map(|role| self.brand_kit.font_for(role))
            .or(self.brief.font.as_deref())
            .unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Whether any image layer on any page references `asset`.
    #[must_use]
    pub fn asset_in_use(&self, asset: &AssetId) -> bool {
        self.documents
            .iter()
            .flat_map(|document| &document.pages)
            .flat_map(|page| page.layers.layers())
            .any(|layer| matches!(&layer.kind, LayerKind::Image(image) if &image.asset_id == asset))
    }

    /// Serialize the project to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a project from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a project.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the project to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::debug!("Saved project to {}", path.as_ref().display());
        Ok(())
    }

    /// Read a project previously written by [`Project::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }
}
