//! Pages and documents.

use serde::{Deserialize, Serialize};

use crate::{AssetId, DocumentId, LayerStore, PageId};

/// What a page is printed or published as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    /// Poster or flyer.
    #[default]
    Poster,
    /// Packaging panel laid out on a dieline.
    Packaging,
    /// Business card face.
    BusinessCard,
    /// Greeting or invitation card.
    Card,
    /// Social media post.
    Social,
    /// Anything else.
    Custom,
}

/// Physical print size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalSize {
    /// Width in mm.
    pub width_mm: f64,
    /// Height in mm.
    pub height_mm: f64,
}

/// Ruler guide positions in page pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guides {
    /// Vertical guides (x positions).
    #[serde(default)]
    pub vertical: Vec<f64>,
    /// Horizontal guides (y positions).
    #[serde(default)]
    pub horizontal: Vec<f64>,
}

impl Guides {
    /// Whether no guides are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Mockup and dieline metadata for packaging pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mockup {
    /// Dieline template identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dieline: Option<String>,
    /// Product photo the page is previewed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockup_asset: Option<AssetId>,
    /// Bleed around the trim box, in mm.
    #[serde(default)]
    pub bleed_mm: f64,
}

/// A page: layers plus print metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page id.
    pub id: PageId,
    /// Page type.
    pub kind: PageKind,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Physical size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_size: Option<PhysicalSize>,
    /// Ruler guides.
    #[serde(default, skip_serializing_if = "Guides::is_empty")]
    pub guides: Guides,
    /// Mockup/dieline metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockup: Option<Mockup>,
    /// Pages sharing a pairing id belong together (front/back of a card).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairing_id: Option<String>,
    /// Layers in z-order.
    pub layers: LayerStore,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new(kind: PageKind, width: u32, height: u32) -> Self {
        Self {
            id: PageId::new(),
            kind,
            width,
            height,
            physical_size: None,
            guides: Guides::default(),
            mockup: None,
            pairing_id: None,
            layers: LayerStore::new(),
        }
    }

    /// Set the physical size.
    #[must_use]
    pub fn with_physical_size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.physical_size = Some(PhysicalSize {
            width_mm,
            height_mm,
        });
        self
    }

    /// Set the pairing id.
    #[must_use]
    pub fn with_pairing(mut self, pairing_id: impl Into<String>) -> Self {
        self.pairing_id = Some(pairing_id.into());
        self
    }

    /// Pixels per millimeter along the width, when the physical size is known.
    #[must_use]
    pub fn pixels_per_mm(&self) -> Option<f64> {
        self.physical_size
            .filter(|size| size.width_mm > 0.0)
            .map(|size| f64::from(self.width) / size.width_mm)
    }
}

/// An ordered sequence of pages sharing a name and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document id.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Kind shared by the pages.
    pub kind: PageKind,
    /// Pages in order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document with one empty page.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PageKind, width: u32, height: u32) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            kind,
            pages: vec![Page::new(kind, width, height)],
        }
    }

    /// Append a page and return its index.
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Page by index.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Mutable page by index.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Other pages sharing the pairing id of page `index`.
    #[must_use]
    pub fn pages_paired_with(&self, index: usize) -> Vec<usize> {
        let Some(pairing) = self.page(index).and_then(|page| page.pairing_id.as_deref()) else {
            return Vec::new();
        };
        self.pages
            .iter()
            .enumerate()
            .filter(|(i, page)| *i != index && page.pairing_id.as_deref() == Some(pairing))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_page() {
        let document = Document::new("Flyer", PageKind::Poster, 1080, 1350);
        assert_eq!(document.pages.len(), 1);
        assert_eq!(document.page(0).map(|p| p.width), Some(1080));
        assert!(document.page(0).is_some_and(|p| p.layers.is_empty()));
    }

    #[test]
    fn test_pairing() {
        let mut document = Document::new("Cards", PageKind::BusinessCard, 1050, 600);
        document.pages[0].pairing_id = Some("card-1".to_string());
        let back = document.add_page(Page::new(PageKind::BusinessCard, 1050, 600).with_pairing("card-1"));
        document.add_page(Page::new(PageKind::BusinessCard, 1050, 600));

        assert_eq!(document.pages_paired_with(0), vec![back]);
        assert_eq!(document.pages_paired_with(back), vec![0]);
        assert!(document.pages_paired_with(2).is_empty());
    }

    #[test]
    fn test_pixels_per_mm() {
        let page = Page::new(PageKind::BusinessCard, 1050, 600).with_physical_size(89.0, 51.0);
        let ppm = page.pixels_per_mm().expect("physical size");
        assert!((ppm - 1050.0 / 89.0).abs() < 1e-9);
        assert!(Page::new(PageKind::Poster, 10, 10).pixels_per_mm().is_none());
    }

    #[test]
    fn test_page_json_omits_empty_metadata() {
        let page = Page::new(PageKind::Packaging, 800, 600);
        let json = serde_json::to_value(&page).expect("serialize");
        assert_eq!(json["kind"], "packaging");
        assert!(json.get("guides").is_none());
        assert!(json.get("pairingId").is_none());
        let back: Page = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, page);
    }
}
