use crate::types::{FlashcardError, Result, Side};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperType {
    #[default]
    Letter,
    Legal,
    A4,
    A5,
}

impl PaperType {
    /// Portrait dimensions (width, height)
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperType::Letter => (215.9, 279.4),
            PaperType::Legal => (215.9, 355.6),
            PaperType::A4 => (210.0, 297.0),
            PaperType::A5 => (148.0, 210.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaperType::Letter => "Letter",
            PaperType::Legal => "Legal",
            PaperType::A4 => "A4",
            PaperType::A5 => "A5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

/// Physical sheet geometry: paper, card size and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    pub paper: PaperType,
    pub orientation: Orientation,
    pub card_width_mm: f32,
    pub card_height_mm: f32,
    /// Space between neighbouring cards
    pub gap_mm: f32,
    /// Inner padding between the cut line and the text
    pub box_padding_mm: f32,
}

impl Default for SheetOptions {
    fn default() -> Self {
        // Four 5" x 3" index cards on landscape Letter
        Self {
            paper: PaperType::Letter,
            orientation: Orientation::Landscape,
            card_width_mm: 127.0,
            card_height_mm: 76.2,
            gap_mm: 0.0,
            box_padding_mm: 3.0,
        }
    }
}

impl SheetOptions {
    /// Page size with orientation applied (width, height)
    pub fn page_size_mm(&self) -> (f32, f32) {
        let (w, h) = self.paper.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Load sheet options from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let options: Self = load_config(path.as_ref()).await?;
        options.validate()?;
        Ok(options)
    }

    /// Save sheet options to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_config(self, path.as_ref()).await
    }

    pub fn validate(&self) -> Result<()> {
        if self.card_width_mm <= 0.0 || self.card_height_mm <= 0.0 {
            return Err(FlashcardError::Config(
                "Card dimensions must be positive".to_string(),
            ));
        }
        if self.gap_mm < 0.0 || self.box_padding_mm < 0.0 {
            return Err(FlashcardError::Config(
                "Gap and padding cannot be negative".to_string(),
            ));
        }
        if self.box_padding_mm * 2.0 >= self.card_width_mm.min(self.card_height_mm) {
            return Err(FlashcardError::Config(
                "Box padding leaves no room for text".to_string(),
            ));
        }

        let (page_w, page_h) = self.page_size_mm();
        let grid_w = self.card_width_mm * 2.0 + self.gap_mm;
        let grid_h = self.card_height_mm * 2.0 + self.gap_mm;
        if grid_w > page_w || grid_h > page_h {
            return Err(FlashcardError::Config(format!(
                "A 2x2 grid of {}x{} mm cards does not fit on {} paper",
                self.card_width_mm,
                self.card_height_mm,
                self.paper.name()
            )));
        }

        Ok(())
    }
}

/// Order of sheets for the back pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum PageOrder {
    #[default]
    Same,
    Reverse,
}

impl PageOrder {
    /// Parse a name, falling back to `Same` for anything unrecognised
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "same" => PageOrder::Same,
            "reverse" => PageOrder::Reverse,
            other => {
                log::warn!("Unknown page order '{other}', using 'same'");
                PageOrder::Same
            }
        }
    }
}

impl From<String> for PageOrder {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Slot permutation applied to every back sheet.
///
/// Each mode maps `new[i] = old[f(i)]` and is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum PositionMap {
    #[default]
    Identity,
    /// TL<->BL, TR<->BR
    SwapRows,
    /// TL<->TR, BL<->BR
    SwapCols,
    /// TL<->BR, TR<->BL
    Rotate180,
}

impl PositionMap {
    pub const ALL: [PositionMap; 4] = [
        PositionMap::Identity,
        PositionMap::SwapRows,
        PositionMap::SwapCols,
        PositionMap::Rotate180,
    ];

    pub fn permutation(self) -> [usize; 4] {
        match self {
            PositionMap::Identity => [0, 1, 2, 3],
            PositionMap::SwapRows => [2, 3, 0, 1],
            PositionMap::SwapCols => [1, 0, 3, 2],
            PositionMap::Rotate180 => [3, 2, 1, 0],
        }
    }

    /// Parse a name, falling back to `Identity` for anything unrecognised
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "identity" => PositionMap::Identity,
            "swaprows" => PositionMap::SwapRows,
            "swapcols" => PositionMap::SwapCols,
            "rotate180" => PositionMap::Rotate180,
            _ => {
                log::warn!("Unknown position map '{name}', using 'identity'");
                PositionMap::Identity
            }
        }
    }
}

impl From<String> for PositionMap {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Presentational rotation of the back text. Never moves cards between slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum BackRotation {
    #[default]
    None,
    Rotate180,
}

impl BackRotation {
    pub fn degrees(self) -> u16 {
        match self {
            BackRotation::None => 0,
            BackRotation::Rotate180 => 180,
        }
    }
}

impl From<u16> for BackRotation {
    fn from(degrees: u16) -> Self {
        match degrees {
            0 => BackRotation::None,
            180 => BackRotation::Rotate180,
            other => {
                log::warn!("Unsupported back rotation {other}°, using 0°");
                BackRotation::None
            }
        }
    }
}

impl From<BackRotation> for u16 {
    fn from(rotation: BackRotation) -> Self {
        rotation.degrees()
    }
}

/// Cards in the synthetic alignment deck unless configured otherwise
pub const DEFAULT_TEST_CARD_COUNT: usize = 4;

/// Settings for one print build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintConfiguration {
    pub side: Side,
    pub page_order: PageOrder,
    pub position_map: PositionMap,
    #[serde(rename = "backRotationDegrees")]
    pub back_rotation: BackRotation,
    pub show_cut_guides: bool,
    pub test_mode: bool,
    pub test_card_count: usize,
}

impl Default for PrintConfiguration {
    fn default() -> Self {
        Self {
            side: Side::Front,
            page_order: PageOrder::Same,
            position_map: PositionMap::Identity,
            back_rotation: BackRotation::None,
            show_cut_guides: true,
            test_mode: false,
            test_card_count: DEFAULT_TEST_CARD_COUNT,
        }
    }
}

impl PrintConfiguration {
    /// Load configuration from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path.as_ref()).await
    }

    /// Save configuration to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_config(self, path.as_ref()).await
    }

    /// Rotation that applies to the given side
    pub fn rotation_for(&self, side: Side) -> BackRotation {
        match side {
            Side::Front => BackRotation::None,
            Side::Back => self.back_rotation,
        }
    }
}

async fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| FlashcardError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

async fn save_config<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| FlashcardError::Config(format!("Failed to serialize config: {}", e)))?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
