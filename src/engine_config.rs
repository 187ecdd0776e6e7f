//! # Engine Configuration Builder
//!
//! Maps user-selected engine parameters (OCR engine mode, page segmentation
//! mode) onto the native `--oem <n> --psm <n>` token sequence the engine
//! consumes. Pure index-to-token mapping with range checks, nothing else.

use serde::{Deserialize, Serialize};

use crate::errors::{AppResult, OcrError};

/// OCR Engine mode (OEM) selecting the recognition algorithm variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineMode {
    /// Legacy engine only
    LegacyOnly = 0,
    /// Neural nets LSTM engine only
    LstmOnly = 1,
    /// Legacy + LSTM engines
    LegacyLstm = 2,
    /// Whatever is available, based on installed data
    #[default]
    BasedOnWhatIsAvailable = 3,
}

impl EngineMode {
    /// Number of enumerated engine modes
    pub const COUNT: u32 = 4;

    /// Build from the UI-facing mode index
    pub fn from_index(index: u32) -> AppResult<Self> {
        match index {
            0 => Ok(EngineMode::LegacyOnly),
            1 => Ok(EngineMode::LstmOnly),
            2 => Ok(EngineMode::LegacyLstm),
            3 => Ok(EngineMode::BasedOnWhatIsAvailable),
            other => Err(OcrError::InvalidMode(format!(
                "engine mode index {} out of range (0..={})",
                other,
                Self::COUNT - 1
            ))),
        }
    }

    /// Token value for the engine command line
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::LegacyOnly => "0",
            EngineMode::LstmOnly => "1",
            EngineMode::LegacyLstm => "2",
            EngineMode::BasedOnWhatIsAvailable => "3",
        }
    }
}

/// Page Segmentation Mode (PSM) controlling page partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSegMode {
    /// Orientation and script detection (OSD) only
    OsdOnly = 0,
    /// Automatic page segmentation with OSD
    AutoOsd = 1,
    /// Automatic page segmentation, no OSD
    AutoNoOsd = 2,
    /// Fully automatic page segmentation
    #[default]
    Auto = 3,
    /// Assume a single column of text
    SingleColumn = 4,
    /// Assume a single uniform block of vertically aligned text
    SingleBlockVert = 5,
    /// Assume a single uniform block of text
    SingleBlock = 6,
    /// Treat the image as a single text line
    SingleLine = 7,
    /// Treat the image as a single word
    SingleWord = 8,
    /// Treat the image as a single word in a circle
    WordInCircle = 9,
    /// Treat the image as a single character
    SingleChar = 10,
    /// Find as much text as possible in no particular order
    SparseText = 11,
    /// Sparse text with OSD
    SparseTextOsd = 12,
    /// Raw line, bypassing engine-specific hacks
    RawLine = 13,
}

impl PageSegMode {
    /// Number of enumerated segmentation modes
    pub const COUNT: u32 = 14;

    /// Build from the UI-facing mode index
    pub fn from_index(index: u32) -> AppResult<Self> {
        let mode = match index {
            0 => PageSegMode::OsdOnly,
            1 => PageSegMode::AutoOsd,
            2 => PageSegMode::AutoNoOsd,
            3 => PageSegMode::Auto,
            4 => PageSegMode::SingleColumn,
            5 => PageSegMode::SingleBlockVert,
            6 => PageSegMode::SingleBlock,
            7 => PageSegMode::SingleLine,
            8 => PageSegMode::SingleWord,
            9 => PageSegMode::WordInCircle,
            10 => PageSegMode::SingleChar,
            11 => PageSegMode::SparseText,
            12 => PageSegMode::SparseTextOsd,
            13 => PageSegMode::RawLine,
            other => {
                return Err(OcrError::InvalidMode(format!(
                    "page segmentation mode index {} out of range (0..={})",
                    other,
                    Self::COUNT - 1
                )))
            }
        };
        Ok(mode)
    }

    /// Token value for the engine command line
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSegMode::OsdOnly => "0",
            PageSegMode::AutoOsd => "1",
            PageSegMode::AutoNoOsd => "2",
            PageSegMode::Auto => "3",
            PageSegMode::SingleColumn => "4",
            PageSegMode::SingleBlockVert => "5",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SingleLine => "7",
            PageSegMode::SingleWord => "8",
            PageSegMode::WordInCircle => "9",
            PageSegMode::SingleChar => "10",
            PageSegMode::SparseText => "11",
            PageSegMode::SparseTextOsd => "12",
            PageSegMode::RawLine => "13",
        }
    }
}

/// Engine parameter pair, constructed fresh per OCR invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineParams {
    pub engine_mode: EngineMode,
    pub seg_mode: PageSegMode,
}

impl EngineParams {
    /// Build from the UI-facing mode indices, range-checking both.
    pub fn from_indices(engine_mode: u32, seg_mode: u32) -> AppResult<Self> {
        Ok(Self {
            engine_mode: EngineMode::from_index(engine_mode)?,
            seg_mode: PageSegMode::from_index(seg_mode)?,
        })
    }

    /// The exact token sequence appended to the engine command line
    pub fn to_args(self) -> [&'static str; 4] {
        ["--oem", self.engine_mode.as_str(), "--psm", self.seg_mode.as_str()]
    }

    /// Config string form, e.g. `--oem 3 --psm 3`
    pub fn config_string(self) -> String {
        self.to_args().join(" ")
    }
}

/// Produce the engine config string for a pair of mode indices.
pub fn build_config(engine_mode: u32, seg_mode: u32) -> AppResult<String> {
    Ok(EngineParams::from_indices(engine_mode, seg_mode)?.config_string())
}
