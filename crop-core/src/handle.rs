//! Resize handles and the edges each one drives.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::Size;

/// Which frame edges a handle moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Edges {
    /// Moves the left edge.
    pub left: bool,
    /// Moves the right edge.
    pub right: bool,
    /// Moves the top edge.
    pub top: bool,
    /// Moves the bottom edge.
    pub bottom: bool,
}

/// A resize handle. Corners come first, then edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    /// Handle 0.
    TopLeft,
    /// Handle 1.
    TopRight,
    /// Handle 2.
    BottomLeft,
    /// Handle 3.
    BottomRight,
    /// Handle 4, centred on the top edge.
    Top,
    /// Handle 5, centred on the right edge.
    Right,
    /// Handle 6, centred on the bottom edge.
    Bottom,
    /// Handle 7, centred on the left edge.
    Left,
}

impl Handle {
    /// All handles in index order.
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
    ];

    /// Position in [`Handle::ALL`]; also the `handle-N` CSS class suffix.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|h| *h == self).unwrap_or_default()
    }

    /// Look up a handle by index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Edges this handle drags.
    #[must_use]
    pub const fn edges(self) -> Edges {
        let (left, right, top, bottom) = match self {
            Self::TopLeft => (true, false, true, false),
            Self::TopRight => (false, true, true, false),
            Self::BottomLeft => (true, false, false, true),
            Self::BottomRight => (false, true, false, true),
            Self::Top => (false, false, true, false),
            Self::Right => (false, true, false, false),
            Self::Bottom => (false, false, false, true),
            Self::Left => (true, false, false, false),
        };
        Edges {
            left,
            right,
            top,
            bottom,
        }
    }

    /// CSS class list for the handle element.
    #[must_use]
    pub fn css_class(self) -> String {
        format!("crop-circle-handle handle-{}", self.index())
    }

    /// CSS declarations that pin the handle to its corner or edge.
    ///
    /// Midpoint handles are centred with a negative margin of half their
    /// own size, which the host measures after inserting the element.
    #[must_use]
    pub fn placement(self, size: Size) -> Vec<(&'static str, String)> {
        let zero = || "0".to_string();
        let half = || "50%".to_string();
        let margin_left = || format!("{}px", -size.width / 2.0);
        let margin_top = || format!("{}px", -size.height / 2.0);

        match self {
            Self::TopLeft => vec![("top", zero()), ("left", zero())],
            Self::TopRight => vec![("top", zero()), ("right", zero())],
            Self::BottomLeft => vec![("bottom", zero()), ("left", zero())],
            Self::BottomRight => vec![("bottom", zero()), ("right", zero())],
            Self::Top => vec![
                ("top", zero()),
                ("left", half()),
                ("margin-left", margin_left()),
            ],
            Self::Right => vec![
                ("right", zero()),
                ("top", half()),
                ("margin-top", margin_top()),
            ],
            Self::Bottom => vec![
                ("bottom", zero()),
                ("left", half()),
                ("margin-left", margin_left()),
            ],
            Self::Left => vec![
                ("left", zero()),
                ("top", half()),
                ("margin-top", margin_top()),
            ],
        }
    }
}

/// How many resize handles the frame carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HandleCount {
    /// Move-only frame.
    #[default]
    None,
    /// Corner handles.
    Four,
    /// Corner and edge-midpoint handles.
    Eight,
}

impl HandleCount {
    /// The handles to create, in index order.
    #[must_use]
    pub fn handles(self) -> &'static [Handle] {
        match self {
            Self::None => &[],
            Self::Four => &Handle::ALL[..4],
            Self::Eight => &Handle::ALL,
        }
    }
}

impl TryFrom<u8> for HandleCount {
    type Error = CropError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(CropError::InvalidHandleCount(other)),
        }
    }
}

impl From<HandleCount> for u8 {
    fn from(count: HandleCount) -> Self {
        match count {
            HandleCount::None => 0,
            HandleCount::Four => 4,
            HandleCount::Eight => 8,
        }
    }
}
