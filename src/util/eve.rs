//! EVE Online image server helpers.

/// Base URL of the EVE Online image server.
pub static IMAGE_SERVER_URL: &str = "https://image.eveonline.com";

/// Alliance ID rendered for corporations without an alliance.
pub const NO_ALLIANCE_PLACEHOLDER_ID: i64 = 1;

/// Default logo size in pixels.
pub const DEFAULT_LOGO_SIZE: u32 = 128;

/// Kind of entity an image is requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Character,
    Corporation,
    Alliance,
}

impl ImageKind {
    fn path(&self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Corporation => "Corporation",
            Self::Alliance => "Alliance",
        }
    }

    /// Character portraits are served as JPEG, logos as PNG.
    fn extension(&self) -> &'static str {
        match self {
            Self::Character => "jpg",
            Self::Corporation | Self::Alliance => "png",
        }
    }
}

/// Builds the image server URL for a character portrait or a corporation/alliance logo.
///
/// # Example
/// ```ignore
/// assert_eq!(
///     image_url(ImageKind::Corporation, 98_000_001, 128),
///     "https://image.eveonline.com/Corporation/98000001_128.png"
/// );
/// ```
pub fn image_url(kind: ImageKind, id: i64, size: u32) -> String {
    format!(
        "{}/{}/{}_{}.{}",
        IMAGE_SERVER_URL,
        kind.path(),
        id,
        size,
        kind.extension()
    )
}

pub fn corp_logo(corporation_id: i64, size: u32) -> String {
    image_url(ImageKind::Corporation, corporation_id, size)
}

/// Alliance logo, or the placeholder logo when the corporation has no alliance.
pub fn alliance_logo(alliance_id: Option<i64>, size: u32) -> String {
    image_url(
        ImageKind::Alliance,
        alliance_id.unwrap_or(NO_ALLIANCE_PLACEHOLDER_ID),
        size,
    )
}
